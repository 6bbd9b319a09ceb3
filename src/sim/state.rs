//! Session state
//!
//! One `GameState` per session, owned by the host and passed into `tick`.
//! Nothing here is global, so any number of sessions can run side by side.

use std::collections::VecDeque;

use glam::IVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::buffs::{BuffId, BuffRegistry};
use super::clock::Accumulator;
use super::enemy::EnemyScheduler;
use super::grid::{Footprint, Grid, GridPosition, Occupancy};
use super::placement::{find_empty_cell, find_empty_region};
use super::score::ScoreState;
use crate::config::GameConfig;
use crate::consts::{LEGENDARY_SIZE, PLACEMENT_ATTEMPTS};
use crate::error::ConfigError;

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    Running,
    Paused,
    /// Wall or self collision; only `reset` leaves this state
    Terminated,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FoodKind {
    Normal,
    Legendary {
        id: Option<BuffId>,
        spawn_ms: f64,
        lifetime_ms: f64,
    },
}

/// A consumable on the board. Legendary items cover a 2x2 block anchored at `position`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    pub position: GridPosition,
    pub kind: FoodKind,
    pub visual_index: u32,
}

impl FoodItem {
    pub fn normal(position: GridPosition, visual_index: u32) -> Self {
        Self {
            position,
            kind: FoodKind::Normal,
            visual_index,
        }
    }

    pub fn footprint(&self) -> Footprint {
        match self.kind {
            FoodKind::Normal => Footprint::new(self.position, 1, 1),
            FoodKind::Legendary { .. } => {
                Footprint::new(self.position, LEGENDARY_SIZE, LEGENDARY_SIZE)
            }
        }
    }

    /// Legendary items past their lifetime
    pub fn is_expired(&self, now_ms: f64) -> bool {
        match self.kind {
            FoodKind::Normal => false,
            FoodKind::Legendary {
                spawn_ms,
                lifetime_ms,
                ..
            } => now_ms - spawn_ms >= lifetime_ms,
        }
    }
}

impl Occupancy for FoodItem {
    fn occupies(&self, cell: GridPosition) -> bool {
        self.footprint().contains(cell)
    }
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: GameConfig,
    pub grid: Grid,
    /// Seed the RNG was created from
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: SessionPhase,
    /// Session clock (ms of unpaused time)
    pub now_ms: f64,
    /// Head first
    pub snake: VecDeque<GridPosition>,
    pub heading: IVec2,
    /// Latest directional input, applied on the next player step
    pub pending_intent: Option<IVec2>,
    pub food: Option<FoodItem>,
    pub legendary: Option<FoodItem>,
    pub area_items: Vec<GridPosition>,
    pub score: ScoreState,
    pub player_clock: Accumulator,
    pub buffs: BuffRegistry,
    pub enemy: EnemyScheduler,
    /// Score at which the current legendary spawn was issued
    pub legendary_trigger_score: Option<u64>,
    /// Best score known to the host (e.g. leaderboard top)
    pub best_score: u64,
    /// Player steps taken this session
    pub steps: u64,
}

impl GameState {
    /// Validate `config` and start a fresh session
    pub fn new(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut state = Self {
            grid: Grid::new(config.grid.tile_count),
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: SessionPhase::Running,
            now_ms: 0.0,
            snake: VecDeque::new(),
            heading: IVec2::X,
            pending_intent: None,
            food: None,
            legendary: None,
            area_items: Vec::new(),
            score: ScoreState::new(config.speed.clone()),
            player_clock: Accumulator::new(),
            buffs: BuffRegistry::new(),
            enemy: EnemyScheduler::new(config.enemy.clone()),
            legendary_trigger_score: None,
            best_score: 0,
            steps: 0,
            config,
        };
        state.start();
        Ok(state)
    }

    /// Return every session component to its initial state in one step.
    /// The RNG keeps running so consecutive sessions differ.
    pub fn reset(&mut self) {
        self.score.reset_score();
        self.buffs.clear();
        self.enemy.reset();
        self.player_clock.reset();
        self.food = None;
        self.legendary = None;
        self.area_items.clear();
        self.pending_intent = None;
        self.legendary_trigger_score = None;
        self.now_ms = 0.0;
        self.steps = 0;
        self.phase = SessionPhase::Running;
        self.start();
    }

    fn start(&mut self) {
        let x = (self.grid.tile_count / 3).max(2);
        let y = self.grid.tile_count / 2;
        self.snake = (0..3).map(|i| IVec2::new(x - i, y)).collect();
        self.heading = IVec2::X;
        self.food = self.place_normal_food();
        log::info!(
            "Session started: {}x{} grid, seed {}",
            self.grid.tile_count,
            self.grid.tile_count,
            self.seed
        );
    }

    pub fn head(&self) -> Option<GridPosition> {
        self.snake.front().copied()
    }

    pub fn is_terminated(&self) -> bool {
        self.phase == SessionPhase::Terminated
    }

    /// Put the snake at explicit cells (head first) with a heading
    pub fn place_snake(&mut self, body: impl IntoIterator<Item = GridPosition>, heading: IVec2) {
        self.snake = body.into_iter().collect();
        self.heading = heading;
        self.pending_intent = None;
    }

    /// Pick a fresh normal food cell, `None` if the board is too full
    pub(crate) fn place_normal_food(&mut self) -> Option<FoodItem> {
        let variants = self.config.effects.food_variants.max(1);
        let excludes: [&dyn Occupancy; 4] = [
            &self.snake,
            &self.legendary,
            &self.enemy.actor().body,
            &self.area_items,
        ];
        let cell = find_empty_cell(&self.grid, &mut self.rng, &excludes, PLACEMENT_ATTEMPTS)?;
        let visual_index = self.rng.random_range(0..variants);
        Some(FoodItem::normal(cell, visual_index))
    }

    /// Pick a 2x2 region for a legendary item and choose which legendary it is
    pub(crate) fn place_legendary(&mut self) -> Option<FoodItem> {
        let excludes: [&dyn Occupancy; 4] = [
            &self.snake,
            &self.food,
            &self.enemy.actor().body,
            &self.area_items,
        ];
        let region = find_empty_region(
            &self.grid,
            &mut self.rng,
            LEGENDARY_SIZE,
            LEGENDARY_SIZE,
            &excludes,
            PLACEMENT_ATTEMPTS,
        )?;
        let enabled = self.config.enabled_legendaries();
        let (id, visual_index) = if enabled.is_empty() {
            (None, 0)
        } else {
            let index = self.rng.random_range(0..enabled.len());
            (Some(enabled[index]), index as u32)
        };
        Some(FoodItem {
            position: region.anchor,
            kind: FoodKind::Legendary {
                id,
                spawn_ms: self.now_ms,
                lifetime_ms: self.config.scoring.legendary_lifetime_ms as f64,
            },
            visual_index,
        })
    }

    pub(crate) fn place_area_item(&mut self) -> Option<GridPosition> {
        let excludes: [&dyn Occupancy; 5] = [
            &self.snake,
            &self.food,
            &self.legendary,
            &self.enemy.actor().body,
            &self.area_items,
        ];
        find_empty_cell(&self.grid, &mut self.rng, &excludes, PLACEMENT_ATTEMPTS)
    }
}
