//! Enemy spawn and chase scheduler
//!
//! Idle → CountingDown → Active → Cooldown → Active → ...
//!
//! A single `remaining_ms` counter serves both the spawn countdown and the
//! post-hit cooldown. After a cooldown the enemy appears directly at the
//! position reserved when the hit happened, with no second countdown.

use std::collections::VecDeque;

use glam::IVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::clock::Accumulator;
use super::grid::{Grid, GridPosition};
use super::placement::find_distant_cell;
use crate::config::EnemyConfig;
use crate::consts::ENEMY_SPAWN_ATTEMPTS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyPhase {
    /// Score has not reached the spawn threshold yet
    Idle,
    /// Spawn position reserved, waiting to appear
    CountingDown,
    /// Chasing the player
    Active,
    /// Knocked out after a hit; next position already reserved
    Cooldown,
}

/// The chasing actor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyActor {
    pub active: bool,
    /// Head first
    pub body: Vec<GridPosition>,
    pub move_interval_ms: f64,
    pub clock: Accumulator,
}

impl EnemyActor {
    fn new(move_interval_ms: f64) -> Self {
        Self {
            active: false,
            body: Vec::with_capacity(1),
            move_interval_ms,
            clock: Accumulator::new(),
        }
    }

    pub fn head(&self) -> Option<GridPosition> {
        self.body.first().copied()
    }

    fn appear_at(&mut self, cell: GridPosition) {
        self.body.clear();
        self.body.push(cell);
        self.active = true;
        self.clock.reset();
    }

    fn vanish(&mut self) {
        self.body.clear();
        self.active = false;
        self.clock.reset();
    }

    /// One cell toward `target` along the axis with the larger gap.
    /// Equal gaps move vertically.
    fn chase(&mut self, target: GridPosition) -> Option<GridPosition> {
        let head = self.head()?;
        let delta = target - head;
        let step = if delta.x.abs() > delta.y.abs() {
            IVec2::new(delta.x.signum(), 0)
        } else {
            IVec2::new(0, delta.y.signum())
        };
        let new_head = head + step;
        self.body.insert(0, new_head);
        self.body.pop();
        Some(new_head)
    }
}

/// Countdown/cooldown bookkeeping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemySpawnSchedule {
    pub phase: EnemyPhase,
    /// Meaning depends on `phase`: time to spawn, or time left in cooldown
    pub remaining_ms: f64,
    pub reserved: Option<GridPosition>,
}

impl Default for EnemySpawnSchedule {
    fn default() -> Self {
        Self {
            phase: EnemyPhase::Idle,
            remaining_ms: 0.0,
            reserved: None,
        }
    }
}

/// What changed during [`EnemyScheduler::advance`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyTransition {
    CountdownStarted { reserved: GridPosition },
    Spawned { at: GridPosition },
    Moved { to: GridPosition },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyScheduler {
    actor: EnemyActor,
    schedule: EnemySpawnSchedule,
    config: EnemyConfig,
}

impl EnemyScheduler {
    pub fn new(config: EnemyConfig) -> Self {
        Self {
            actor: EnemyActor::new(config.move_interval_ms as f64),
            schedule: EnemySpawnSchedule::default(),
            config,
        }
    }

    pub fn phase(&self) -> EnemyPhase {
        self.schedule.phase
    }

    pub fn actor(&self) -> &EnemyActor {
        &self.actor
    }

    pub fn schedule(&self) -> &EnemySpawnSchedule {
        &self.schedule
    }

    /// Reserved spawn cell while counting down or cooling down
    pub fn reserved_position(&self) -> Option<GridPosition> {
        match self.schedule.phase {
            EnemyPhase::CountingDown | EnemyPhase::Cooldown => self.schedule.reserved,
            _ => None,
        }
    }

    /// Whole seconds left on the countdown or cooldown timer, for display
    pub fn countdown_secs(&self) -> Option<u64> {
        match self.schedule.phase {
            EnemyPhase::CountingDown | EnemyPhase::Cooldown => {
                Some((self.schedule.remaining_ms.max(0.0) / 1000.0).ceil() as u64)
            }
            _ => None,
        }
    }

    /// Advance timers by raw `delta_ms` and move the actor on its own cadence
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        delta_ms: f64,
        score: u64,
        player_head: GridPosition,
        grid: &Grid,
        rng: &mut R,
    ) -> Option<EnemyTransition> {
        match self.schedule.phase {
            EnemyPhase::Idle => {
                if score < self.config.spawn_threshold {
                    return None;
                }
                let reserved = self.reserve(player_head, grid, rng);
                self.schedule.phase = EnemyPhase::CountingDown;
                self.schedule.remaining_ms = self.config.spawn_countdown_ms as f64;
                log::info!(
                    "Enemy countdown started ({}ms), reserved {:?}",
                    self.config.spawn_countdown_ms,
                    reserved
                );
                Some(EnemyTransition::CountdownStarted { reserved })
            }
            EnemyPhase::CountingDown | EnemyPhase::Cooldown => {
                self.schedule.remaining_ms -= delta_ms;
                if self.schedule.remaining_ms > 0.0 {
                    return None;
                }
                let at = match self.schedule.reserved.take() {
                    Some(cell) => cell,
                    None => self.reserve_now(player_head, grid, rng),
                };
                self.schedule.phase = EnemyPhase::Active;
                self.schedule.remaining_ms = 0.0;
                self.actor.appear_at(at);
                log::info!("Enemy spawned at {:?}", at);
                Some(EnemyTransition::Spawned { at })
            }
            EnemyPhase::Active => {
                self.actor.clock.advance(delta_ms);
                if !self.actor.clock.consume_step(self.actor.move_interval_ms) {
                    return None;
                }
                self.actor
                    .chase(player_head)
                    .map(|to| EnemyTransition::Moved { to })
            }
        }
    }

    /// Player head on any enemy cell, or enemy head on any player cell behind the head
    pub fn check_collision(&self, snake: &VecDeque<GridPosition>) -> bool {
        if self.schedule.phase != EnemyPhase::Active {
            return false;
        }
        let Some(player_head) = snake.front() else {
            return false;
        };
        if self.actor.body.contains(player_head) {
            return true;
        }
        self.actor
            .head()
            .is_some_and(|enemy_head| snake.iter().skip(1).any(|part| *part == enemy_head))
    }

    /// Knock the actor out, start the cooldown and reserve the next spawn cell.
    /// Returns the reserved cell so the host can show it during the cooldown.
    pub fn on_hit<R: Rng + ?Sized>(
        &mut self,
        player_head: GridPosition,
        grid: &Grid,
        rng: &mut R,
    ) -> GridPosition {
        self.actor.vanish();
        self.schedule.phase = EnemyPhase::Cooldown;
        self.schedule.remaining_ms = self.config.respawn_cooldown_ms as f64;
        let reserved = self.reserve(player_head, grid, rng);
        log::info!(
            "Enemy cooldown {}ms, next spawn reserved at {:?}",
            self.config.respawn_cooldown_ms,
            reserved
        );
        reserved
    }

    pub fn reset(&mut self) {
        self.actor.vanish();
        self.schedule = EnemySpawnSchedule::default();
    }

    fn reserve<R: Rng + ?Sized>(
        &mut self,
        player_head: GridPosition,
        grid: &Grid,
        rng: &mut R,
    ) -> GridPosition {
        let cell = self.reserve_now(player_head, grid, rng);
        self.schedule.reserved = Some(cell);
        cell
    }

    fn reserve_now<R: Rng + ?Sized>(
        &self,
        player_head: GridPosition,
        grid: &Grid,
        rng: &mut R,
    ) -> GridPosition {
        find_distant_cell(
            grid,
            rng,
            player_head,
            self.config.min_spawn_distance,
            ENEMY_SPAWN_ATTEMPTS,
        )
    }
}
