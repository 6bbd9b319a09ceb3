//! Tick output
//!
//! The simulation reports everything the presentation layer needs through
//! these events. It never touches render or UI state itself.

use serde::{Deserialize, Serialize};

use super::buffs::BuffId;
use super::grid::GridPosition;

/// Something was placed on (or removed from) the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpawnKind {
    NormalFood { visual_index: u32 },
    /// Anchor of a 2x2 legendary item
    Legendary { id: Option<BuffId>, visual_index: u32 },
    /// A legendary item timed out before being eaten
    LegendaryExpired,
    AreaItem,
    /// Where the enemy will appear once its timer runs out
    EnemyReserved,
    Enemy,
    EnemyMoved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnEvent {
    pub kind: SpawnKind,
    pub position: GridPosition,
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerminalCause {
    Wall,
    SelfCollision,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionEvent {
    FoodEaten { position: GridPosition, points: u64 },
    LegendaryEaten { id: Option<BuffId>, position: GridPosition, points: u64 },
    AreaItemCollected { position: GridPosition, points: u64 },
    /// Enemy contact that cost points
    EnemyHit { position: GridPosition, penalty: u64 },
    /// Enemy contact absorbed by damage immunity
    Deflected { position: GridPosition },
    Terminal { cause: TerminalCause, final_score: u64 },
}

/// Result of one `tick` call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickResult {
    /// Net score change this call
    pub score_delta: i64,
    pub expired_buff_ids: Vec<BuffId>,
    /// Buffs granted this call by eating a legendary item
    pub applied_buffs: Vec<BuffId>,
    pub spawn_events: Vec<SpawnEvent>,
    pub collision_events: Vec<CollisionEvent>,
    /// Spawns that found no room and will be retried next step
    pub deferred_spawns: Vec<SpawnKind>,
    /// True if a logical player step happened
    pub stepped: bool,
    pub terminal: bool,
    /// Final score beat the session best
    pub new_best: bool,
    /// The call was rejected (session already over)
    pub ignored: bool,
}

impl TickResult {
    pub fn ignored() -> Self {
        Self {
            ignored: true,
            ..Default::default()
        }
    }

    pub(crate) fn spawn(&mut self, kind: SpawnKind, position: GridPosition) {
        self.spawn_events.push(SpawnEvent { kind, position });
    }

    pub(crate) fn collide(&mut self, event: CollisionEvent) {
        self.collision_events.push(event);
    }
}
