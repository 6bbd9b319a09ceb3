//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Variable frame deltas feed fixed-interval accumulators
//! - Seeded RNG only
//! - Stable iteration order (buffs keyed by ID)
//! - No rendering or platform dependencies

pub mod buffs;
pub mod clock;
pub mod enemy;
pub mod events;
pub mod grid;
pub mod placement;
pub mod score;
pub mod state;
pub mod tick;

pub use buffs::{BuffId, BuffInstance, BuffKind, BuffRegistry};
pub use clock::Accumulator;
pub use enemy::{EnemyActor, EnemyPhase, EnemyScheduler, EnemySpawnSchedule, EnemyTransition};
pub use events::{CollisionEvent, SpawnEvent, SpawnKind, TerminalCause, TickResult};
pub use grid::{Footprint, Grid, GridPosition, Occupancy, is_unit_heading, manhattan};
pub use placement::{find_distant_cell, find_empty_cell, find_empty_region};
pub use score::ScoreState;
pub use state::{FoodItem, FoodKind, GameState, SessionPhase};
pub use tick::{TickInput, tick};
