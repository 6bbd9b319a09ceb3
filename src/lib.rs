//! Neon Snake - grid snake with timed buffs and a chasing enemy
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, spawns, buffs, enemy)
//! - `config`: Data-driven game balance, loaded from JSON
//! - `highscores`: Leaderboard with file persistence
//! - `audio`: Sound cue mapping for simulation events

pub mod audio;
pub mod config;
pub mod error;
pub mod highscores;
pub mod sim;

pub use audio::{AudioManager, CueLog, CuePlayer, SoundEffect};
pub use config::GameConfig;
pub use error::{ConfigError, LeaderboardError};
pub use highscores::{FileLeaderboard, HighScoreEntry, HighScores, LeaderboardService};
pub use sim::{GameState, TickInput, TickResult, tick};

/// Game configuration constants
pub mod consts {
    /// Sampling budget for food, legendary and area item placement
    pub const PLACEMENT_ATTEMPTS: u32 = 200;
    /// Sampling budget for the enemy spawn cell before falling back
    pub const ENEMY_SPAWN_ATTEMPTS: u32 = 100;
    /// Legendary items cover a square of this many cells per side
    pub const LEGENDARY_SIZE: i32 = 2;
    /// Entries kept on the leaderboard
    pub const MAX_HIGH_SCORES: usize = 10;
}
