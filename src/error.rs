//! Error types
//!
//! Only configuration and the leaderboard collaborator can fail. Gameplay
//! outcomes (terminal moves, full boards) are reported through tick results.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config value `{field}`: {reason}")]
    Invalid { field: String, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum LeaderboardError {
    #[error("invalid leaderboard entry: {0}")]
    InvalidEntry(String),
    #[error("leaderboard storage failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("leaderboard data is malformed: {0}")]
    Serde(#[from] serde_json::Error),
}
