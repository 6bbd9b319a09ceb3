//! High score leaderboard system
//!
//! One entry per player name holding that player's best score, kept sorted
//! by score (descending). Every name is stored so a player's best survives
//! dropping off the board; readers only see the top 10. Persisted as JSON.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::MAX_HIGH_SCORES;
use crate::error::LeaderboardError;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub name: String,
    pub score: u64,
    /// Unix timestamp (ms) when achieved
    pub timestamp_ms: u64,
}

/// Remote or local score store the host submits to at game over
pub trait LeaderboardService {
    fn submit_score(&mut self, name: &str, score: u64) -> Result<(), LeaderboardError>;

    /// Top entries, best first
    fn load_top_scores(&self) -> Result<Vec<HighScoreEntry>, LeaderboardError>;
}

/// High score leaderboard
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score would appear on the board
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        self.entries
            .get(MAX_HIGH_SCORES - 1)
            .map(|e| score > e.score)
            .unwrap_or(true)
    }

    /// The visible board, best first
    pub fn top(&self) -> &[HighScoreEntry] {
        &self.entries[..self.entries.len().min(MAX_HIGH_SCORES)]
    }

    /// Record `score` for `name`, keeping only the better of old and new.
    /// Returns the 1-indexed rank of the name afterwards, if it is on the board.
    pub fn add_score(
        &mut self,
        name: &str,
        score: u64,
        timestamp_ms: u64,
    ) -> Result<Option<usize>, LeaderboardError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LeaderboardError::InvalidEntry(
                "player name must not be empty".to_string(),
            ));
        }

        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(existing) if existing.score >= score => {
                log::debug!("{} keeps best score {} (submitted {})", name, existing.score, score);
            }
            Some(existing) => {
                existing.score = score;
                existing.timestamp_ms = timestamp_ms;
            }
            None => self.entries.push(HighScoreEntry {
                name: name.to_string(),
                score,
                timestamp_ms,
            }),
        }

        // Stable sort keeps the earlier entry ahead on ties
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));

        Ok(self.rank_of(name))
    }

    /// 1-indexed position of `name` on the visible board
    pub fn rank_of(&self, name: &str) -> Option<usize> {
        self.top().iter().position(|e| e.name == name).map(|i| i + 1)
    }

    /// Stored best for `name`, on the board or not
    pub fn best_for(&self, name: &str) -> Option<u64> {
        self.entries.iter().find(|e| e.name == name).map(|e| e.score)
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Load high scores from a JSON file. A missing file is an empty board.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LeaderboardError> {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("No high scores at {}, starting fresh", path.display());
            return Ok(Self::new());
        }
        let json = fs::read_to_string(path)?;
        let mut scores: HighScores = serde_json::from_str(&json)?;
        scores.entries.sort_by(|a, b| b.score.cmp(&a.score));
        log::info!("Loaded {} high scores", scores.entries.len());
        Ok(scores)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), LeaderboardError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }
}

impl LeaderboardService for HighScores {
    fn submit_score(&mut self, name: &str, score: u64) -> Result<(), LeaderboardError> {
        self.add_score(name, score, now_ms())?;
        Ok(())
    }

    fn load_top_scores(&self) -> Result<Vec<HighScoreEntry>, LeaderboardError> {
        Ok(self.top().to_vec())
    }
}

/// File-backed leaderboard that saves after every submission
#[derive(Debug, Clone)]
pub struct FileLeaderboard {
    path: std::path::PathBuf,
    scores: HighScores,
}

impl FileLeaderboard {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LeaderboardError> {
        let path = path.as_ref().to_path_buf();
        let scores = HighScores::load(&path)?;
        Ok(Self { path, scores })
    }

    pub fn scores(&self) -> &HighScores {
        &self.scores
    }
}

impl LeaderboardService for FileLeaderboard {
    fn submit_score(&mut self, name: &str, score: u64) -> Result<(), LeaderboardError> {
        self.scores.submit_score(name, score)?;
        self.scores.save(&self.path)
    }

    fn load_top_scores(&self) -> Result<Vec<HighScoreEntry>, LeaderboardError> {
        self.scores.load_top_scores()
    }
}

fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
