//! Score and player speed
//!
//! All score mutation goes through [`ScoreState::apply_delta`] so the
//! floor-at-zero and speed-threshold rules live in one place.

use serde::{Deserialize, Serialize};

use crate::config::SpeedConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreState {
    score: u64,
    step_interval_ms: u32,
    speed: SpeedConfig,
}

impl ScoreState {
    pub fn new(speed: SpeedConfig) -> Self {
        Self {
            score: 0,
            step_interval_ms: speed.initial_ms,
            speed,
        }
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    /// Base player step interval before buffs
    pub fn step_interval_ms(&self) -> u32 {
        self.step_interval_ms
    }

    /// Apply a signed change, flooring at zero. Gains may shorten the step
    /// interval; losses never lengthen it. Returns the change actually applied.
    pub fn apply_delta(&mut self, delta: i64) -> i64 {
        let before = self.score;
        self.score = if delta >= 0 {
            self.score.saturating_add(delta.unsigned_abs())
        } else {
            self.score.saturating_sub(delta.unsigned_abs())
        };
        if delta > 0 {
            self.recompute_interval();
        }
        self.score as i64 - before as i64
    }

    pub fn reset_score(&mut self) {
        self.score = 0;
        self.step_interval_ms = self.speed.initial_ms;
    }

    fn recompute_interval(&mut self) {
        let steps = self.score / self.speed.increase_interval.max(1);
        let reduction = steps.saturating_mul(u64::from(self.speed.decrease_ms));
        let candidate = u64::from(self.speed.initial_ms)
            .saturating_sub(reduction)
            .max(u64::from(self.speed.minimum_ms)) as u32;
        if candidate < self.step_interval_ms {
            log::info!(
                "Speed updated: {}ms -> {}ms (score {})",
                self.step_interval_ms,
                candidate,
                self.score
            );
            self.step_interval_ms = candidate;
        }
    }
}
