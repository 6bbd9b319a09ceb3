//! Fixed-step accumulator
//!
//! Converts variable frame deltas into discrete logical steps. Each cadence
//! (player movement, enemy movement) owns its own accumulator.

use serde::{Deserialize, Serialize};

/// Accumulates elapsed milliseconds and hands out at most one step per call
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Accumulator {
    accumulated_ms: f64,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add elapsed time. Negative or non-finite deltas are ignored.
    pub fn advance(&mut self, delta_ms: f64) {
        if delta_ms.is_finite() && delta_ms > 0.0 {
            self.accumulated_ms += delta_ms;
        }
    }

    /// Take one step of `interval_ms` if enough time has accumulated.
    ///
    /// Never loops to catch up: an oversized delta still yields a single step,
    /// leaving the remainder for later calls.
    pub fn consume_step(&mut self, interval_ms: f64) -> bool {
        if self.accumulated_ms >= interval_ms {
            self.accumulated_ms -= interval_ms;
            true
        } else {
            false
        }
    }

    pub fn accumulated_ms(&self) -> f64 {
        self.accumulated_ms
    }

    pub fn reset(&mut self) {
        self.accumulated_ms = 0.0;
    }
}
