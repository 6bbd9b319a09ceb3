//! Timed buff registry
//!
//! One instance per buff id; re-adding an id replaces it and restarts its
//! timer. Effects of the same kind compound multiplicatively.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Identifier of the item that grants a buff
pub type BuffId = u32;

/// What a buff does while active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BuffKind {
    /// Divides the player step interval
    SpeedBoost,
    /// Multiplies the player step interval
    SpeedSlow,
    /// Multiplies normal food points
    ScoreMultiplier,
    /// Enemy hits cost no points
    DamageImmunity,
    /// Awards `magnitude` points per player step
    MovementBonus,
    /// Scatters collectible area items over the board
    AreaItemSpawn,
}

/// A running buff
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BuffInstance {
    pub start_ms: f64,
    pub end_ms: f64,
    pub kind: BuffKind,
    pub magnitude: f64,
}

/// Active buffs keyed by id. Ordered map keeps iteration deterministic.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuffRegistry {
    active: BTreeMap<BuffId, BuffInstance>,
}

impl BuffRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the buff for `id`
    pub fn add(&mut self, id: BuffId, kind: BuffKind, magnitude: f64, duration_ms: u64, now_ms: f64) {
        self.active.insert(
            id,
            BuffInstance {
                start_ms: now_ms,
                end_ms: now_ms + duration_ms as f64,
                kind,
                magnitude,
            },
        );
    }

    /// Remove every buff whose end time has passed, returning their ids
    pub fn prune(&mut self, now_ms: f64) -> Vec<BuffId> {
        let expired: Vec<BuffId> = self
            .active
            .iter()
            .filter(|(_, buff)| buff.end_ms <= now_ms)
            .map(|(id, _)| *id)
            .collect();
        for id in &expired {
            self.active.remove(id);
        }
        expired
    }

    pub fn is_active(&self, id: BuffId) -> bool {
        self.active.contains_key(&id)
    }

    /// Whole milliseconds left on `id`, 0 if absent
    pub fn remaining_ms(&self, id: BuffId, now_ms: f64) -> u64 {
        self.active
            .get(&id)
            .map(|buff| (buff.end_ms - now_ms).max(0.0).ceil() as u64)
            .unwrap_or(0)
    }

    /// Product of magnitudes over active buffs of `kind` (1.0 when none)
    pub fn aggregate_multiplier(&self, kind: BuffKind) -> f64 {
        self.active
            .values()
            .filter(|buff| buff.kind == kind)
            .map(|buff| buff.magnitude)
            .product()
    }

    /// Sum of magnitudes over active buffs of `kind` (0.0 when none)
    pub fn total_magnitude(&self, kind: BuffKind) -> f64 {
        self.active
            .values()
            .filter(|buff| buff.kind == kind)
            .map(|buff| buff.magnitude)
            .sum()
    }

    /// Whether any active buff has the given effect
    pub fn has_effect(&self, kind: BuffKind) -> bool {
        self.active.values().any(|buff| buff.kind == kind)
    }

    pub fn get(&self, id: BuffId) -> Option<&BuffInstance> {
        self.active.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&BuffId, &BuffInstance)> {
        self.active.iter()
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn clear(&mut self) {
        self.active.clear();
    }
}
