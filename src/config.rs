//! Session configuration
//!
//! Loaded once before a session starts and never mutated while it runs.
//! Defaults reproduce the shipped game balance.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::sim::{BuffId, BuffKind};

/// Smallest board that fits the starting snake and a 2x2 legendary item
pub const MIN_TILE_COUNT: i32 = 4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Cells per side
    pub tile_count: i32,
    /// Pixel size of one cell (renderer hint)
    pub tile_size_px: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            tile_count: 30,
            tile_size_px: 20,
        }
    }
}

/// Player step timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedConfig {
    pub initial_ms: u32,
    pub minimum_ms: u32,
    /// Points per speed-up threshold
    pub increase_interval: u64,
    /// Interval reduction per threshold crossed
    pub decrease_ms: u32,
}

impl Default for SpeedConfig {
    fn default() -> Self {
        Self {
            initial_ms: 100,
            minimum_ms: 50,
            increase_interval: 100,
            decrease_ms: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub normal_food: u64,
    pub legendary_food: u64,
    /// A legendary item appears whenever the score lands on a multiple of this.
    /// Defaults to every 100 points.
    pub legendary_spawn_threshold: u64,
    pub legendary_lifetime_ms: u64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            normal_food: 10,
            legendary_food: 100,
            legendary_spawn_threshold: 100,
            legendary_lifetime_ms: 10_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    pub spawn_threshold: u64,
    pub penalty: u64,
    pub respawn_cooldown_ms: u64,
    pub spawn_countdown_ms: u64,
    pub move_interval_ms: u64,
    /// Spawn cell must be strictly farther than this from the player head
    pub min_spawn_distance: i32,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            spawn_threshold: 10,
            penalty: 10,
            respawn_cooldown_ms: 10_000,
            spawn_countdown_ms: 5_000,
            move_interval_ms: 300,
            min_spawn_distance: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AreaItemConfig {
    /// Maximum simultaneous items while the effect is active
    pub cap: usize,
    pub score_per_item: u64,
}

impl Default for AreaItemConfig {
    fn default() -> Self {
        Self {
            cap: 5,
            score_per_item: 5,
        }
    }
}

/// Renderer hints. The simulation forwards these untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectHints {
    pub normal_explosion_particles: u32,
    pub legendary_explosion_particles: u32,
    /// Number of sprite variants for normal food
    pub food_variants: u32,
}

impl Default for EffectHints {
    fn default() -> Self {
        Self {
            normal_explosion_particles: 15,
            legendary_explosion_particles: 30,
            food_variants: 19,
        }
    }
}

/// Effect granted by eating a particular legendary item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuffDefinition {
    pub name: String,
    pub kind: BuffKind,
    #[serde(alias = "multiplier", alias = "score_per_step")]
    pub magnitude: f64,
    pub duration_ms: u64,
}

impl BuffDefinition {
    fn new(name: &str, kind: BuffKind, magnitude: f64) -> Self {
        Self {
            name: name.to_string(),
            kind,
            magnitude,
            duration_ms: 10_000,
        }
    }
}

/// Full session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub grid: GridConfig,
    pub speed: SpeedConfig,
    pub scoring: ScoringConfig,
    pub enemy: EnemyConfig,
    pub area_items: AreaItemConfig,
    pub effects: EffectHints,
    pub legendary_buffs: BTreeMap<BuffId, BuffDefinition>,
    /// Which legendary ids may spawn
    pub legendary_spawn_rules: BTreeMap<BuffId, bool>,
}

impl Default for GameConfig {
    fn default() -> Self {
        let legendary_buffs = BTreeMap::from([
            (150, BuffDefinition::new("Mewtwo", BuffKind::SpeedSlow, 1.5)),
            (151, BuffDefinition::new("Mew", BuffKind::SpeedBoost, 1.5)),
            (249, BuffDefinition::new("Lugia", BuffKind::ScoreMultiplier, 2.0)),
            (250, BuffDefinition::new("Ho-Oh", BuffKind::DamageImmunity, 1.0)),
            (382, BuffDefinition::new("Kyogre", BuffKind::MovementBonus, 10.0)),
            (383, BuffDefinition::new("Groudon", BuffKind::AreaItemSpawn, 1.0)),
        ]);

        let enabled: [BuffId; 5] = [150, 151, 249, 250, 382];
        let disabled: [BuffId; 16] = [
            383, 384, 483, 484, 487, 643, 644, 646, 716, 717, 791, 792, 888, 889, 1007, 1008,
        ];
        let legendary_spawn_rules = enabled
            .iter()
            .map(|id| (*id, true))
            .chain(disabled.iter().map(|id| (*id, false)))
            .collect();

        Self {
            grid: GridConfig::default(),
            speed: SpeedConfig::default(),
            scoring: ScoringConfig::default(),
            enemy: EnemyConfig::default(),
            area_items: AreaItemConfig::default(),
            effects: EffectHints::default(),
            legendary_buffs,
            legendary_spawn_rules,
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON document. Missing sections fall back to defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject configurations that cannot run a session
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid.tile_count < MIN_TILE_COUNT {
            return Err(ConfigError::invalid(
                "grid.tile_count",
                format!("must be at least {MIN_TILE_COUNT}"),
            ));
        }
        if self.grid.tile_size_px == 0 {
            return Err(ConfigError::invalid("grid.tile_size_px", "must be positive"));
        }
        if self.speed.minimum_ms == 0 {
            return Err(ConfigError::invalid("speed.minimum_ms", "must be positive"));
        }
        if self.speed.initial_ms < self.speed.minimum_ms {
            return Err(ConfigError::invalid(
                "speed.initial_ms",
                "must not be below speed.minimum_ms",
            ));
        }
        if self.speed.increase_interval == 0 {
            return Err(ConfigError::invalid("speed.increase_interval", "must be positive"));
        }
        if self.scoring.legendary_spawn_threshold == 0 {
            return Err(ConfigError::invalid(
                "scoring.legendary_spawn_threshold",
                "must be positive",
            ));
        }
        if self.enemy.move_interval_ms == 0 {
            return Err(ConfigError::invalid("enemy.move_interval_ms", "must be positive"));
        }
        if self.enemy.min_spawn_distance < 0 {
            return Err(ConfigError::invalid(
                "enemy.min_spawn_distance",
                "must not be negative",
            ));
        }
        for (id, buff) in &self.legendary_buffs {
            if !buff.magnitude.is_finite() || buff.magnitude <= 0.0 {
                return Err(ConfigError::invalid(
                    format!("legendary_buffs.{id}.magnitude"),
                    "must be a positive finite number",
                ));
            }
            if buff.duration_ms == 0 {
                return Err(ConfigError::invalid(
                    format!("legendary_buffs.{id}.duration_ms"),
                    "must be positive",
                ));
            }
        }
        Ok(())
    }

    /// Legendary ids allowed to spawn, ascending
    pub fn enabled_legendaries(&self) -> Vec<BuffId> {
        self.legendary_spawn_rules
            .iter()
            .filter(|(_, enabled)| **enabled)
            .map(|(id, _)| *id)
            .collect()
    }
}
