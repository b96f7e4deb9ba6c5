//! Balance constants and trait tables loaded from TOML.

use crate::personality::TraitBook;
use error::{EngineError, EngineResult};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Numeric knobs used by the engines. Every field has a default so a config
/// file only needs to name what it overrides.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Edge length of a map tile in world units.
    pub tile_size: f32,
    /// Ticks between attacks at attack speed 1.0.
    pub attack_cooldown_base: f32,
    /// Cap on the distance-based movement speed bonus.
    pub max_speed_bonus: f32,
    /// Consecutive blocked ticks tolerated before a unit is relocated.
    pub stuck_threshold: u32,
    /// Minimum ticks between two AI debug notifications for one unit.
    pub debug_throttle_ticks: u64,
    /// How many tiles behind its target a backstab lands.
    pub backstab_offset_tiles: f32,
    /// Lifetime of the teleport visual, in ticks.
    pub teleport_vfx_ticks: u32,
    pub ticks_per_second: u32,
    /// Number of published events kept in the bus history.
    pub event_history: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tile_size: 32.0,
            attack_cooldown_base: 60.0,
            max_speed_bonus: 5.0,
            stuck_threshold: 180,
            debug_throttle_ticks: 30,
            backstab_offset_tiles: 1.0,
            teleport_vfx_ticks: 12,
            ticks_per_second: 60,
            event_history: 256,
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(source: &str) -> EngineResult<Self> {
        Ok(ConfigFile::parse(source)?.engine)
    }

    pub fn load(path: &Path) -> EngineResult<Self> {
        Self::from_toml_str(&fs::read_to_string(path)?)
    }

    fn validate(&self) -> EngineResult<()> {
        if self.tile_size <= 0.0 {
            return Err(EngineError::Config(format!(
                "tile_size must be positive, got {}",
                self.tile_size
            )));
        }
        if self.attack_cooldown_base <= 0.0 {
            return Err(EngineError::Config(
                "attack_cooldown_base must be positive".to_string(),
            ));
        }
        if self.ticks_per_second == 0 {
            return Err(EngineError::Config(
                "ticks_per_second must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Whole config file: `[engine]` constants plus `[traits.<id>]` tables.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub engine: EngineConfig,
    pub traits: TraitBook,
}

impl ConfigFile {
    pub fn parse(source: &str) -> EngineResult<Self> {
        let file: ConfigFile = toml::from_str(source)?;
        file.engine.validate()?;
        Ok(file)
    }

    pub fn load(path: &Path) -> EngineResult<Self> {
        Self::parse(&fs::read_to_string(path)?)
    }
}
