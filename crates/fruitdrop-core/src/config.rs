//! Game configuration.
//!
//! [`GameConfig`] holds the bin geometry, timing thresholds, fruit material and
//! the level table. Every field has a compiled default, so a JSON file only
//! needs the keys it wants to override.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::level::{LevelTable, MAX_LEVELS};

/// Physical material shared by every fruit body.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FruitMaterial {
    pub restitution: f32,
    pub friction: f32,
    pub density: f32,
}

impl Default for FruitMaterial {
    fn default() -> Self {
        Self {
            restitution: 0.2,
            friction: 0.5,
            density: 1.0,
        }
    }
}

/// Runtime-tunable game configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    // Bin geometry (y grows downward)
    pub bin_left: f32,
    pub bin_right: f32,
    pub bin_bottom: f32,
    pub wall_thickness: f32,
    pub wall_height: f32,

    // Lines
    pub danger_line_y: f32,
    pub preview_y: f32,

    // Timing
    pub merge_delay_ms: u64,
    pub danger_dwell_ms: u64,
    pub suspend_merges_while_paused: bool,

    // Spawning
    pub spawn_pool: usize,

    pub fruit_material: FruitMaterial,
    pub levels: LevelTable,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            bin_left: 0.0,
            bin_right: 400.0,
            bin_bottom: 640.0,
            wall_thickness: 20.0,
            wall_height: 640.0,
            danger_line_y: 110.0,
            preview_y: 50.0,
            merge_delay_ms: 50,
            danger_dwell_ms: 1000,
            suspend_merges_while_paused: false,
            spawn_pool: 4,
            fruit_material: FruitMaterial::default(),
            levels: LevelTable::classic(),
        }
    }
}

impl GameConfig {
    /// Parses a config from JSON and validates it.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a JSON config file and validates it.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn merge_delay(&self) -> Duration {
        Duration::from_millis(self.merge_delay_ms)
    }

    pub fn danger_dwell(&self) -> Duration {
        Duration::from_millis(self.danger_dwell_ms)
    }

    pub fn bin_width(&self) -> f32 {
        self.bin_right - self.bin_left
    }

    pub fn bin_center_x(&self) -> f32 {
        (self.bin_left + self.bin_right) / 2.0
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.levels.is_empty() {
            return Err(ConfigError::Invalid("level table is empty".into()));
        }
        if self.levels.len() > MAX_LEVELS {
            return Err(ConfigError::Invalid(format!(
                "level table has {} entries, at most {MAX_LEVELS} are supported",
                self.levels.len()
            )));
        }
        if let Some(level) = self
            .levels
            .iter()
            .find(|l| !l.radius.is_finite() || l.radius <= 0.0)
        {
            return Err(ConfigError::Invalid(format!(
                "level '{}' has invalid radius {}",
                level.label, level.radius
            )));
        }
        let geometry = [
            ("bin_left", self.bin_left),
            ("bin_right", self.bin_right),
            ("bin_bottom", self.bin_bottom),
            ("wall_thickness", self.wall_thickness),
            ("wall_height", self.wall_height),
            ("danger_line_y", self.danger_line_y),
            ("preview_y", self.preview_y),
        ];
        if let Some((name, value)) = geometry.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ConfigError::Invalid(format!("{name} must be finite, got {value}")));
        }
        if self.bin_right <= self.bin_left {
            return Err(ConfigError::Invalid(format!(
                "bin_right ({}) must be greater than bin_left ({})",
                self.bin_right, self.bin_left
            )));
        }
        if self.levels.largest_radius() * 2.0 > self.bin_width() {
            return Err(ConfigError::Invalid(format!(
                "largest fruit (radius {}) does not fit in a bin of width {}",
                self.levels.largest_radius(),
                self.bin_width()
            )));
        }
        if self.wall_thickness <= 0.0 || self.wall_height <= 0.0 {
            return Err(ConfigError::Invalid(
                "wall_thickness and wall_height must be positive".into(),
            ));
        }
        if self.spawn_pool == 0 {
            return Err(ConfigError::Invalid("spawn_pool must be at least 1".into()));
        }
        Ok(())
    }
}
