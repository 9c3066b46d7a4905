//! Scheduler configuration.
//!
//! Layered the same way as the field config: `Default`, then JSON (missing keys keep
//! their default), then `COOP_TETRIS_*` environment variables.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{ConfigError, FieldConfig};
use crate::types::{GRAVITY_INTERVAL_MS, MIN_CONTROLLERS, ROTATION_DEGREES, SPAWN_SPACING};

#[derive(Debug, Error)]
pub enum GameConfigError {
    #[error("config is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] ConfigError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub field: FieldConfig,
    /// Angle applied by one rotate command
    pub rotation_degrees: f64,
    /// Controller `i` (0-based) spawns at `x = spawn_spacing * (i + 1)`
    pub spawn_spacing: i32,
    /// Pieces start spawning once this many controllers are registered
    pub min_controllers: usize,
    pub gravity_interval_ms: u32,
    /// Seed for the shared shape bag
    pub seed: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            field: FieldConfig::default(),
            rotation_degrees: ROTATION_DEGREES,
            spawn_spacing: SPAWN_SPACING,
            min_controllers: MIN_CONTROLLERS,
            gravity_interval_ms: GRAVITY_INTERVAL_MS,
            seed: 1,
        }
    }
}

impl GameConfig {
    /// Create from environment variables.
    ///
    /// Field settings come from [`FieldConfig::from_env`]; on top of that:
    ///
    /// - `COOP_TETRIS_ROTATION`: degrees per rotate command
    /// - `COOP_TETRIS_SPAWN_SPACING`: columns between controller spawn points
    /// - `COOP_TETRIS_MIN_CONTROLLERS`: controllers needed before play starts
    /// - `COOP_TETRIS_GRAVITY_MS`: milliseconds per gravity step
    /// - `COOP_TETRIS_SEED`: shape bag seed
    pub fn from_env() -> Self {
        let mut config = Self {
            field: FieldConfig::from_env(),
            ..Self::default()
        };
        config.apply_env();
        config
    }

    /// Parse JSON. Keys that are absent keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, GameConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Override fields from `COOP_TETRIS_*` variables that are set and parse.
    pub fn apply_env(&mut self) {
        fn var<T: std::str::FromStr>(name: &str) -> Option<T> {
            std::env::var(name).ok().and_then(|s| s.trim().parse().ok())
        }

        if let Some(v) = var("COOP_TETRIS_ROTATION") {
            self.rotation_degrees = v;
        }
        if let Some(v) = var("COOP_TETRIS_SPAWN_SPACING") {
            self.spawn_spacing = v;
        }
        if let Some(v) = var("COOP_TETRIS_MIN_CONTROLLERS") {
            self.min_controllers = v;
        }
        if let Some(v) = var("COOP_TETRIS_GRAVITY_MS") {
            self.gravity_interval_ms = v;
        }
        if let Some(v) = var("COOP_TETRIS_SEED") {
            self.seed = v;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.field.validate()?;
        if !self.rotation_degrees.is_finite() {
            return Err(ConfigError::InvalidValue {
                name: "rotation_degrees",
                reason: format!("{} is not a finite angle", self.rotation_degrees),
            });
        }
        if self.rotation_degrees % 90.0 != 0.0 {
            return Err(ConfigError::InvalidValue {
                name: "rotation_degrees",
                reason: format!("{} is not a multiple of 90", self.rotation_degrees),
            });
        }
        if self.spawn_spacing < 0 {
            return Err(ConfigError::InvalidValue {
                name: "spawn_spacing",
                reason: "must not be negative".to_string(),
            });
        }
        if self.min_controllers == 0 {
            return Err(ConfigError::InvalidValue {
                name: "min_controllers",
                reason: "at least one controller is required".to_string(),
            });
        }
        if self.gravity_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                name: "gravity_interval_ms",
                reason: "must be positive".to_string(),
            });
        }
        Ok(())
    }
}
