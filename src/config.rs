//! Simulation settings, loadable from a TOML file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default world width in cells
pub const WORLD_WIDTH: u32 = 60;
/// Default world height in cells
pub const WORLD_HEIGHT: u32 = 60;
/// Default simulation rate
pub const PHYSICS_HZ: u32 = 20;
/// Default display rate the driver assumes
pub const RENDER_HZ: u32 = 60;
/// A tick fires once this fraction of a step has elapsed, which keeps the real
/// rate closer to the target when frames land slightly early.
pub const STEP_TOLERANCE: f32 = 0.98;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub width: u32,
    pub height: u32,
    pub physics_hz: u32,
    pub render_hz: u32,
    pub step_tolerance: f32,
    /// Seed for the tie-break generator. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            width: WORLD_WIDTH,
            height: WORLD_HEIGHT,
            physics_hz: PHYSICS_HZ,
            render_hz: RENDER_HZ,
            step_tolerance: STEP_TOLERANCE,
            seed: None,
        }
    }
}

impl SimConfig {
    /// Parse and validate a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        log::info!(
            "Loaded config from {}: {}x{} world at {} Hz",
            path.display(),
            config.width,
            config.height,
            config.physics_hz
        );
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptyWorld {
                width: self.width,
                height: self.height,
            });
        }
        if self.physics_hz == 0 {
            return Err(ConfigError::ZeroRate {
                field: "physics_hz",
                value: self.physics_hz,
            });
        }
        if self.render_hz == 0 {
            return Err(ConfigError::ZeroRate {
                field: "render_hz",
                value: self.render_hz,
            });
        }
        if !(self.step_tolerance > 0.0 && self.step_tolerance <= 1.0) {
            return Err(ConfigError::StepTolerance(self.step_tolerance));
        }
        Ok(())
    }

    /// Seconds of real time per simulation step.
    pub fn step_seconds(&self) -> f32 {
        1.0 / self.physics_hz as f32
    }

    /// Seconds of real time per rendered frame.
    pub fn frame_seconds(&self) -> f32 {
        1.0 / self.render_hz as f32
    }
}
