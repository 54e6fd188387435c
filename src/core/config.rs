//! Environment configuration with documented constants
//!
//! Defaults reproduce the standard oculomotor setup: a 3-minute episode at
//! 60 Hz, a content panel 3 units in front of the camera and a gaze range of
//! ±45 degrees on both axes.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::{OculoError, Result};

/// Episode length in ticks (3 minutes at 60 Hz).
pub const DEFAULT_MAX_STEP_COUNT: u32 = 180 * 60;

/// Camera limits and starting pose.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Pitch restored on reset (radians)
    ///
    /// Slightly positive so the content panel is in view at episode start.
    pub initial_angle_v: f32,

    /// Maximum absolute horizontal angle (radians)
    pub max_angle_h: f32,

    /// Maximum absolute vertical angle (radians)
    pub max_angle_v: f32,

    /// Vertical field of view handed to the renderer (degrees)
    pub fov_y_degrees: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            initial_angle_v: 10.0_f32.to_radians(),
            max_angle_h: 45.0_f32.to_radians(),
            max_angle_v: 45.0_f32.to_radians(),
            fov_y_degrees: 50.0,
        }
    }
}

/// Configuration for an [`Environment`](crate::environment::Environment)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvConfig {
    /// Pixel width and height of the off-screen observation frame
    pub off_buffer_width: u32,

    /// Pixel width and height of the human display frame
    pub on_buffer_width: u32,

    /// Distance from the camera to the content plane (world units)
    pub plane_distance: f32,

    /// Number of ticks in one episode
    ///
    /// `done` is raised on tick `max_step_count - 1`.
    pub max_step_count: u32,

    /// Seed for the task random source; `None` draws from entropy
    pub seed: Option<u64>,

    /// Lower bound on the forward depth used by the perspective divide
    ///
    /// Keeps the projected focus position finite when the gaze runs nearly
    /// parallel to the content plane.
    pub min_forward_depth: f32,

    pub camera: CameraConfig,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            off_buffer_width: 128,
            on_buffer_width: 640,
            plane_distance: 3.0,
            max_step_count: DEFAULT_MAX_STEP_COUNT,
            seed: None,
            min_forward_depth: 1e-3,
            camera: CameraConfig::default(),
        }
    }
}

impl EnvConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Same defaults with a fixed seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Parse a config from TOML; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: EnvConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a TOML file on disk
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.off_buffer_width == 0 || self.on_buffer_width == 0 {
            return Err(OculoError::InvalidConfig(
                "buffer widths must be positive".into(),
            ));
        }

        if !(self.plane_distance > 0.0) {
            return Err(OculoError::InvalidConfig(format!(
                "plane_distance ({}) must be positive",
                self.plane_distance
            )));
        }

        if self.max_step_count == 0 {
            return Err(OculoError::InvalidConfig(
                "max_step_count must be at least 1".into(),
            ));
        }

        if !(self.min_forward_depth > 0.0) {
            return Err(OculoError::InvalidConfig(format!(
                "min_forward_depth ({}) must be positive",
                self.min_forward_depth
            )));
        }

        let camera = &self.camera;
        if !(camera.max_angle_h > 0.0) || !(camera.max_angle_v > 0.0) {
            return Err(OculoError::InvalidConfig(
                "camera angle limits must be positive".into(),
            ));
        }

        if camera.initial_angle_v.abs() > camera.max_angle_v {
            return Err(OculoError::InvalidConfig(format!(
                "initial_angle_v ({}) exceeds max_angle_v ({})",
                camera.initial_angle_v, camera.max_angle_v
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = EnvConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_step_count, 10_800);
        assert_eq!(config.off_buffer_width, 128);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = EnvConfig::from_toml_str(
            r#"
            seed = 42
            off_buffer_width = 84

            [camera]
            fov_y_degrees = 60.0
            "#,
        )
        .unwrap();

        assert_eq!(config.seed, Some(42));
        assert_eq!(config.off_buffer_width, 84);
        assert_eq!(config.on_buffer_width, 640);
        assert_eq!(config.camera.fov_y_degrees, 60.0);
        assert!((config.camera.max_angle_h - 45.0_f32.to_radians()).abs() < 1e-6);
    }

    #[test]
    fn test_invalid_plane_distance_rejected() {
        let result = EnvConfig::from_toml_str("plane_distance = 0.0");
        assert!(matches!(result, Err(OculoError::InvalidConfig(_))));
    }

    #[test]
    fn test_malformed_toml_rejected() {
        let result = EnvConfig::from_toml_str("seed = \"abc\"");
        assert!(matches!(result, Err(OculoError::ConfigParse(_))));
    }
}
