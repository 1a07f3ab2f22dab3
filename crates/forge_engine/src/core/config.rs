//! # Unified Configuration System
//!
//! Configuration for engine behavior and the scene graph, grouped under a
//! single [`ApplicationConfig`] that loads from TOML or RON.
//!
//! Every section uses `#[serde(default)]`, so a file only needs the keys it
//! wants to override:
//!
//! ```toml
//! [engine]
//! log_level = "debug"
//! max_frames = 600
//!
//! [scene]
//! name = "arena"
//! ```

use serde::{Deserialize, Serialize};

pub use crate::config::{Config, ConfigError, ConfigFormat};
use crate::graph::DESCRIPTOR_LIMIT;

/// Name given to the synthetic root object of every scene graph
pub const DEFAULT_ROOT_NAME: &str = "__root_node__";

/// # Engine Configuration
///
/// Core engine behavior: logging and loop timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Log level used when `RUST_LOG` is not set
    pub log_level: String,
    /// Stop the main loop after this many frames (unbounded if `None`)
    pub max_frames: Option<u64>,
    /// Seconds per fixed-update tick
    pub fixed_timestep: f32,
    /// Upper bound on fixed-update ticks run in a single frame
    pub max_fixed_steps: u32,
}

impl EngineConfig {
    /// Create a new engine configuration
    pub fn new() -> Self {
        Self {
            log_level: "info".to_string(),
            max_frames: None,
            fixed_timestep: 1.0 / 60.0,
            max_fixed_steps: 5,
        }
    }

    /// Set log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Stop after `frames` frames
    pub fn with_max_frames(mut self, frames: u64) -> Self {
        self.max_frames = Some(frames);
        self
    }

    /// Set the fixed-update step in seconds
    pub fn with_fixed_timestep(mut self, step: f32) -> Self {
        self.fixed_timestep = step;
        self
    }

    /// Validate the engine settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fixed_timestep.is_finite() && self.fixed_timestep > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "fixed_timestep must be positive, got {}",
                self.fixed_timestep
            )));
        }
        if self.max_fixed_steps == 0 {
            return Err(ConfigError::Invalid("max_fixed_steps must be at least 1".to_string()));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Scene Configuration
///
/// Settings for the scene graph built at engine start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Scene name, used in logs
    pub name: String,
    /// Name of the synthetic root object
    pub root_name: String,
    /// Maximum number of live objects, root included
    pub max_objects: usize,
}

impl SceneConfig {
    /// Create a new scene configuration
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            root_name: DEFAULT_ROOT_NAME.to_string(),
            max_objects: DESCRIPTOR_LIMIT,
        }
    }

    /// Cap the number of live objects
    pub fn with_max_objects(mut self, max_objects: usize) -> Self {
        self.max_objects = max_objects;
        self
    }

    /// Validate the scene settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.root_name.is_empty() {
            return Err(ConfigError::Invalid("root_name cannot be empty".to_string()));
        }
        if self.max_objects == 0 {
            return Err(ConfigError::Invalid(
                "max_objects must leave room for the root object".to_string(),
            ));
        }
        if self.max_objects > DESCRIPTOR_LIMIT {
            return Err(ConfigError::Invalid(format!(
                "max_objects cannot exceed {}",
                DESCRIPTOR_LIMIT
            )));
        }
        Ok(())
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self::new("main")
    }
}

/// # Complete Application Configuration
///
/// Top-level configuration that encompasses all engine subsystems.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationConfig {
    /// Engine core configuration
    pub engine: EngineConfig,
    /// Scene graph configuration
    pub scene: SceneConfig,
}

impl ApplicationConfig {
    /// Create a configuration with defaults and the given scene name
    pub fn new(scene_name: impl Into<String>) -> Self {
        Self {
            engine: EngineConfig::default(),
            scene: SceneConfig::new(scene_name),
        }
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.engine.validate()?;
        self.scene.validate()?;
        Ok(())
    }
}

impl Config for ApplicationConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ApplicationConfig::default();

        assert!(config.validate().is_ok());
        assert_eq!(config.scene.root_name, DEFAULT_ROOT_NAME);
        assert_eq!(config.engine.max_fixed_steps, 5);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let text = r#"
            [engine]
            log_level = "debug"
            max_frames = 10

            [scene]
            name = "arena"
        "#;
        let config = ApplicationConfig::from_str_with_format(text, ConfigFormat::Toml).unwrap();

        assert_eq!(config.engine.log_level, "debug");
        assert_eq!(config.engine.max_frames, Some(10));
        assert_eq!(config.scene.name, "arena");
        assert_eq!(config.scene.root_name, DEFAULT_ROOT_NAME);
        assert_eq!(config.scene.max_objects, DESCRIPTOR_LIMIT);
    }

    #[test]
    fn test_ron_roundtrip_through_text() {
        let config = ApplicationConfig::new("ron_scene");
        let text = config.to_string_with_format(ConfigFormat::Ron).unwrap();
        let parsed = ApplicationConfig::from_str_with_format(&text, ConfigFormat::Ron).unwrap();

        assert_eq!(parsed, config);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = ApplicationConfig::default();
        config.engine.fixed_timestep = 0.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = ApplicationConfig::default();
        config.scene.max_objects = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = ApplicationConfig::default();
        config.scene.root_name.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_engine_section_lists_loop_settings_only() {
        let text = ApplicationConfig::default()
            .to_string_with_format(ConfigFormat::Toml)
            .unwrap();

        assert!(text.contains("fixed_timestep"));
        assert!(text.contains("max_fixed_steps"));
        assert!(!text.contains("debug_mode"));
    }

    #[test]
    fn test_malformed_text_is_parse_error() {
        let result = ApplicationConfig::from_str_with_format("[engine", ConfigFormat::Toml);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
