//! # Core Engine Module
//!
//! Shared configuration used by the engine loop and the scene graph.

pub mod config;

// Re-export commonly used config types
pub use config::{ApplicationConfig, Config, ConfigError, EngineConfig, SceneConfig};
