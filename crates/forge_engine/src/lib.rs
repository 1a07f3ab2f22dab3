//! # Forge Engine
//!
//! A scene-graph engine core: game objects with components, arranged in a
//! descriptor-addressed hierarchy and driven through per-frame message phases.
//!
//! ## Features
//!
//! - **Descriptor Graph**: Thread-safe forest with cycle-checked reparenting
//! - **Scene Graph**: Flattened traversal caches rebuilt on change
//! - **Components**: Capability-selected lifecycle hooks
//! - **Configuration**: TOML and RON config files
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use forge_engine::prelude::*;
//!
//! struct MyApp;
//!
//! impl Application for MyApp {
//!     fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError> {
//!         let ship = GameObject::new(engine.registry(), "ship");
//!         engine.scene_mut().graph_mut().add_object(ship, None)?;
//!         Ok(())
//!     }
//!
//!     fn update(&mut self, engine: &mut Engine, delta_time: f32) -> Result<(), AppError> {
//!         // Update game logic
//!         Ok(())
//!     }
//!
//!     fn cleanup(&mut self, engine: &mut Engine) {
//!         // Cleanup resources
//!     }
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ApplicationConfig::default();
//!     let mut app = MyApp;
//!     Engine::run(config, &mut app)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

// Core engine modules
pub mod core;

pub mod config;
pub mod foundation;
pub mod graph;
pub mod registry;
pub mod scene;

mod application;
mod engine;

pub use application::{AppError, Application};
pub use engine::{Engine, EngineError};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        core::config::{ApplicationConfig, Config, EngineConfig, SceneConfig},
        foundation::{
            math::{Mat4, Pose, Vec3},
            time::{FixedTimestep, Timer},
        },
        graph::{Descriptor, Graph, GraphError, Node},
        registry::{InstanceId, Registry},
        scene::{
            Capabilities, Component, ComponentBase, GameObject, Message, Scene, SceneError,
            SceneGraph, Transform,
        },
        AppError, Application, Engine, EngineError,
    };
}
