//! Core engine implementation

use crate::{
    application::{AppError, Application},
    core::config::{ApplicationConfig, ConfigError},
    foundation::time::Timer,
    registry::Registry,
    scene::{FrameStats, Scene, SceneError},
};
use thiserror::Error;

/// Main engine struct
///
/// The engine owns the instance registry and the active scene, and drives
/// the headless main loop.
pub struct Engine {
    /// Engine configuration
    config: ApplicationConfig,

    /// Issuer of object and component ids
    registry: Registry,

    /// Active scene
    scene: Scene,

    /// Frame timing
    timer: Timer,

    /// Whether the engine should continue running
    running: bool,

    /// Frames completed
    frames: u64,
}

impl Engine {
    /// Create a new engine instance
    pub fn new(config: ApplicationConfig) -> Result<Self, EngineError> {
        config.validate()?;
        log::info!("Initializing engine...");

        let registry = Registry::new();
        let scene = Scene::new(registry.clone(), &config.scene, &config.engine)?;

        Ok(Self {
            config,
            registry,
            scene,
            timer: Timer::new(),
            running: true,
            frames: 0,
        })
    }

    /// Run the engine main loop with the given application
    pub fn run<T: Application>(config: ApplicationConfig, app: &mut T) -> Result<(), EngineError> {
        let mut engine = Self::new(config)?;

        // Initialize application
        app.initialize(&mut engine)
            .map_err(|e| EngineError::from_app("App initialization", e))?;

        log::info!("Starting main loop...");
        engine.scene.start();

        while engine.running {
            engine.timer.update();
            let delta_time = engine.timer.delta_time();

            // Update application
            if let Err(e) = app.update(&mut engine, delta_time) {
                app.cleanup(&mut engine);
                return Err(EngineError::from_app("App update", e));
            }

            engine.frame(delta_time);

            if let Some(max) = engine.config.engine.max_frames {
                if engine.frames >= max {
                    log::info!("Reached frame limit ({})", max);
                    engine.running = false;
                }
            }
        }

        // Cleanup
        app.cleanup(&mut engine);

        log::info!(
            "Engine shutdown complete after {} frames ({:.2}s)",
            engine.frames,
            engine.timer.total_time()
        );
        Ok(())
    }

    /// Advance the scene by one frame
    pub fn frame(&mut self, delta_time: f32) -> FrameStats {
        let stats = self.scene.frame(delta_time);
        self.frames += 1;
        stats
    }

    /// Request engine shutdown
    pub fn quit(&mut self) {
        log::info!("Engine shutdown requested");
        self.running = false;
    }

    /// Whether the main loop keeps going
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Get the configuration the engine was started with
    pub fn config(&self) -> &ApplicationConfig {
        &self.config
    }

    /// Get the instance registry
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Get the active scene
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Get mutable access to the active scene
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// Frames completed so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Get the current frame delta time
    pub fn delta_time(&self) -> f32 {
        self.timer.delta_time()
    }
}

/// Engine-level errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Scene graph error
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    /// Application error
    #[error("Application error: {0}")]
    ApplicationError(String),
}

impl EngineError {
    /// Keep engine and scene failures typed; flatten the rest with `context`
    fn from_app(context: &str, error: AppError) -> Self {
        match error {
            AppError::Engine(err) => err,
            AppError::Scene(err) => Self::Scene(err),
            AppError::Custom(msg) => Self::ApplicationError(format!("{}: {}", context, msg)),
        }
    }
}
