//! Turret demo application
//!
//! Builds a small ship hierarchy, spins its turret from a fixed-step script
//! and reshapes the scene graph while the headless main loop runs.

use forge_engine::config::ConfigError;
use forge_engine::foundation::logging;
use forge_engine::foundation::math::{utils::deg_to_rad, Quat, Vec3};
use forge_engine::prelude::*;
use forge_engine::scene::SceneGraphListener;
use std::path::Path;
use thiserror::Error;

const CONFIG_PATH: &str = "forge_demo.toml";
const DEFAULT_FRAMES: u64 = 120;

/// Rotates at a fixed rate on every fixed-update tick
struct Spinner {
    base: ComponentBase,
    degrees_per_second: f32,
    step: f32,
    angle: f32,
}

impl Spinner {
    fn new(registry: &Registry, degrees_per_second: f32, step: f32) -> Self {
        Self {
            base: ComponentBase::new(registry, "Spinner"),
            degrees_per_second,
            step,
            angle: 0.0,
        }
    }
}

impl Component for Spinner {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::START | Capabilities::FIXED_UPDATE
    }

    fn on_start(&mut self) {
        log::info!("Spinner {:?} starting", self.instance_id());
    }

    fn on_fixed_update(&mut self) {
        self.angle = (self.angle + self.degrees_per_second * self.step) % 360.0;
    }
}

/// Logs every scene graph rebuild
struct RebuildLogger;

impl SceneGraphListener for RebuildLogger {
    fn on_scene_graph_update(&mut self, objects: &[InstanceId]) {
        log::debug!("Scene graph rebuilt with {} active objects", objects.len());
    }
}

#[derive(Default)]
struct TurretDemo {
    ship: Option<InstanceId>,
    turret: Option<InstanceId>,
    barrel: Option<InstanceId>,
    hud: Option<InstanceId>,
    frame: u64,
}

impl TurretDemo {
    fn require(id: Option<InstanceId>, what: &str) -> Result<InstanceId, AppError> {
        id.ok_or_else(|| AppError::Custom(format!("{} was never created", what)))
    }

    fn apply_spin(&self, graph: &mut SceneGraph) -> Result<(), AppError> {
        let turret = Self::require(self.turret, "turret")?;
        graph.with_object_mut(turret, |object| {
            let angle = object.component::<Spinner>().map_or(0.0, |s| s.angle);
            object.transform_mut().local_mut().rotation =
                Quat::from_axis_angle(&Vec3::y_axis(), deg_to_rad(angle));
        })?;
        Ok(())
    }
}

impl Application for TurretDemo {
    fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError> {
        let registry = engine.registry().clone();
        let step = engine.config().engine.fixed_timestep;
        let graph = engine.scene_mut().graph_mut();
        graph.set_listener(Box::new(RebuildLogger));

        let mut ship = GameObject::new(&registry, "ship");
        ship.transform_mut().set_position(Vec3::new(0.0, 0.0, -10.0));

        let mut turret = GameObject::new(&registry, "turret");
        turret.transform_mut().set_position(Vec3::new(0.0, 1.0, 0.0));
        turret.add_component(Box::new(Spinner::new(&registry, 90.0, step)));

        let mut barrel = GameObject::new(&registry, "barrel");
        barrel.transform_mut().set_position(Vec3::new(0.0, 0.0, 2.0));

        self.turret = Some(turret.id());
        self.barrel = Some(barrel.id());
        turret.add_child(barrel);
        ship.add_child(turret);
        self.ship = Some(graph.add_object(ship, None)?);

        let mut hud = GameObject::new(&registry, "hud");
        hud.set_active(false);
        self.hud = Some(graph.add_object(hud, None)?);

        log::info!(
            "Scene '{}' built: {} objects, {} active",
            graph.name(),
            graph.len(),
            graph.objects().len()
        );
        Ok(())
    }

    fn update(&mut self, engine: &mut Engine, _delta_time: f32) -> Result<(), AppError> {
        self.frame += 1;
        let graph = engine.scene_mut().graph_mut();
        self.apply_spin(graph)?;

        if self.frame % 30 == 0 {
            if let Some(hud) = self.hud {
                let visible = graph.with_object(hud, |o| o.active())?;
                graph.set_active(hud, !visible)?;
                log::info!("Frame {}: hud {}", self.frame, if visible { "hidden" } else { "shown" });
            }

            let barrel = Self::require(self.barrel, "barrel")?;
            let position = graph.with_object(barrel, |o| o.transform().world_position())?;
            log::info!(
                "Frame {}: barrel at ({:.2}, {:.2}, {:.2})",
                self.frame,
                position.x,
                position.y,
                position.z
            );
        }

        if self.frame == 60 {
            let barrel = Self::require(self.barrel, "barrel")?;
            let ship = Self::require(self.ship, "ship")?;
            graph.move_object(barrel, ship)?;
            log::info!("Frame 60: barrel detached from turret and mounted on ship");
        }

        if self.frame == 90 {
            if let Some(hud) = self.hud.take() {
                let removed = graph.remove_object(hud)?;
                log::info!("Frame 90: removed hud ({} objects)", removed);
            }
        }

        Ok(())
    }

    fn cleanup(&mut self, engine: &mut Engine) {
        let graph = engine.scene().graph();
        log::info!(
            "Turret demo finished after {} frames: {} objects, {} cache rebuilds, {} live ids",
            self.frame,
            graph.len(),
            graph.revision(),
            engine.registry().len()
        );
    }
}

#[derive(Error, Debug)]
enum DemoError {
    #[error("failed to load {path}: {source}")]
    Config {
        path: String,
        #[source]
        source: ConfigError,
    },

    #[error(transparent)]
    Engine(#[from] EngineError),
}

fn load_config() -> Result<ApplicationConfig, DemoError> {
    if Path::new(CONFIG_PATH).exists() {
        return ApplicationConfig::load_from_file(CONFIG_PATH).map_err(|source| DemoError::Config {
            path: CONFIG_PATH.to_string(),
            source,
        });
    }

    let mut config = ApplicationConfig::new("turret_demo");
    config.engine.max_frames = Some(DEFAULT_FRAMES);
    Ok(config)
}

fn main() -> Result<(), DemoError> {
    let config = load_config()?;
    logging::init_with_level(&config.engine.log_level);
    log::info!("Starting turret demo...");

    let mut app = TurretDemo::default();
    Engine::run(config, &mut app)?;
    Ok(())
}
