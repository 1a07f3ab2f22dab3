//! Scene: a scene graph plus the per-frame message phases

use super::component::Message;
use super::scene_graph::{SceneError, SceneGraph};
use crate::core::config::{EngineConfig, SceneConfig};
use crate::foundation::time::FixedTimestep;
use crate::registry::Registry;

/// What happened during one [`Scene::frame`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    /// Index of the frame, starting at 0
    pub frame: u64,
    /// Fixed-update ticks run this frame
    pub fixed_steps: u32,
    /// Whether the caches were rebuilt at the start of the frame
    pub rebuilt: bool,
    /// Active objects dispatched to
    pub objects: usize,
    /// Transforms propagated
    pub transforms: usize,
}

/// A running scene
pub struct Scene {
    name: String,
    graph: SceneGraph,
    started: bool,
    frame: u64,
    fixed: FixedTimestep,
}

impl Scene {
    /// Create a scene with an empty scene graph
    pub fn new(
        registry: Registry,
        scene: &SceneConfig,
        engine: &EngineConfig,
    ) -> Result<Self, SceneError> {
        Ok(Self {
            name: scene.name.clone(),
            graph: SceneGraph::new(registry, scene)?,
            started: false,
            frame: 0,
            fixed: FixedTimestep::new(engine.fixed_timestep, engine.max_fixed_steps),
        })
    }

    /// Scene name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The scene graph
    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    /// The scene graph, mutably
    pub fn graph_mut(&mut self) -> &mut SceneGraph {
        &mut self.graph
    }

    /// Whether [`Scene::start`] has run
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Frames run so far
    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    /// Send `Awake` then `Start` to every active object. Runs once.
    pub fn start(&mut self) {
        if self.started {
            return;
        }

        self.graph.refresh();
        self.graph.send_message(Message::Awake);
        self.graph.send_message(Message::Start);
        self.started = true;
        log::info!("Scene '{}' started with {} objects", self.name, self.graph.objects().len());
    }

    /// Run one frame: fixed ticks, update, late update, transform
    /// propagation, then the overlay pass.
    pub fn frame(&mut self, dt: f32) -> FrameStats {
        if !self.started {
            self.start();
        }

        let rebuilt = self.graph.refresh();

        let fixed_steps = self.fixed.advance(dt);
        for _ in 0..fixed_steps {
            self.graph.send_message(Message::FixedUpdate);
        }
        self.graph.send_message(Message::Update);
        self.graph.send_message(Message::LateUpdate);
        let transforms = self.graph.propagate_transforms();
        self.graph.send_message(Message::GuiRender);

        let stats = FrameStats {
            frame: self.frame,
            fixed_steps,
            rebuilt,
            objects: self.graph.objects().len(),
            transforms,
        };
        self.frame += 1;
        log::trace!("Scene '{}' frame {:?}", self.name, stats);
        stats
    }
}
