//! Transform component
//!
//! Every game object owns exactly one. It keeps the local pose and a cached
//! world matrix that the scene graph recomputes after the hierarchy changes.

use super::component::{Capabilities, Component, ComponentBase};
use crate::foundation::math::{Mat4, Pose, Vec3};
use crate::registry::Registry;

/// Local pose plus cached world matrix
#[derive(Debug, Clone)]
pub struct Transform {
    base: ComponentBase,
    local: Pose,
    world: Mat4,
    world_dirty: bool,
}

impl Transform {
    /// Identity transform with a fresh component id
    pub fn new(registry: &Registry) -> Self {
        Self::from_pose(registry, Pose::identity())
    }

    /// Transform starting at `local`
    pub fn from_pose(registry: &Registry, local: Pose) -> Self {
        Self {
            base: ComponentBase::new(registry, "Transform"),
            local,
            world: Mat4::identity(),
            world_dirty: true,
        }
    }

    /// Local pose
    pub fn local(&self) -> &Pose {
        &self.local
    }

    /// Local pose, mutably. Invalidates the world matrix.
    pub fn local_mut(&mut self) -> &mut Pose {
        self.world_dirty = true;
        &mut self.local
    }

    /// Set the local position
    pub fn set_position(&mut self, position: Vec3) {
        self.local_mut().position = position;
    }

    /// Local TRS matrix
    pub fn local_matrix(&self) -> Mat4 {
        self.local.to_matrix()
    }

    /// Last computed world matrix
    pub fn world_matrix(&self) -> &Mat4 {
        &self.world
    }

    /// World-space position from the last computed world matrix
    pub fn world_position(&self) -> Vec3 {
        Vec3::new(self.world[(0, 3)], self.world[(1, 3)], self.world[(2, 3)])
    }

    /// Whether the world matrix is stale
    pub fn is_world_dirty(&self) -> bool {
        self.world_dirty
    }

    /// Recompute the world matrix from the parent's world matrix
    pub(crate) fn update_world(&mut self, parent_world: &Mat4) {
        self.world = parent_world * self.local.to_matrix();
        self.world_dirty = false;
    }
}

impl Component for Transform {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::PARENT_CHANGED
    }

    fn on_parent_changed(&mut self) {
        self.world_dirty = true;
    }
}
