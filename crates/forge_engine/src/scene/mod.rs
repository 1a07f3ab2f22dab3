//! Scene management system
//!
//! Game objects, their components and the scene graph that arranges them.
//!
//! ## Architecture
//!
//! ```text
//! Scene (frame phases)
//!      ↓
//! SceneGraph (flattened caches, dirty tracking)
//!      ↓
//! Graph<GameObject> (descriptors, topology, activity)
//! ```
//!
//! Objects are built off-graph with [`GameObject::add_child`], attached with
//! [`SceneGraph::add_object`], and from then on addressed by
//! [`InstanceId`](crate::registry::InstanceId).

mod component;
mod object;
#[allow(clippy::module_inception)]
mod scene;
mod scene_graph;
mod transform;

#[cfg(test)]
mod tests;

pub use component::{AsAny, Capabilities, Component, ComponentBase, ComponentRef, Message};
pub use object::GameObject;
pub use scene::{FrameStats, Scene};
pub use scene_graph::{SceneError, SceneGraph, SceneGraphListener};
pub use transform::Transform;
