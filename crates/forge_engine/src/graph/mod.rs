//! Generic descriptor-addressed graph
//!
//! A thread-safe forest of payloads where every vertex has at most one
//! parent. The scene graph stores its game objects here, but the graph only
//! knows about the [`Node`] capability.

mod descriptor;
mod error;
#[allow(clippy::module_inception)]
mod graph;
mod vertex;

pub use descriptor::{Descriptor, Node};
pub use error::{GraphError, GraphResult};
pub use graph::{Graph, DESCRIPTOR_LIMIT};
