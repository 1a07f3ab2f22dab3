//! Vertex handles and the payload capability stored at each vertex

use std::fmt;
use std::hash::Hash;

/// Opaque handle identifying a live vertex in a [`Graph`](super::Graph).
///
/// Descriptors are issued by the graph, never by callers. A negative
/// descriptor is always invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Descriptor(i32);

impl Descriptor {
    /// Wrap a raw descriptor value
    pub const fn new(raw: i32) -> Self {
        Self(raw)
    }

    /// Get the raw descriptor value
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Whether this descriptor is well formed (non-negative)
    pub const fn is_valid(self) -> bool {
        self.0 >= 0
    }
}

impl From<i32> for Descriptor {
    fn from(raw: i32) -> Self {
        Self(raw)
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Anything that can be stored at a graph vertex.
///
/// The identity returned by [`Node::id`] must stay stable for as long as the
/// node is stored in a graph; the graph indexes vertices by it.
pub trait Node {
    /// Identity type of the payload
    type Id: Copy + Eq + Hash + fmt::Debug;

    /// Stable identity of this node
    fn id(&self) -> Self::Id;

    /// Whether this node reports itself as active
    fn active(&self) -> bool;
}
