//! Graph error taxonomy

use super::Descriptor;
use thiserror::Error;

/// Errors returned by graph queries and structural mutations
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphError {
    /// Negative or otherwise malformed descriptor
    #[error("invalid descriptor: {0}")]
    InvalidDescriptor(Descriptor),

    /// Well-formed descriptor that is not currently live
    #[error("descriptor not found: {0}")]
    DescriptorNotFound(Descriptor),

    /// A vertex carrying the same node identity is already live
    #[error("descriptor already exists: {0}")]
    DescriptorExists(Descriptor),

    /// The descriptor space of this graph is exhausted
    #[error("descriptor limit reached")]
    DescriptorLimitReached,

    /// Root vertex queried for a parent
    #[error("descriptor has no parent: {0}")]
    NoParent(Descriptor),

    /// The mutation would make a vertex its own ancestor
    #[error("parent descriptor {parent} is a descendant of {descriptor}")]
    Descendant {
        /// Vertex being linked or moved
        descriptor: Descriptor,
        /// Requested parent
        parent: Descriptor,
    },

    /// The edge is already present
    #[error("edge already exists: {parent}->{child}")]
    EdgeExists {
        /// Edge source
        parent: Descriptor,
        /// Edge target
        child: Descriptor,
    },

    /// The child already hangs under another parent
    #[error("descriptor {descriptor} already has parent {parent}")]
    HasParent {
        /// Vertex that already has a parent
        descriptor: Descriptor,
        /// Its current parent
        parent: Descriptor,
    },
}

/// Result alias for graph operations
pub type GraphResult<T> = Result<T, GraphError>;
