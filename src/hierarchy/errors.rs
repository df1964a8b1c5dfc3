//! Hierarchy error types
//!
//! Mutation failures (cyclic move, missing move target) are fatal to the
//! mutation; a missing node on the read path is `Ok(None)`, never an error.

use thiserror::Error;

use super::node::NodeId;
use crate::store::StoreError;

/// Result type for hierarchy operations
pub type HierarchyResult<T> = Result<T, HierarchyError>;

/// Errors raised by the hierarchy model and store
#[derive(Debug, Clone, Error)]
pub enum HierarchyError {
    /// Path segment is empty or contains the path delimiter
    #[error("invalid path segment '{0}'")]
    InvalidSegment(String),

    /// Mutation target does not exist
    #[error("node '{0}' not found")]
    NodeNotFound(NodeId),

    /// Move destination lies inside the moved subtree
    #[error("moving node '{node}' under '{destination}' would create a cycle")]
    CyclicMove {
        /// Node being moved
        node: NodeId,
        /// Requested new parent
        destination: NodeId,
    },

    /// Move destination already has an entry at the resulting path
    #[error("path '{0}' is already taken")]
    PathCollision(String),

    /// Stored document is missing a required hierarchy field
    #[error("hierarchy document is missing field '{0}'")]
    MalformedNode(String),

    /// Underlying store failure, propagated unchanged
    #[error(transparent)]
    Store(#[from] StoreError),
}
