//! Resolver error types

use thiserror::Error;

use crate::hierarchy::{HierarchyError, NodeId};

/// Result type for resolver operations
pub type ResolverResult<T> = Result<T, ResolverError>;

/// Errors raised during descendant resolution
#[derive(Debug, Clone, Error)]
pub enum ResolverError {
    /// Traversal guard tripped: a node was reached twice, or the depth bound
    /// was exceeded with nodes still unexpanded. Fatal and surfaced; the
    /// descendant set is never silently truncated.
    #[error("hierarchy contains a cycle at node '{node}'")]
    CyclicHierarchy {
        /// Node at which the guard tripped
        node: NodeId,
    },

    /// Hierarchy store failure, propagated unchanged
    #[error(transparent)]
    Hierarchy(#[from] HierarchyError),
}
