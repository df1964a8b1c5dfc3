//! Join planner error types

use thiserror::Error;

use crate::resolver::ResolverError;
use crate::store::StoreError;

/// Result type for join planning and execution
pub type JoinResult<T> = Result<T, JoinError>;

/// Errors raised while planning or executing a descendant join
#[derive(Debug, Clone, Error)]
pub enum JoinError {
    /// Pushdown mode was requested but the store lacks a required primitive
    #[error("pushdown mode requires store support for {0}")]
    PushdownUnsupported(&'static str),

    /// Resolution failure, propagated unchanged
    #[error(transparent)]
    Resolver(#[from] ResolverError),

    /// Store failure, propagated unchanged
    #[error(transparent)]
    Store(#[from] StoreError),
}
