//! Placement error types

use thiserror::Error;

/// Result type for placement planning
pub type PlacementResult<T> = Result<T, PlacementError>;

/// Errors raised while planning shadow placement
#[derive(Debug, Clone, Error)]
pub enum PlacementError {
    /// The source collection is missing or hosts no replicas. Fatal to the
    /// creation operation; no partial collection is created, and retrying is
    /// the caller's decision, not the planner's.
    #[error("source collection '{collection}' unavailable: {reason}")]
    SourceCollectionUnavailable {
        /// The collection the shadow was to mirror
        collection: String,
        /// Why its topology was unusable
        reason: String,
    },
}
