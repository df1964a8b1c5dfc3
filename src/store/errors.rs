//! Document store error types
//!
//! Store failures are propagated to callers unchanged; nothing in this crate
//! retries. `FilterTermLimitExceeded` is the one error the join planner
//! recovers from locally, by chunking before the store ever sees the filter.

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by a document store implementation
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Collection does not exist
    #[error("collection '{0}' does not exist")]
    UnknownCollection(String),

    /// A filter carried more explicit terms than the store accepts
    #[error("filter has {terms} terms, store limit is {limit}")]
    FilterTermLimitExceeded {
        /// Terms in the offending filter
        terms: usize,
        /// Store's per-filter limit
        limit: usize,
    },

    /// The store lacks a query capability the filter requires
    #[error("store does not support {0}")]
    Unsupported(&'static str),

    /// Collection creation rejected
    #[error("cannot create collection '{collection}': {reason}")]
    CreateRejected {
        /// Collection being created
        collection: String,
        /// Why the request was rejected
        reason: String,
    },

    /// Document is not usable as a store record
    #[error("malformed document: {0}")]
    MalformedDocument(String),
}
