//! Document store boundary and in-memory engine
//!
//! The crate treats the distributed store as an opaque collaborator behind
//! [`DocumentStore`]; [`MemoryDocumentStore`] is the bundled implementation
//! for tests and embedded use. No retries, no connection management — those
//! belong to real store clients.

mod client;
mod errors;
mod memory;

pub use client::{
    CollectionTopology, CommitReceipt, CreateCollection, DocumentStore, Replica, Shard,
    StoreCapabilities,
};
pub use errors::{StoreError, StoreResult};
pub use memory::{MemoryDocumentStore, ID_FIELD};
