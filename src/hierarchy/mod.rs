//! Hierarchy subsystem
//!
//! The node model, the materialized-path codec, and the store abstraction
//! resolvers read from. The hierarchy is a rooted forest kept in its own
//! collection, decoupled from the documents that reference it: deleting a
//! node never cascades to documents, and a dangling owner reference matches
//! nothing rather than erroring.

mod errors;
mod node;
mod path;
mod store;

pub use errors::{HierarchyError, HierarchyResult};
pub use node::{HierarchyNode, HierarchySchema, NodeId};
pub use path::{PathCodec, DELIMITER};
pub use store::{CollectionHierarchyStore, HierarchyStore};
