//! treejoin - descendant resolution and shadow placement for document stores
//!
//! A hierarchy (folder tree) lives in its own collection beside the documents
//! it governs, so restructuring the tree never rewrites documents. This crate
//! answers "is document D under node N" two independent ways (parent-pointer
//! traversal and materialized-path prefix match), plans the cross-collection
//! join that applies the answer to a document query, and derives the replica
//! placement that keeps the hierarchy collection colocated with the documents.

pub mod hierarchy;
pub mod join;
pub mod observability;
pub mod placement;
pub mod resolver;
pub mod store;
