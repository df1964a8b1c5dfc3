//! Document store boundary
//!
//! The distributed storage/indexing engine is an external collaborator; this
//! trait is the whole surface the crate drives: add documents, commit, query
//! with a filter, describe a collection's replica topology, and create a
//! collection. Connection management, retries, and serialization belong to
//! the store client behind the implementation.

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::errors::StoreResult;
use crate::join::Query;

/// One replica of one shard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replica {
    /// Physical node hosting the replica
    pub node: String,
}

impl Replica {
    /// Creates a replica record
    pub fn new(node: impl Into<String>) -> Self {
        Self { node: node.into() }
    }
}

/// One shard of a collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shard {
    /// Shard name
    pub name: String,
    /// Replicas of this shard
    pub replicas: Vec<Replica>,
}

impl Shard {
    /// Creates a shard record
    pub fn new(name: impl Into<String>, replicas: Vec<Replica>) -> Self {
        Self {
            name: name.into(),
            replicas,
        }
    }
}

/// Snapshot of where a collection's replicas live
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionTopology {
    /// Collection name
    pub collection: String,
    /// Shards with their replicas
    pub shards: Vec<Shard>,
}

impl CollectionTopology {
    /// Creates a topology snapshot
    pub fn new(collection: impl Into<String>, shards: Vec<Shard>) -> Self {
        Self {
            collection: collection.into(),
            shards,
        }
    }

    /// All replica node names, shard by shard, duplicates included
    pub fn replica_nodes(&self) -> impl Iterator<Item = &str> {
        self.shards
            .iter()
            .flat_map(|shard| shard.replicas.iter().map(|r| r.node.as_str()))
    }

    /// Distinct replica node names in first-seen order
    pub fn distinct_nodes(&self) -> Vec<String> {
        let mut nodes = Vec::new();
        for node in self.replica_nodes() {
            if !nodes.iter().any(|n: &String| n == node) {
                nodes.push(node.to_string());
            }
        }
        nodes
    }

    /// Total replica count across all shards
    pub fn replica_count(&self) -> usize {
        self.shards.iter().map(|s| s.replicas.len()).sum()
    }
}

/// Query features a store implementation advertises
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreCapabilities {
    /// Correlated cross-collection join filters
    pub join_subquery: bool,
    /// Graph descendant traversal filters
    pub graph_traversal: bool,
    /// Maximum explicit terms per filter; `None` means unbounded
    pub max_filter_terms: Option<usize>,
}

impl StoreCapabilities {
    /// Full capability set, no term limit
    pub fn full() -> Self {
        Self {
            join_subquery: true,
            graph_traversal: true,
            max_filter_terms: None,
        }
    }

    /// Sets the per-filter term limit
    pub fn with_max_filter_terms(mut self, limit: usize) -> Self {
        self.max_filter_terms = Some(limit);
        self
    }

    /// Disables the join primitive
    pub fn without_join(mut self) -> Self {
        self.join_subquery = false;
        self
    }

    /// Disables graph traversal
    pub fn without_graph(mut self) -> Self {
        self.graph_traversal = false;
        self
    }
}

impl Default for StoreCapabilities {
    fn default() -> Self {
        Self::full()
    }
}

/// Collection-creation request for the store's admin API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateCollection {
    /// Collection name
    pub name: String,
    /// Number of shards
    pub shard_count: u32,
    /// Replicas per shard
    pub replica_count: u32,
    /// Explicit nodes to place replicas on; `None` lets the store choose
    pub node_set: Option<Vec<String>>,
}

impl CreateCollection {
    /// Request with one shard and one replica, store-chosen placement
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shard_count: 1,
            replica_count: 1,
            node_set: None,
        }
    }

    /// Sets the shard count
    pub fn with_shards(mut self, shard_count: u32) -> Self {
        self.shard_count = shard_count;
        self
    }

    /// Sets the replicas-per-shard count
    pub fn with_replicas(mut self, replica_count: u32) -> Self {
        self.replica_count = replica_count;
        self
    }

    /// Pins replica placement to an explicit node set
    pub fn with_node_set(mut self, node_set: Vec<String>) -> Self {
        self.node_set = Some(node_set);
        self
    }
}

/// Receipt for a commit, marking when pending documents became visible
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitReceipt {
    /// Committed collection
    pub collection: String,
    /// Documents made visible by this commit
    pub committed: usize,
    /// Commit time
    pub at: DateTime<Utc>,
}

/// The document/hierarchy store boundary.
///
/// Every operation may be a blocking remote call; implementations are shared
/// across threads, so all methods take `&self`.
pub trait DocumentStore {
    /// Query features this store supports
    fn capabilities(&self) -> StoreCapabilities;

    /// Adds (upserts by id) documents; invisible to queries until commit
    fn add_documents(&self, collection: &str, batch: Vec<Value>) -> StoreResult<()>;

    /// Makes previously added documents visible to queries
    fn commit(&self, collection: &str) -> StoreResult<CommitReceipt>;

    /// Runs a filtered query over committed documents
    fn query(&self, collection: &str, query: &Query) -> StoreResult<Vec<Value>>;

    /// Snapshot of the collection's replica placement
    fn describe_topology(&self, collection: &str) -> StoreResult<CollectionTopology>;

    /// Creates a collection per the request
    fn create_collection(&self, request: &CreateCollection) -> StoreResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distinct_nodes_first_seen_order() {
        let topology = CollectionTopology::new(
            "docs",
            vec![
                Shard::new("s1", vec![Replica::new("node-b"), Replica::new("node-a")]),
                Shard::new("s2", vec![Replica::new("node-a"), Replica::new("node-c")]),
            ],
        );

        assert_eq!(topology.distinct_nodes(), vec!["node-b", "node-a", "node-c"]);
        assert_eq!(topology.replica_count(), 4);
    }

    #[test]
    fn test_capability_builders() {
        let caps = StoreCapabilities::full()
            .without_graph()
            .with_max_filter_terms(512);
        assert!(caps.join_subquery);
        assert!(!caps.graph_traversal);
        assert_eq!(caps.max_filter_terms, Some(512));
    }

    #[test]
    fn test_create_request_builder() {
        let req = CreateCollection::new("folders")
            .with_replicas(3)
            .with_node_set(vec!["a".into(), "b".into(), "c".into()]);
        assert_eq!(req.shard_count, 1);
        assert_eq!(req.replica_count, 3);
        assert_eq!(req.node_set.as_ref().unwrap().len(), 3);
    }
}
