//! Placement plan

use crate::store::CreateCollection;

/// Replica layout for a shadow collection, snapshotted from its source.
///
/// One shard always: the hierarchy is small next to the documents it governs,
/// and an unsharded collection can be fully replicated onto every node that
/// holds a document shard, which is what keeps joins local.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementPlan {
    /// Distinct nodes hosting the source collection, first-seen order
    pub node_set: Vec<String>,
    /// One replica per node in the set
    pub replica_count: usize,
    /// Always 1
    pub shard_count: u32,
}

impl PlacementPlan {
    /// Plan covering the given node set
    pub fn mirroring(node_set: Vec<String>) -> Self {
        let replica_count = node_set.len();
        Self {
            node_set,
            replica_count,
            shard_count: 1,
        }
    }

    /// Renders the plan as a collection-creation request
    pub fn create_request(&self, collection: impl Into<String>) -> CreateCollection {
        CreateCollection::new(collection)
            .with_shards(self.shard_count)
            .with_replicas(self.replica_count as u32)
            .with_node_set(self.node_set.clone())
    }
}
