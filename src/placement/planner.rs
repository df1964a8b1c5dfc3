//! Shadow placement planning
//!
//! Colocation by construction: a shadow collection is placed on exactly the
//! distinct nodes hosting any replica of its source collection, one shard,
//! one replica per node. Every node holding a document shard then has a local
//! copy of the hierarchy, so join fan-out is bounded by the number of
//! document-hosting nodes, not cluster size.

use super::errors::{PlacementError, PlacementResult};
use super::plan::PlacementPlan;
use crate::observability::Logger;
use crate::store::{CollectionTopology, CreateCollection, DocumentStore};

/// Derives shadow-collection placement from a source collection's topology
pub struct ShadowPlacementPlanner;

impl ShadowPlacementPlanner {
    /// Plans placement from a topology snapshot.
    ///
    /// The node set is a snapshot: replicas added to the source afterwards
    /// are not tracked. Zero replicas fail with `SourceCollectionUnavailable`.
    pub fn plan(topology: &CollectionTopology) -> PlacementResult<PlacementPlan> {
        let node_set = topology.distinct_nodes();
        if node_set.is_empty() {
            return Err(PlacementError::SourceCollectionUnavailable {
                collection: topology.collection.clone(),
                reason: "collection hosts no replicas".to_string(),
            });
        }

        let plan = PlacementPlan::mirroring(node_set);
        Logger::info(
            "SHADOW_PLAN",
            &[
                ("source", &topology.collection),
                ("nodes", &plan.replica_count.to_string()),
            ],
        );
        Ok(plan)
    }

    /// Fetches `source`'s topology from the store, then plans.
    ///
    /// A store that cannot describe the source (unknown collection, outage)
    /// fails the same way an empty topology does; the planner never retries.
    pub fn plan_for<S: DocumentStore>(store: &S, source: &str) -> PlacementResult<PlacementPlan> {
        let topology = store.describe_topology(source).map_err(|err| {
            PlacementError::SourceCollectionUnavailable {
                collection: source.to_string(),
                reason: err.to_string(),
            }
        })?;
        Self::plan(&topology)
    }

    /// Builds the creation request for a shadow of `source` named `shadow`.
    ///
    /// Returns the request rather than issuing it; processing it (and any
    /// retry policy) belongs to the caller driving the admin API.
    pub fn shadow_create<S: DocumentStore>(
        store: &S,
        source: &str,
        shadow: &str,
    ) -> PlacementResult<CreateCollection> {
        let plan = Self::plan_for(store, source)?;
        Ok(plan.create_request(shadow))
    }
}
