//! In-memory document store
//!
//! A single-process stand-in for the distributed engine, faithful to the
//! behavior the crate depends on: upsert by id, commit-gated visibility,
//! filter evaluation including the join and graph primitives, capability
//! gating, and per-filter term limits. Used by tests and embedded callers.
//!
//! Join and graph filters are flattened to id sets once per query, then every
//! committed document is matched against the flattened form.

use std::collections::{BTreeMap, HashSet};
use std::sync::{Mutex, RwLock};

use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

use super::client::{
    CollectionTopology, CommitReceipt, CreateCollection, DocumentStore, Replica, Shard,
    StoreCapabilities,
};
use super::errors::{StoreError, StoreResult};
use crate::hierarchy::PathCodec;
use crate::join::{Filter, Query};

/// Field every stored document is keyed by
pub const ID_FIELD: &str = "id";

/// Canonical key for an id value; JSON rendering keeps `"1"` and `1` distinct
fn id_key(value: &Value) -> String {
    value.to_string()
}

struct CollectionState {
    pending: Vec<Value>,
    committed: Vec<Value>,
    topology: CollectionTopology,
}

/// In-memory [`DocumentStore`] over a fixed list of cluster nodes
pub struct MemoryDocumentStore {
    capabilities: StoreCapabilities,
    cluster_nodes: Vec<String>,
    placement_cursor: Mutex<usize>,
    collections: RwLock<BTreeMap<String, CollectionState>>,
}

impl MemoryDocumentStore {
    /// Creates a store over the given cluster nodes, full capabilities
    pub fn new<S: Into<String>>(cluster_nodes: impl IntoIterator<Item = S>) -> Self {
        Self {
            capabilities: StoreCapabilities::full(),
            cluster_nodes: cluster_nodes.into_iter().map(Into::into).collect(),
            placement_cursor: Mutex::new(0),
            collections: RwLock::new(BTreeMap::new()),
        }
    }

    /// Single-node store, the common embedded configuration
    pub fn single_node() -> Self {
        Self::new(["node1"])
    }

    /// Overrides the advertised capability set
    pub fn with_capabilities(mut self, capabilities: StoreCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Committed document count, for assertions
    pub fn committed_count(&self, collection: &str) -> StoreResult<usize> {
        let collections = self.collections.read().expect("store lock poisoned");
        collections
            .get(collection)
            .map(|state| state.committed.len())
            .ok_or_else(|| StoreError::UnknownCollection(collection.to_string()))
    }

    fn compile(
        &self,
        collections: &BTreeMap<String, CollectionState>,
        collection: &str,
        filter: &Filter,
    ) -> StoreResult<Compiled> {
        match filter {
            Filter::MatchAll => Ok(Compiled::All),
            Filter::MatchNone => Ok(Compiled::None),
            Filter::Eq { field, value } => Ok(Compiled::Eq {
                field: field.clone(),
                value: value.clone(),
            }),
            Filter::InSet { field, values } => {
                if let Some(limit) = self.capabilities.max_filter_terms {
                    if values.len() > limit {
                        return Err(StoreError::FilterTermLimitExceeded {
                            terms: values.len(),
                            limit,
                        });
                    }
                }
                Ok(Compiled::In {
                    field: field.clone(),
                    keys: values.iter().map(id_key).collect(),
                })
            }
            Filter::DescendantPath {
                field,
                ancestor,
                include_root,
            } => Ok(Compiled::Path {
                field: field.clone(),
                ancestor: ancestor.clone(),
                include_root: *include_root,
            }),
            Filter::GraphDescendants {
                parent_field,
                id_field,
                root,
                include_root,
            } => {
                if !self.capabilities.graph_traversal {
                    return Err(StoreError::Unsupported("graph traversal filters"));
                }
                let state = collections
                    .get(collection)
                    .ok_or_else(|| StoreError::UnknownCollection(collection.to_string()))?;
                let keys = graph_descendant_keys(
                    &state.committed,
                    parent_field,
                    id_field,
                    root,
                    *include_root,
                );
                Ok(Compiled::In {
                    field: id_field.clone(),
                    keys,
                })
            }
            Filter::JoinOnCollection {
                collection: other,
                inner,
                join_field,
                to_field,
            } => {
                if !self.capabilities.join_subquery {
                    return Err(StoreError::Unsupported("join subquery filters"));
                }
                let state = collections
                    .get(other)
                    .ok_or_else(|| StoreError::UnknownCollection(other.clone()))?;
                let compiled_inner = self.compile(collections, other, inner)?;
                let keys = state
                    .committed
                    .iter()
                    .filter(|doc| compiled_inner.matches(doc))
                    .filter_map(|doc| doc.get(join_field))
                    .filter(|value| !value.is_null())
                    .map(id_key)
                    .collect();
                Ok(Compiled::In {
                    field: to_field.clone(),
                    keys,
                })
            }
        }
    }
}

impl DocumentStore for MemoryDocumentStore {
    fn capabilities(&self) -> StoreCapabilities {
        self.capabilities
    }

    fn add_documents(&self, collection: &str, batch: Vec<Value>) -> StoreResult<()> {
        let mut collections = self.collections.write().expect("store lock poisoned");
        let state = collections
            .get_mut(collection)
            .ok_or_else(|| StoreError::UnknownCollection(collection.to_string()))?;
        for mut doc in batch {
            let fields = doc
                .as_object_mut()
                .ok_or_else(|| StoreError::MalformedDocument("not a JSON object".to_string()))?;
            if !fields.contains_key(ID_FIELD) {
                fields.insert(
                    ID_FIELD.to_string(),
                    Value::from(Uuid::new_v4().to_string()),
                );
            }
            state.pending.push(doc);
        }
        Ok(())
    }

    fn commit(&self, collection: &str) -> StoreResult<CommitReceipt> {
        let mut collections = self.collections.write().expect("store lock poisoned");
        let state = collections
            .get_mut(collection)
            .ok_or_else(|| StoreError::UnknownCollection(collection.to_string()))?;
        let pending = std::mem::take(&mut state.pending);
        let committed = pending.len();
        for doc in pending {
            let key = doc.get(ID_FIELD).map(id_key);
            let existing = state
                .committed
                .iter()
                .position(|d| d.get(ID_FIELD).map(id_key) == key);
            match existing {
                Some(index) => state.committed[index] = doc,
                None => state.committed.push(doc),
            }
        }
        Ok(CommitReceipt {
            collection: collection.to_string(),
            committed,
            at: Utc::now(),
        })
    }

    fn query(&self, collection: &str, query: &Query) -> StoreResult<Vec<Value>> {
        let collections = self.collections.read().expect("store lock poisoned");
        let state = collections
            .get(collection)
            .ok_or_else(|| StoreError::UnknownCollection(collection.to_string()))?;

        let mut compiled = Vec::with_capacity(1 + query.filters.len());
        compiled.push(self.compile(&collections, collection, &query.main)?);
        for filter in &query.filters {
            compiled.push(self.compile(&collections, collection, filter)?);
        }

        Ok(state
            .committed
            .iter()
            .filter(|doc| compiled.iter().all(|c| c.matches(doc)))
            .cloned()
            .collect())
    }

    fn describe_topology(&self, collection: &str) -> StoreResult<CollectionTopology> {
        let collections = self.collections.read().expect("store lock poisoned");
        collections
            .get(collection)
            .map(|state| state.topology.clone())
            .ok_or_else(|| StoreError::UnknownCollection(collection.to_string()))
    }

    fn create_collection(&self, request: &CreateCollection) -> StoreResult<()> {
        let mut collections = self.collections.write().expect("store lock poisoned");
        if collections.contains_key(&request.name) {
            return Err(StoreError::CreateRejected {
                collection: request.name.clone(),
                reason: "collection already exists".to_string(),
            });
        }
        if request.shard_count == 0 || request.replica_count == 0 {
            return Err(StoreError::CreateRejected {
                collection: request.name.clone(),
                reason: "shard and replica counts must be positive".to_string(),
            });
        }
        let pool: &[String] = match &request.node_set {
            Some(nodes) => nodes,
            None => &self.cluster_nodes,
        };
        if pool.is_empty() {
            return Err(StoreError::CreateRejected {
                collection: request.name.clone(),
                reason: "no nodes available for placement".to_string(),
            });
        }

        // Explicit node sets place from the start of the list; store-chosen
        // placement continues round-robin across successive creates.
        let mut local_cursor = 0usize;
        let mut global_cursor = self.placement_cursor.lock().expect("cursor lock poisoned");
        let mut next_node = || {
            let cursor = if request.node_set.is_some() {
                &mut local_cursor
            } else {
                &mut *global_cursor
            };
            let node = pool[*cursor % pool.len()].clone();
            *cursor += 1;
            node
        };

        let mut shards = Vec::with_capacity(request.shard_count as usize);
        for shard_index in 1..=request.shard_count {
            let replicas = (0..request.replica_count)
                .map(|_| Replica::new(next_node()))
                .collect();
            shards.push(Shard::new(format!("shard{}", shard_index), replicas));
        }

        collections.insert(
            request.name.clone(),
            CollectionState {
                pending: Vec::new(),
                committed: Vec::new(),
                topology: CollectionTopology::new(request.name.clone(), shards),
            },
        );
        Ok(())
    }
}

/// A filter with join and graph primitives flattened to id-key sets
enum Compiled {
    All,
    None,
    Eq { field: String, value: Value },
    In { field: String, keys: HashSet<String> },
    Path {
        field: String,
        ancestor: String,
        include_root: bool,
    },
}

impl Compiled {
    fn matches(&self, doc: &Value) -> bool {
        match self {
            Compiled::All => true,
            Compiled::None => false,
            // Exact equality, no coercion; missing and null fields never match
            Compiled::Eq { field, value } => match doc.get(field) {
                Some(actual) if !actual.is_null() => actual == value,
                _ => false,
            },
            Compiled::In { field, keys } => match doc.get(field) {
                Some(actual) if !actual.is_null() => keys.contains(&id_key(actual)),
                _ => false,
            },
            Compiled::Path {
                field,
                ancestor,
                include_root,
            } => match doc.get(field).and_then(Value::as_str) {
                Some(path) if *include_root => PathCodec::is_descendant_path(path, ancestor),
                Some(path) => PathCodec::is_strict_descendant_path(path, ancestor),
                None => false,
            },
        }
    }
}

/// Breadth-first expansion over parent links within one collection's
/// committed documents. A visited set makes malformed cyclic data terminate
/// instead of looping.
fn graph_descendant_keys(
    docs: &[Value],
    parent_field: &str,
    id_field: &str,
    root: &Value,
    include_root: bool,
) -> HashSet<String> {
    let root_key = id_key(root);
    let mut matched = HashSet::new();
    if include_root {
        matched.insert(root_key.clone());
    }
    let mut visited = HashSet::from([root_key.clone()]);
    let mut frontier = HashSet::from([root_key]);

    while !frontier.is_empty() {
        let mut next = HashSet::new();
        for doc in docs {
            let parent = match doc.get(parent_field) {
                Some(value) if !value.is_null() => id_key(value),
                _ => continue,
            };
            if !frontier.contains(&parent) {
                continue;
            }
            let id = match doc.get(id_field) {
                Some(value) if !value.is_null() => id_key(value),
                _ => continue,
            };
            if visited.insert(id.clone()) {
                matched.insert(id.clone());
                next.insert(id);
            }
        }
        frontier = next;
    }
    matched
}
