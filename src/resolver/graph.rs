//! Graph-traversal descendant resolution

use std::collections::BTreeSet;

use super::errors::{ResolverError, ResolverResult};
use super::{DescendantResolver, SelfInclusion, StrategyKind};
use crate::hierarchy::{HierarchySchema, HierarchyStore, NodeId};
use crate::join::Filter;
use crate::observability::Logger;

/// Resolves descendants by breadth-first expansion over parent links.
///
/// Each level of the tree costs one batched `children_of_all` round trip.
/// Two guards keep a malformed hierarchy from looping forever: a visited-id
/// set (a repeated id is a cycle) and a depth bound. Either trips
/// `CyclicHierarchy`; the result is never silently truncated.
#[derive(Debug, Clone)]
pub struct GraphResolver {
    max_depth: usize,
}

/// Depth bound that no sane tree reaches
const DEFAULT_MAX_DEPTH: usize = 64;

impl GraphResolver {
    /// Resolver with the default depth bound
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Overrides the traversal depth bound
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for GraphResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl DescendantResolver for GraphResolver {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Graph
    }

    fn ids(
        &self,
        store: &dyn HierarchyStore,
        root: &NodeId,
        inclusion: SelfInclusion,
    ) -> ResolverResult<BTreeSet<NodeId>> {
        let root_node = match store.get_node(root)? {
            Some(node) => node,
            None => return Ok(BTreeSet::new()),
        };

        let mut ids = BTreeSet::new();
        if inclusion.is_inclusive() {
            ids.insert(root_node.id.clone());
        }

        let mut visited = BTreeSet::from([root_node.id.clone()]);
        let mut frontier = vec![root_node.id];
        let mut depth = 0usize;

        while !frontier.is_empty() {
            depth += 1;
            if depth > self.max_depth {
                return Err(ResolverError::CyclicHierarchy {
                    node: frontier.swap_remove(0),
                });
            }
            let children = store.children_of_all(&frontier)?;
            frontier = Vec::with_capacity(children.len());
            for child in children {
                if !visited.insert(child.id.clone()) {
                    return Err(ResolverError::CyclicHierarchy { node: child.id });
                }
                ids.insert(child.id.clone());
                frontier.push(child.id);
            }
        }

        Logger::info(
            "RESOLVE_COMPLETE",
            &[
                ("strategy", "graph"),
                ("root", &root.to_string()),
                ("descendants", &ids.len().to_string()),
                ("depth", &depth.to_string()),
            ],
        );
        Ok(ids)
    }

    fn predicate(
        &self,
        _store: &dyn HierarchyStore,
        root: &NodeId,
        inclusion: SelfInclusion,
        schema: &HierarchySchema,
    ) -> ResolverResult<Filter> {
        // The store traverses; no hierarchy round trip is needed here. A
        // missing root simply matches no hierarchy document.
        Ok(Filter::graph_descendants(
            &schema.parent_field,
            &schema.id_field,
            root.to_value(),
            inclusion.is_inclusive(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::{CollectionHierarchyStore, HierarchyNode};
    use crate::store::{CreateCollection, DocumentStore, MemoryDocumentStore};
    use serde_json::json;

    fn folders(store: &MemoryDocumentStore) -> CollectionHierarchyStore<'_, MemoryDocumentStore> {
        store
            .create_collection(&CreateCollection::new("folders"))
            .unwrap();
        let folders = CollectionHierarchyStore::new(store, "folders");
        folders
            .insert_nodes(&[
                HierarchyNode::root("0", "/0"),
                HierarchyNode::new("1", Some(NodeId::from("0")), "/0/1"),
                HierarchyNode::new("2", Some(NodeId::from("0")), "/0/2"),
                HierarchyNode::new("3", Some(NodeId::from("1")), "/0/1/3"),
            ])
            .unwrap();
        folders
    }

    #[test]
    fn test_inclusive_and_exclusive() {
        let store = MemoryDocumentStore::single_node();
        let folders = folders(&store);
        let resolver = GraphResolver::new();

        let inclusive = resolver
            .ids(&folders, &NodeId::from("0"), SelfInclusion::Inclusive)
            .unwrap();
        assert_eq!(inclusive.len(), 4);
        assert!(inclusive.contains(&NodeId::from("0")));

        let exclusive = resolver
            .ids(&folders, &NodeId::from("0"), SelfInclusion::Exclusive)
            .unwrap();
        assert_eq!(exclusive.len(), 3);
        assert!(!exclusive.contains(&NodeId::from("0")));
    }

    #[test]
    fn test_leaf_node() {
        let store = MemoryDocumentStore::single_node();
        let folders = folders(&store);
        let resolver = GraphResolver::new();

        let inclusive = resolver
            .ids(&folders, &NodeId::from("3"), SelfInclusion::Inclusive)
            .unwrap();
        assert_eq!(inclusive, BTreeSet::from([NodeId::from("3")]));

        let exclusive = resolver
            .ids(&folders, &NodeId::from("3"), SelfInclusion::Exclusive)
            .unwrap();
        assert!(exclusive.is_empty());
    }

    #[test]
    fn test_missing_root_is_empty() {
        let store = MemoryDocumentStore::single_node();
        let folders = folders(&store);
        let resolver = GraphResolver::new();

        let ids = resolver
            .ids(&folders, &NodeId::from("absent"), SelfInclusion::Inclusive)
            .unwrap();
        assert!(ids.is_empty());
    }

    #[test]
    fn test_cycle_guard_trips() {
        let store = MemoryDocumentStore::single_node();
        store
            .create_collection(&CreateCollection::new("folders"))
            .unwrap();
        // Corrupted parent links: a -> b -> a
        store
            .add_documents(
                "folders",
                vec![
                    json!({"id": "a", "parent_id": "b", "path": "/b/a"}),
                    json!({"id": "b", "parent_id": "a", "path": "/a/b"}),
                ],
            )
            .unwrap();
        store.commit("folders").unwrap();
        let folders = CollectionHierarchyStore::new(&store, "folders");

        let result =
            GraphResolver::new().ids(&folders, &NodeId::from("a"), SelfInclusion::Exclusive);
        assert!(matches!(
            result,
            Err(ResolverError::CyclicHierarchy { .. })
        ));
    }

    #[test]
    fn test_depth_bound_trips() {
        let store = MemoryDocumentStore::single_node();
        let folders = folders(&store);

        let result = GraphResolver::new().with_max_depth(1).ids(
            &folders,
            &NodeId::from("0"),
            SelfInclusion::Inclusive,
        );
        assert!(matches!(
            result,
            Err(ResolverError::CyclicHierarchy { .. })
        ));
    }

    #[test]
    fn test_predicate_shape() {
        let store = MemoryDocumentStore::single_node();
        let folders = folders(&store);
        let schema = HierarchySchema::default();

        let predicate = GraphResolver::new()
            .predicate(&folders, &NodeId::from("0"), SelfInclusion::Inclusive, &schema)
            .unwrap();
        assert_eq!(
            predicate,
            Filter::graph_descendants("parent_id", "id", json!("0"), true)
        );
    }
}
