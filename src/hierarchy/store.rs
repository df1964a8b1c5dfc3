//! Hierarchy store
//!
//! Read access to hierarchy nodes by id, parent, and path prefix. The trait
//! never assumes traversal is cheap — `children_of` may be a remote call, and
//! resolvers expand frontiers through the batched form to keep round trips
//! proportional to tree depth rather than node count.
//!
//! [`CollectionHierarchyStore`] is the production shape: nodes live as
//! documents in a shadow collection of the document store, and the write path
//! (insert, move) goes through batched upserts so a subtree move lands
//! atomically with its path cascade.

use serde_json::Value;

use super::errors::{HierarchyError, HierarchyResult};
use super::node::{HierarchyNode, HierarchySchema, NodeId};
use super::path::PathCodec;
use crate::join::{Filter, Query};
use crate::store::DocumentStore;

/// Read interface consumed by descendant resolvers
pub trait HierarchyStore {
    /// Fetches one node; a missing id is `Ok(None)`, never an error
    fn get_node(&self, id: &NodeId) -> HierarchyResult<Option<HierarchyNode>>;

    /// Direct children of a node
    fn children_of(&self, id: &NodeId) -> HierarchyResult<Vec<HierarchyNode>>;

    /// Direct children of every node in `ids`, in one store round trip where
    /// the implementation supports it
    fn children_of_all(&self, ids: &[NodeId]) -> HierarchyResult<Vec<HierarchyNode>> {
        let mut children = Vec::new();
        for id in ids {
            children.extend(self.children_of(id)?);
        }
        Ok(children)
    }

    /// All nodes whose path equals or lies underneath `prefix`
    fn find_by_path_prefix(&self, prefix: &str) -> HierarchyResult<Vec<HierarchyNode>>;
}

/// Hierarchy nodes stored as documents in a collection of the document store
pub struct CollectionHierarchyStore<'a, S: DocumentStore> {
    store: &'a S,
    collection: String,
    schema: HierarchySchema,
}

impl<'a, S: DocumentStore> CollectionHierarchyStore<'a, S> {
    /// Binds to `collection` with default field names
    pub fn new(store: &'a S, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
            schema: HierarchySchema::default(),
        }
    }

    /// Overrides the hierarchy field names
    pub fn with_schema(mut self, schema: HierarchySchema) -> Self {
        self.schema = schema;
        self
    }

    /// The field-name schema in use
    pub fn schema(&self) -> &HierarchySchema {
        &self.schema
    }

    /// The backing collection name
    pub fn collection(&self) -> &str {
        &self.collection
    }

    fn query_nodes(&self, filter: Filter) -> HierarchyResult<Vec<HierarchyNode>> {
        let docs = self
            .store
            .query(&self.collection, &Query::match_all().with_filter(filter))?;
        docs.iter()
            .map(|doc| HierarchyNode::from_document(doc, &self.schema))
            .collect()
    }

    /// Upserts a batch of nodes and commits them in one step
    pub fn insert_nodes(&self, nodes: &[HierarchyNode]) -> HierarchyResult<()> {
        let batch: Vec<Value> = nodes
            .iter()
            .map(|node| node.to_document(&self.schema))
            .collect();
        self.store.add_documents(&self.collection, batch)?;
        self.store.commit(&self.collection)?;
        Ok(())
    }

    /// Moves a node (and its whole subtree) under a new parent.
    ///
    /// The parent-link update and the path cascade over every descendant are
    /// applied as one batched upsert followed by one commit, so concurrent
    /// readers observe either the old placement or the new one. A destination
    /// inside the moved subtree is rejected with `CyclicMove` before anything
    /// is written. Returns the number of nodes whose path changed.
    pub fn move_node(&self, id: &NodeId, new_parent: Option<&NodeId>) -> HierarchyResult<usize> {
        let node = self
            .get_node(id)?
            .ok_or_else(|| HierarchyError::NodeNotFound(id.clone()))?;

        let parent_path = match new_parent {
            Some(parent_id) => {
                let parent = self
                    .get_node(parent_id)?
                    .ok_or_else(|| HierarchyError::NodeNotFound(parent_id.clone()))?;
                if PathCodec::is_descendant_path(&parent.path, &node.path) {
                    return Err(HierarchyError::CyclicMove {
                        node: id.clone(),
                        destination: parent_id.clone(),
                    });
                }
                parent.path
            }
            None => String::new(),
        };

        let segment = PathCodec::leaf_segment(&node.path)
            .ok_or_else(|| HierarchyError::InvalidSegment(node.path.clone()))?;
        let new_path = PathCodec::child_path(&parent_path, segment)?;
        if new_path == node.path {
            return Ok(0); // already in place
        }

        // Paths are unique; landing on an occupied path would make prefix
        // resolution claim a sibling's subtree
        if !self.find_by_path_prefix(&new_path)?.is_empty() {
            return Err(HierarchyError::PathCollision(new_path));
        }

        let subtree = self.find_by_path_prefix(&node.path)?;
        let mut batch = Vec::with_capacity(subtree.len());
        for member in subtree {
            let rebased = match PathCodec::rebase(&member.path, &node.path, &new_path) {
                Some(path) => path,
                None => continue,
            };
            let parent = if member.id == node.id {
                new_parent.cloned()
            } else {
                member.parent.clone()
            };
            batch.push(HierarchyNode::new(member.id, parent, rebased).to_document(&self.schema));
        }

        let moved = batch.len();
        self.store.add_documents(&self.collection, batch)?;
        self.store.commit(&self.collection)?;
        Ok(moved)
    }
}

impl<'a, S: DocumentStore> HierarchyStore for CollectionHierarchyStore<'a, S> {
    fn get_node(&self, id: &NodeId) -> HierarchyResult<Option<HierarchyNode>> {
        let mut nodes = self.query_nodes(Filter::eq(&self.schema.id_field, id.to_value()))?;
        Ok(nodes.pop())
    }

    fn children_of(&self, id: &NodeId) -> HierarchyResult<Vec<HierarchyNode>> {
        self.query_nodes(Filter::eq(&self.schema.parent_field, id.to_value()))
    }

    fn children_of_all(&self, ids: &[NodeId]) -> HierarchyResult<Vec<HierarchyNode>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        // One IN-set query per chunk; chunk size honors the store's term limit
        let chunk_size = self
            .store
            .capabilities()
            .max_filter_terms
            .unwrap_or(ids.len())
            .max(1);
        let mut children = Vec::new();
        for chunk in ids.chunks(chunk_size) {
            let values = chunk.iter().map(NodeId::to_value).collect();
            children.extend(self.query_nodes(Filter::in_set(&self.schema.parent_field, values))?);
        }
        Ok(children)
    }

    fn find_by_path_prefix(&self, prefix: &str) -> HierarchyResult<Vec<HierarchyNode>> {
        self.query_nodes(Filter::descendant_path(&self.schema.path_field, prefix, true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{CreateCollection, MemoryDocumentStore, StoreCapabilities};

    fn seeded_store() -> MemoryDocumentStore {
        let store = MemoryDocumentStore::single_node();
        store
            .create_collection(&CreateCollection::new("folders"))
            .unwrap();
        store
    }

    fn seed_small_tree<S: DocumentStore>(folders: &CollectionHierarchyStore<'_, S>) {
        // 0 -> {1, 2}, 1 -> {3}
        folders
            .insert_nodes(&[
                HierarchyNode::root("0", "/0"),
                HierarchyNode::new("1", Some(NodeId::from("0")), "/0/1"),
                HierarchyNode::new("2", Some(NodeId::from("0")), "/0/2"),
                HierarchyNode::new("3", Some(NodeId::from("1")), "/0/1/3"),
            ])
            .unwrap();
    }

    #[test]
    fn test_get_node_and_missing_node() {
        let store = seeded_store();
        let folders = CollectionHierarchyStore::new(&store, "folders");
        seed_small_tree(&folders);

        let node = folders.get_node(&NodeId::from("1")).unwrap().unwrap();
        assert_eq!(node.path, "/0/1");
        assert_eq!(node.parent, Some(NodeId::from("0")));

        assert!(folders.get_node(&NodeId::from("absent")).unwrap().is_none());
    }

    #[test]
    fn test_children_queries() {
        let store = seeded_store();
        let folders = CollectionHierarchyStore::new(&store, "folders");
        seed_small_tree(&folders);

        let children = folders.children_of(&NodeId::from("0")).unwrap();
        assert_eq!(children.len(), 2);

        let batched = folders
            .children_of_all(&[NodeId::from("0"), NodeId::from("1")])
            .unwrap();
        assert_eq!(batched.len(), 3);

        assert!(folders.children_of_all(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_children_of_all_chunks_under_term_limit() {
        let store = MemoryDocumentStore::single_node()
            .with_capabilities(StoreCapabilities::full().with_max_filter_terms(1));
        store
            .create_collection(&CreateCollection::new("folders"))
            .unwrap();
        let folders = CollectionHierarchyStore::new(&store, "folders");
        seed_small_tree(&folders);

        // Frontier of two ids exceeds the 1-term limit; the store would
        // reject a single IN-set, so the chunked form must still succeed
        let batched = folders
            .children_of_all(&[NodeId::from("0"), NodeId::from("1")])
            .unwrap();
        assert_eq!(batched.len(), 3);
    }

    #[test]
    fn test_find_by_path_prefix_boundary() {
        let store = seeded_store();
        let folders = CollectionHierarchyStore::new(&store, "folders");
        folders
            .insert_nodes(&[
                HierarchyNode::root("1", "/1"),
                HierarchyNode::new("12", Some(NodeId::from("1")), "/1/2"),
                HierarchyNode::root("10", "/10"),
            ])
            .unwrap();

        let under = folders.find_by_path_prefix("/1").unwrap();
        let ids: Vec<_> = under.iter().map(|n| n.id.clone()).collect();
        assert!(ids.contains(&NodeId::from("1")));
        assert!(ids.contains(&NodeId::from("12")));
        assert!(!ids.contains(&NodeId::from("10")));
    }

    #[test]
    fn test_move_node_cascades_paths() {
        let store = seeded_store();
        let folders = CollectionHierarchyStore::new(&store, "folders");
        seed_small_tree(&folders);

        let moved = folders
            .move_node(&NodeId::from("1"), Some(&NodeId::from("2")))
            .unwrap();
        assert_eq!(moved, 2); // node 1 and its child 3

        let node1 = folders.get_node(&NodeId::from("1")).unwrap().unwrap();
        assert_eq!(node1.path, "/0/2/1");
        assert_eq!(node1.parent, Some(NodeId::from("2")));

        let node3 = folders.get_node(&NodeId::from("3")).unwrap().unwrap();
        assert_eq!(node3.path, "/0/2/1/3");
        assert_eq!(node3.parent, Some(NodeId::from("1")));
    }

    #[test]
    fn test_move_to_root() {
        let store = seeded_store();
        let folders = CollectionHierarchyStore::new(&store, "folders");
        seed_small_tree(&folders);

        folders.move_node(&NodeId::from("1"), None).unwrap();
        let node1 = folders.get_node(&NodeId::from("1")).unwrap().unwrap();
        assert_eq!(node1.path, "/1");
        assert_eq!(node1.parent, None);

        // Repeating the move is a no-op
        assert_eq!(folders.move_node(&NodeId::from("1"), None).unwrap(), 0);
    }

    #[test]
    fn test_cyclic_move_rejected() {
        let store = seeded_store();
        let folders = CollectionHierarchyStore::new(&store, "folders");
        seed_small_tree(&folders);

        // 3 lives under 1; moving 1 under 3 would orphan the subtree
        let result = folders.move_node(&NodeId::from("1"), Some(&NodeId::from("3")));
        assert!(matches!(result, Err(HierarchyError::CyclicMove { .. })));

        // Self-move is the degenerate cycle
        let result = folders.move_node(&NodeId::from("1"), Some(&NodeId::from("1")));
        assert!(matches!(result, Err(HierarchyError::CyclicMove { .. })));

        // Nothing changed
        let node1 = folders.get_node(&NodeId::from("1")).unwrap().unwrap();
        assert_eq!(node1.path, "/0/1");
    }

    #[test]
    fn test_move_path_collision_rejected() {
        let store = seeded_store();
        let folders = CollectionHierarchyStore::new(&store, "folders");
        seed_small_tree(&folders);
        folders
            .insert_nodes(&[HierarchyNode::root("9", "/1")])
            .unwrap();

        // Moving node 1 to the root would land on node 9's path
        let result = folders.move_node(&NodeId::from("1"), None);
        assert!(matches!(
            result,
            Err(HierarchyError::PathCollision(path)) if path == "/1"
        ));
    }

    #[test]
    fn test_move_missing_node() {
        let store = seeded_store();
        let folders = CollectionHierarchyStore::new(&store, "folders");
        seed_small_tree(&folders);

        let result = folders.move_node(&NodeId::from("absent"), None);
        assert!(matches!(result, Err(HierarchyError::NodeNotFound(_))));
    }
}
