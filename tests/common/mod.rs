//! Shared fixtures: a generated folder tree and one document per folder.

use serde_json::{json, Value};
use treejoin::hierarchy::{CollectionHierarchyStore, HierarchyNode, NodeId, PathCodec};
use treejoin::placement::ShadowPlacementPlanner;
use treejoin::store::{CreateCollection, DocumentStore, MemoryDocumentStore};

pub const DOC_COLLECTION: &str = "docs";
pub const FOLDER_COLLECTION: &str = "folders";

/// Generates a branch of folders: `width` children under `path`, recursing
/// `depth` levels. Ids are assigned sequentially from `id_offset`, path
/// segments are the child index, so `branch("", None, 0, 3, 3)` yields the
/// 39-folder ternary tree (3 + 9 + 27) with roots /0, /1, /2.
pub fn branch(
    path: &str,
    parent: Option<&NodeId>,
    id_offset: i64,
    width: usize,
    depth: usize,
) -> Vec<HierarchyNode> {
    let mut nodes = Vec::new();
    if depth == 0 {
        return nodes;
    }
    let mut id = id_offset;

    let mut children = Vec::with_capacity(width);
    for w in 0..width {
        let child_path = PathCodec::child_path(path, &w.to_string()).unwrap();
        let child_id = NodeId::from(id.to_string());
        nodes.push(HierarchyNode::new(
            child_id.clone(),
            parent.cloned(),
            child_path.clone(),
        ));
        children.push((child_id, child_path));
        id += 1;
    }
    for (child_id, child_path) in &children {
        let sub = branch(child_path, Some(child_id), id, width, depth - 1);
        id += sub.len() as i64;
        nodes.extend(sub);
    }
    nodes
}

/// One document per folder, owned by it
pub fn docs_for(folders: &[HierarchyNode]) -> Vec<Value> {
    folders
        .iter()
        .map(|folder| {
            json!({
                "id": format!("doc-{}", folder.id),
                "owner_id": folder.id.to_value(),
            })
        })
        .collect()
}

/// Five-node cluster with the document collection on three of the nodes and
/// the folder collection shadow-created beside it, seeded with the ternary
/// tree and its documents.
pub fn seeded_cluster() -> (MemoryDocumentStore, Vec<HierarchyNode>) {
    let store = MemoryDocumentStore::new(["n1", "n2", "n3", "n4", "n5"]);
    store
        .create_collection(
            &CreateCollection::new(DOC_COLLECTION)
                .with_shards(3)
                .with_replicas(1),
        )
        .unwrap();
    let shadow_request =
        ShadowPlacementPlanner::shadow_create(&store, DOC_COLLECTION, FOLDER_COLLECTION).unwrap();
    store.create_collection(&shadow_request).unwrap();

    let folders = branch("", None, 0, 3, 3);
    assert_eq!(folders.len(), 39);

    let folder_store = CollectionHierarchyStore::new(&store, FOLDER_COLLECTION);
    folder_store.insert_nodes(&folders).unwrap();

    store
        .add_documents(DOC_COLLECTION, docs_for(&folders))
        .unwrap();
    store.commit(DOC_COLLECTION).unwrap();
    assert_eq!(store.committed_count(DOC_COLLECTION).unwrap(), 39);

    (store, folders)
}
