//! Path-prefix descendant resolution

use std::collections::BTreeSet;

use super::errors::ResolverResult;
use super::{DescendantResolver, SelfInclusion, StrategyKind};
use crate::hierarchy::{HierarchySchema, HierarchyStore, NodeId};
use crate::join::Filter;
use crate::observability::Logger;

/// Resolves descendants with a single materialized-path prefix query.
///
/// One `get_node` to learn the root's path, one prefix query for the whole
/// subtree — round trips stay constant regardless of tree size. The flip
/// side: results are only as correct as the paths, so this resolver depends
/// on the move cascade keeping every descendant path current.
#[derive(Debug, Clone, Default)]
pub struct PathResolver;

impl PathResolver {
    /// Creates the resolver
    pub fn new() -> Self {
        Self
    }
}

impl DescendantResolver for PathResolver {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Path
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

        let mut ids: BTreeSet<NodeId> = store
            .find_by_path_prefix(&root_node.path)?
            .into_iter()
            .map(|node| node.id)
            .collect();
        if !inclusion.is_inclusive() {
            ids.remove(&root_node.id);
        }

        Logger::info(
            "RESOLVE_COMPLETE",
            &[
                ("strategy", "path"),
                ("root", &root.to_string()),
                ("descendants", &ids.len().to_string()),
            ],
        );
        Ok(ids)
    }

    fn predicate(
        &self,
        store: &dyn HierarchyStore,
        root: &NodeId,
        inclusion: SelfInclusion,
        schema: &HierarchySchema,
    ) -> ResolverResult<Filter> {
        match store.get_node(root)? {
            Some(node) => Ok(Filter::descendant_path(
                &schema.path_field,
                node.path,
                inclusion.is_inclusive(),
            )),
            None => Ok(Filter::MatchNone),
        }
    }
}
