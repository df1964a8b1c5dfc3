//! Descendant resolution
//!
//! Two strategies answer "which nodes lie under N", unified behind one trait:
//!
//! - [`GraphResolver`] walks parent→child links level by level. Correct
//!   whenever the parent links are, at the cost of one batched store round
//!   trip per tree level.
//! - [`PathResolver`] issues a single prefix query over materialized paths.
//!   One round trip, but correct only while every path is kept current on
//!   moves — the path cascade in the hierarchy store's move path is what
//!   earns this resolver its speed.
//!
//! Both yield identical id sets for any consistently maintained tree, and
//! both can emit a store-side predicate instead of materializing ids, which
//! is what the join planner pushes down.

mod errors;
mod graph;
mod path;

pub use errors::{ResolverError, ResolverResult};
pub use graph::GraphResolver;
pub use path::PathResolver;

use std::collections::BTreeSet;

use crate::hierarchy::{HierarchySchema, HierarchyStore, NodeId};
use crate::join::Filter;

/// Whether a node counts among its own descendants.
///
/// The two semantics differ only by the root node itself, but every caller
/// must pick one explicitly; resolvers never infer it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelfInclusion {
    /// The root node is part of the result (the default)
    #[default]
    Inclusive,
    /// Only proper descendants
    Exclusive,
}

impl SelfInclusion {
    /// True for [`SelfInclusion::Inclusive`]
    pub fn is_inclusive(&self) -> bool {
        matches!(self, SelfInclusion::Inclusive)
    }
}

/// Resolution strategy identifier, for logs and plan output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    /// Parent-pointer traversal
    Graph,
    /// Materialized-path prefix match
    Path,
}

impl StrategyKind {
    /// Strategy name for log fields
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::Graph => "graph",
            StrategyKind::Path => "path",
        }
    }
}

/// A descendant-resolution strategy.
///
/// A missing root resolves to the empty set (or a match-nothing predicate),
/// never an error — documents may reference since-deleted nodes.
pub trait DescendantResolver {
    /// Which strategy this is
    fn kind(&self) -> StrategyKind;

    /// Materializes the descendant-id set of `root`
    fn ids(
        &self,
        store: &dyn HierarchyStore,
        root: &NodeId,
        inclusion: SelfInclusion,
    ) -> ResolverResult<BTreeSet<NodeId>>;

    /// Builds a hierarchy-collection predicate equivalent to [`ids`](Self::ids),
    /// for stores that can evaluate the descendant relation themselves
    fn predicate(
        &self,
        store: &dyn HierarchyStore,
        root: &NodeId,
        inclusion: SelfInclusion,
        schema: &HierarchySchema,
    ) -> ResolverResult<Filter>;
}
