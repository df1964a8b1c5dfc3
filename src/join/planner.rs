//! Descendant join planning
//!
//! Turns "documents whose owner is a descendant of N" into something the
//! document store can execute. Pushdown mode ships one join filter and lets
//! the store's query engine do the work; materialized mode enumerates the
//! descendant ids client-side and emits owner-IN-set filters, chunked under
//! the store's per-filter term limit and unioned at execution.

use serde_json::Value;

use super::errors::{JoinError, JoinResult};
use super::filter::{Filter, Query};
use crate::hierarchy::{HierarchySchema, HierarchyStore, NodeId};
use crate::observability::Logger;
use crate::resolver::{DescendantResolver, SelfInclusion, StrategyKind};
use crate::store::{DocumentStore, ID_FIELD};

/// Names binding the join to its collections and fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinConfig {
    /// Collection holding the hierarchy nodes
    pub hierarchy_collection: String,
    /// Document field referencing a hierarchy node id
    pub owner_field: String,
    /// Hierarchy document field names
    pub schema: HierarchySchema,
}

impl JoinConfig {
    /// Config with default owner field (`owner_id`) and hierarchy schema
    pub fn new(hierarchy_collection: impl Into<String>) -> Self {
        Self {
            hierarchy_collection: hierarchy_collection.into(),
            owner_field: "owner_id".to_string(),
            schema: HierarchySchema::default(),
        }
    }

    /// Overrides the owner field name
    pub fn with_owner_field(mut self, owner_field: impl Into<String>) -> Self {
        self.owner_field = owner_field.into();
        self
    }

    /// Overrides the hierarchy field names
    pub fn with_schema(mut self, schema: HierarchySchema) -> Self {
        self.schema = schema;
        self
    }
}

/// How the descendant predicate reaches the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoinMode {
    /// Pushdown when the store is capable, materialized otherwise
    #[default]
    Auto,
    /// Require pushdown; fail if the store lacks the primitives
    Pushdown,
    /// Always materialize the id set client-side
    Materialized,
}

/// An executable join plan
#[derive(Debug, Clone, PartialEq)]
pub enum JoinPlan {
    /// One join filter, evaluated inside the store
    Pushdown {
        /// The cross-collection filter
        filter: Filter,
    },
    /// Owner-IN-set filters; one query each, results unioned.
    /// No chunks means the descendant set was empty: nothing matches.
    Materialized {
        /// Chunked filters, each within the store's term limit
        filters: Vec<Filter>,
    },
}

impl JoinPlan {
    /// Mode name for log fields
    pub fn mode_str(&self) -> &'static str {
        match self {
            JoinPlan::Pushdown { .. } => "pushdown",
            JoinPlan::Materialized { .. } => "materialized",
        }
    }
}

/// Plans and executes descendant joins against one document store
pub struct JoinPlanner<'a, S: DocumentStore> {
    store: &'a S,
    config: JoinConfig,
}

impl<'a, S: DocumentStore> JoinPlanner<'a, S> {
    /// Creates a planner
    pub fn new(store: &'a S, config: JoinConfig) -> Self {
        Self { store, config }
    }

    /// The planner's join configuration
    pub fn config(&self) -> &JoinConfig {
        &self.config
    }

    /// Plans the filter for "documents owned by a descendant of `root`"
    pub fn plan(
        &self,
        resolver: &dyn DescendantResolver,
        hierarchy: &dyn HierarchyStore,
        root: &NodeId,
        inclusion: SelfInclusion,
        mode: JoinMode,
    ) -> JoinResult<JoinPlan> {
        let plan = match mode {
            JoinMode::Pushdown => self.plan_pushdown(resolver, hierarchy, root, inclusion)?,
            JoinMode::Materialized => self.plan_materialized(resolver, hierarchy, root, inclusion)?,
            JoinMode::Auto => {
                if self.pushdown_available(resolver.kind()) {
                    self.plan_pushdown(resolver, hierarchy, root, inclusion)?
                } else {
                    self.plan_materialized(resolver, hierarchy, root, inclusion)?
                }
            }
        };

        Logger::info(
            "JOIN_PLAN",
            &[
                ("strategy", resolver.kind().as_str()),
                ("mode", plan.mode_str()),
                ("root", &root.to_string()),
            ],
        );
        Ok(plan)
    }

    /// Runs a plan, returning the matching documents.
    ///
    /// Materialized chunks are queried one by one and unioned by document id;
    /// the union matches exactly what a single unchunked filter would.
    pub fn execute(
        &self,
        collection: &str,
        base: &Query,
        plan: &JoinPlan,
    ) -> JoinResult<Vec<Value>> {
        match plan {
            JoinPlan::Pushdown { filter } => {
                let query = base.clone().with_filter(filter.clone());
                Ok(self.store.query(collection, &query)?)
            }
            JoinPlan::Materialized { filters } => {
                let mut seen = std::collections::HashSet::new();
                let mut results = Vec::new();
                for filter in filters {
                    let query = base.clone().with_filter(filter.clone());
                    for doc in self.store.query(collection, &query)? {
                        if let Some(id) = doc.get(ID_FIELD) {
                            if !seen.insert(id.to_string()) {
                                continue;
                            }
                        }
                        results.push(doc);
                    }
                }
                Ok(results)
            }
        }
    }

    fn pushdown_available(&self, strategy: StrategyKind) -> bool {
        let caps = self.store.capabilities();
        caps.join_subquery && (strategy != StrategyKind::Graph || caps.graph_traversal)
    }

    fn plan_pushdown(
        &self,
        resolver: &dyn DescendantResolver,
        hierarchy: &dyn HierarchyStore,
        root: &NodeId,
        inclusion: SelfInclusion,
    ) -> JoinResult<JoinPlan> {
        let caps = self.store.capabilities();
        if !caps.join_subquery {
            return Err(JoinError::PushdownUnsupported("join subquery filters"));
        }
        if resolver.kind() == StrategyKind::Graph && !caps.graph_traversal {
            return Err(JoinError::PushdownUnsupported("graph traversal filters"));
        }

        let inner = resolver.predicate(hierarchy, root, inclusion, &self.config.schema)?;
        let filter = match inner {
            // Missing root: nothing can match, skip the join wrapper
            Filter::MatchNone => Filter::MatchNone,
            inner => Filter::join_on_collection(
                &self.config.hierarchy_collection,
                inner,
                &self.config.schema.id_field,
                &self.config.owner_field,
            ),
        };
        Ok(JoinPlan::Pushdown { filter })
    }

    fn plan_materialized(
        &self,
        resolver: &dyn DescendantResolver,
        hierarchy: &dyn HierarchyStore,
        root: &NodeId,
        inclusion: SelfInclusion,
    ) -> JoinResult<JoinPlan> {
        let ids = resolver.ids(hierarchy, root, inclusion)?;
        let values: Vec<Value> = ids.iter().map(NodeId::to_value).collect();

        let chunk_size = self
            .store
            .capabilities()
            .max_filter_terms
            .unwrap_or(values.len().max(1))
            .max(1);
        let filters: Vec<Filter> = values
            .chunks(chunk_size)
            .map(|chunk| Filter::in_set(&self.config.owner_field, chunk.to_vec()))
            .collect();

        Logger::info(
            "JOIN_MATERIALIZED",
            &[
                ("ids", &values.len().to_string()),
                ("chunks", &filters.len().to_string()),
            ],
        );
        Ok(JoinPlan::Materialized { filters })
    }
}
