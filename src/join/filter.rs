//! Filter expression surface
//!
//! The minimal predicate language the document store boundary understands:
//! field equality, IN-set membership, boundary-aware path matching, graph
//! descendant traversal, and a correlated cross-collection join. The join
//! planner only ever emits these shapes; anything richer belongs to the store.

use serde_json::Value;

/// A filter over one collection's documents
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Matches every document
    MatchAll,
    /// Matches no document (e.g. descendants of a missing root)
    MatchNone,
    /// Exact field equality, no type coercion
    Eq {
        /// Field name
        field: String,
        /// Expected value
        value: Value,
    },
    /// Field value is a member of the set
    InSet {
        /// Field name
        field: String,
        /// Accepted values
        values: Vec<Value>,
    },
    /// Field holds a materialized path equal to or underneath `ancestor`
    DescendantPath {
        /// Path field name
        field: String,
        /// Ancestor path
        ancestor: String,
        /// Whether a path equal to `ancestor` matches
        include_root: bool,
    },
    /// Documents reachable from `root` by following child links, where a
    /// child is any document whose `parent_field` equals another's `id_field`
    GraphDescendants {
        /// Parent link field
        parent_field: String,
        /// Id field the parent link points at
        id_field: String,
        /// Traversal origin id value
        root: Value,
        /// Whether the root document itself matches
        include_root: bool,
    },
    /// Correlated subquery: matches documents whose `to_field` equals the
    /// `join_field` of some document in `collection` matching `inner`
    JoinOnCollection {
        /// The other collection
        collection: String,
        /// Filter applied inside the other collection
        inner: Box<Filter>,
        /// Field projected out of the other collection's matches
        join_field: String,
        /// Local field correlated against the projected values
        to_field: String,
    },
}

impl Filter {
    /// Equality filter
    pub fn eq(field: impl Into<String>, value: Value) -> Self {
        Filter::Eq {
            field: field.into(),
            value,
        }
    }

    /// IN-set filter
    pub fn in_set(field: impl Into<String>, values: Vec<Value>) -> Self {
        Filter::InSet {
            field: field.into(),
            values,
        }
    }

    /// Path descendant filter
    pub fn descendant_path(
        field: impl Into<String>,
        ancestor: impl Into<String>,
        include_root: bool,
    ) -> Self {
        Filter::DescendantPath {
            field: field.into(),
            ancestor: ancestor.into(),
            include_root,
        }
    }

    /// Graph descendant filter
    pub fn graph_descendants(
        parent_field: impl Into<String>,
        id_field: impl Into<String>,
        root: Value,
        include_root: bool,
    ) -> Self {
        Filter::GraphDescendants {
            parent_field: parent_field.into(),
            id_field: id_field.into(),
            root,
            include_root,
        }
    }

    /// Cross-collection join filter
    pub fn join_on_collection(
        collection: impl Into<String>,
        inner: Filter,
        join_field: impl Into<String>,
        to_field: impl Into<String>,
    ) -> Self {
        Filter::JoinOnCollection {
            collection: collection.into(),
            inner: Box::new(inner),
            join_field: join_field.into(),
            to_field: to_field.into(),
        }
    }

    /// Number of explicit terms this filter sends to the store
    pub fn term_count(&self) -> usize {
        match self {
            Filter::InSet { values, .. } => values.len(),
            Filter::JoinOnCollection { inner, .. } => inner.term_count(),
            _ => 1,
        }
    }
}

/// A query: one main filter plus AND-ed restriction filters.
///
/// Mirrors the main-query / filter-query split of search stores; every filter
/// must match for a document to be returned.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    /// Main filter
    pub main: Filter,
    /// Additional filters, all AND-ed with the main filter
    pub filters: Vec<Filter>,
}

impl Query {
    /// Query with the given main filter and no restrictions
    pub fn new(main: Filter) -> Self {
        Self {
            main,
            filters: Vec::new(),
        }
    }

    /// Query matching every document until filters are added
    pub fn match_all() -> Self {
        Self::new(Filter::MatchAll)
    }

    /// Adds a restriction filter
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builders() {
        let f = Filter::eq("owner_id", json!("3"));
        assert_eq!(
            f,
            Filter::Eq {
                field: "owner_id".into(),
                value: json!("3")
            }
        );

        let j = Filter::join_on_collection(
            "folders",
            Filter::descendant_path("path", "/0", true),
            "id",
            "owner_id",
        );
        match j {
            Filter::JoinOnCollection {
                collection,
                inner,
                join_field,
                to_field,
            } => {
                assert_eq!(collection, "folders");
                assert_eq!(join_field, "id");
                assert_eq!(to_field, "owner_id");
                assert!(matches!(*inner, Filter::DescendantPath { .. }));
            }
            other => panic!("unexpected filter {:?}", other),
        }
    }

    #[test]
    fn test_term_count() {
        let set = Filter::in_set("owner_id", vec![json!(1), json!(2), json!(3)]);
        assert_eq!(set.term_count(), 3);

        let joined = Filter::join_on_collection("folders", set, "id", "owner_id");
        assert_eq!(joined.term_count(), 3);

        assert_eq!(Filter::MatchAll.term_count(), 1);
    }

    #[test]
    fn test_query_composition() {
        let q = Query::match_all()
            .with_filter(Filter::eq("kind", json!("report")))
            .with_filter(Filter::eq("owner_id", json!(7)));
        assert_eq!(q.main, Filter::MatchAll);
        assert_eq!(q.filters.len(), 2);
    }
}
