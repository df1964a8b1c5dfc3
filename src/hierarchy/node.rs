//! Hierarchy node model
//!
//! A node is one position in a rooted forest: a stable id, an optional parent
//! link, and a materialized path. Nodes are persisted as plain documents in a
//! shadow collection; `HierarchySchema` names the document fields so callers
//! can match whatever field naming their store already uses.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::errors::{HierarchyError, HierarchyResult};

/// Opaque hierarchy node identifier.
///
/// Covers the string and integer key representations seen in document stores
/// with one comparable type; serializes untagged, so it reads and writes as a
/// plain JSON string or number. No other part of the crate inspects the
/// representation.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeId {
    /// Integer key (covers int and long fields)
    Int(i64),
    /// String key
    Str(String),
}

impl NodeId {
    /// Renders the id as a JSON value for filter construction
    pub fn to_value(&self) -> Value {
        match self {
            NodeId::Int(i) => Value::from(*i),
            NodeId::Str(s) => Value::from(s.as_str()),
        }
    }

    /// Reads an id back from a document field value
    pub fn from_value(value: &Value) -> Option<NodeId> {
        match value {
            Value::Number(n) => n.as_i64().map(NodeId::Int),
            Value::String(s) => Some(NodeId::Str(s.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeId::Int(i) => write!(f, "{}", i),
            NodeId::Str(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for NodeId {
    fn from(id: i64) -> Self {
        NodeId::Int(id)
    }
}

impl From<i32> for NodeId {
    fn from(id: i32) -> Self {
        NodeId::Int(id as i64)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        NodeId::Str(id.to_string())
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        NodeId::Str(id)
    }
}

/// Field names used when hierarchy nodes are stored as documents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HierarchySchema {
    /// Node id field
    pub id_field: String,
    /// Parent id field (absent on roots)
    pub parent_field: String,
    /// Materialized path field
    pub path_field: String,
}

impl HierarchySchema {
    /// Creates a schema with custom field names
    pub fn new(
        id_field: impl Into<String>,
        parent_field: impl Into<String>,
        path_field: impl Into<String>,
    ) -> Self {
        Self {
            id_field: id_field.into(),
            parent_field: parent_field.into(),
            path_field: path_field.into(),
        }
    }
}

impl Default for HierarchySchema {
    fn default() -> Self {
        Self::new("id", "parent_id", "path")
    }
}

/// One position in the hierarchy forest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HierarchyNode {
    /// Unique, stable identifier
    pub id: NodeId,
    /// Parent link; `None` marks a root
    pub parent: Option<NodeId>,
    /// Materialized path, delimiter-joined ancestor segments down to this node
    pub path: String,
}

impl HierarchyNode {
    /// Creates a node
    pub fn new(id: impl Into<NodeId>, parent: Option<NodeId>, path: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            parent,
            path: path.into(),
        }
    }

    /// Creates a root node (no parent)
    pub fn root(id: impl Into<NodeId>, path: impl Into<String>) -> Self {
        Self::new(id, None, path)
    }

    /// Encodes the node as a store document
    pub fn to_document(&self, schema: &HierarchySchema) -> Value {
        let mut doc = Map::new();
        doc.insert(schema.id_field.clone(), self.id.to_value());
        if let Some(parent) = &self.parent {
            doc.insert(schema.parent_field.clone(), parent.to_value());
        }
        doc.insert(schema.path_field.clone(), Value::from(self.path.as_str()));
        Value::Object(doc)
    }

    /// Decodes a node from a store document
    pub fn from_document(doc: &Value, schema: &HierarchySchema) -> HierarchyResult<Self> {
        let id = doc
            .get(&schema.id_field)
            .and_then(NodeId::from_value)
            .ok_or_else(|| HierarchyError::MalformedNode(schema.id_field.clone()))?;
        let parent = match doc.get(&schema.parent_field) {
            Some(Value::Null) | None => None,
            Some(value) => Some(
                NodeId::from_value(value)
                    .ok_or_else(|| HierarchyError::MalformedNode(schema.parent_field.clone()))?,
            ),
        };
        let path = doc
            .get(&schema.path_field)
            .and_then(Value::as_str)
            .ok_or_else(|| HierarchyError::MalformedNode(schema.path_field.clone()))?
            .to_string();
        Ok(Self { id, parent, path })
    }
}
