use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{EdgeKind, Intent};

/// Serialized knowledge graph: `{ metadata, nodes, edges }`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct GraphDocument {
    pub metadata: GraphMetadata,
    /// Node attributes keyed by node id (`user:<id>` / `message:<id>`).
    pub nodes: BTreeMap<String, NodeAttrs>,
    pub edges: Vec<EdgeRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct GraphMetadata {
    pub chat_id: i64,
    pub chat_name: String,
    pub user_count: usize,
    pub message_count: usize,
    pub node_count: usize,
    pub edge_count: usize,
    pub edge_counts: BTreeMap<EdgeKind, usize>,
    pub semantic_edges_enabled: bool,
    /// Messages dropped because their id was already in the graph.
    #[serde(default)]
    pub duplicates_skipped: usize,
}

/// Attributes of a graph node, tagged by node type.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeAttrs {
    User(UserNode),
    Message(MessageNode),
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct UserNode {
    pub user_id: i64,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
    /// `None` for users that were only mentioned.
    pub first_seen: Option<DateTime<Utc>>,
    pub last_seen: Option<DateTime<Utc>>,
    pub message_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct MessageNode {
    pub message_id: i64,
    pub sender_id: i64,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    pub intention: Intent,
}

/// A directed edge `{ source, target, data }`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct EdgeRecord {
    pub source: String,
    pub target: String,
    pub data: EdgeData,
}

/// Edge payload: kind, weight in `(0, 1]`, and numeric features flattened
/// next to them (e.g. `gap_seconds`, `similarity`).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct EdgeData {
    pub kind: EdgeKind,
    pub weight: f64,
    #[serde(flatten)]
    pub features: BTreeMap<String, f64>,
}
