//! Knowledge graph over the users and messages of one chat.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use hilo_config::GraphConfig;
use hilo_core::entities::{
    Chat, EdgeData, EdgeRecord, GraphDocument, GraphMetadata, Mention, MessageNode, NodeAttrs,
    NormalizedMessage, UserNode,
};
use hilo_core::enums::EdgeKind;
use hilo_core::ids::NodeId;
use hilo_embeddings::{Embedder, cosine_similarity};
use rustworkx_core::petgraph::graph::{DiGraph, NodeIndex};
use rustworkx_core::petgraph::visit::EdgeRef;

use crate::error::GraphError;
use crate::intent::classify_intent;

pub const AUTHORED_WEIGHT: f64 = 1.0;
pub const REPLY_WEIGHT: f64 = 1.0;
pub const MENTION_WEIGHT: f64 = 0.7;
pub const SAME_AUTHOR_WEIGHT: f64 = 0.6;

/// Directed multigraph with `user:<id>` and `message:<id>` nodes.
#[derive(Debug, Clone)]
pub struct KnowledgeGraph {
    chat_id: i64,
    chat_name: String,
    graph: DiGraph<NodeAttrs, EdgeData>,
    index: HashMap<NodeId, NodeIndex>,
    /// Message ids in ascending (timestamp, id) order.
    message_order: Vec<i64>,
    semantic_edges_enabled: bool,
    duplicates_skipped: usize,
}

impl KnowledgeGraph {
    fn empty(chat: &Chat) -> Self {
        Self {
            chat_id: chat.id,
            chat_name: chat.name.clone(),
            graph: DiGraph::new(),
            index: HashMap::new(),
            message_order: Vec::new(),
            semantic_edges_enabled: false,
            duplicates_skipped: 0,
        }
    }

    #[must_use]
    pub const fn chat_id(&self) -> i64 {
        self.chat_id
    }

    #[must_use]
    pub fn chat_name(&self) -> &str {
        &self.chat_name
    }

    /// Messages left out of the graph because their id repeated.
    #[must_use]
    pub const fn duplicates_skipped(&self) -> usize {
        self.duplicates_skipped
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    #[must_use]
    pub const fn semantic_edges_enabled(&self) -> bool {
        self.semantic_edges_enabled
    }

    #[must_use]
    pub fn contains(&self, node: NodeId) -> bool {
        self.index.contains_key(&node)
    }

    /// Message ids in chronological order.
    #[must_use]
    pub fn message_ids(&self) -> &[i64] {
        &self.message_order
    }

    #[must_use]
    pub fn message(&self, id: i64) -> Option<&MessageNode> {
        match self.index.get(&NodeId::Message(id)).map(|&i| &self.graph[i]) {
            Some(NodeAttrs::Message(m)) => Some(m),
            _ => None,
        }
    }

    #[must_use]
    pub fn user(&self, id: i64) -> Option<&UserNode> {
        match self.index.get(&NodeId::User(id)).map(|&i| &self.graph[i]) {
            Some(NodeAttrs::User(u)) => Some(u),
            _ => None,
        }
    }

    /// Message nodes in chronological order.
    pub fn messages(&self) -> impl Iterator<Item = &MessageNode> {
        self.message_order.iter().filter_map(|&id| self.message(id))
    }

    pub fn users(&self) -> impl Iterator<Item = &UserNode> {
        self.graph.node_weights().filter_map(|n| match n {
            NodeAttrs::User(u) => Some(u),
            NodeAttrs::Message(_) => None,
        })
    }

    /// Edges in insertion order as `(source, target, data)`.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId, &EdgeData)> {
        self.graph.edge_references().map(|e| {
            (
                node_id(&self.graph[e.source()]),
                node_id(&self.graph[e.target()]),
                e.weight(),
            )
        })
    }

    /// Edge counts for every kind, zero included.
    #[must_use]
    pub fn edge_counts(&self) -> BTreeMap<EdgeKind, usize> {
        let mut counts: BTreeMap<EdgeKind, usize> =
            EdgeKind::ALL.iter().map(|&k| (k, 0)).collect();
        for edge in self.graph.edge_weights() {
            *counts.entry(edge.kind).or_insert(0) += 1;
        }
        counts
    }

    pub(crate) const fn inner(&self) -> &DiGraph<NodeAttrs, EdgeData> {
        &self.graph
    }

    pub(crate) fn index_of(&self, node: NodeId) -> Option<NodeIndex> {
        self.index.get(&node).copied()
    }

    /// Serializable `{ metadata, nodes, edges }` form. Identical graphs give
    /// identical documents.
    #[must_use]
    pub fn to_document(&self) -> GraphDocument {
        let nodes = self
            .graph
            .node_weights()
            .map(|n| (node_id(n).to_string(), n.clone()))
            .collect();
        let edges = self
            .edges()
            .map(|(source, target, data)| EdgeRecord {
                source: source.to_string(),
                target: target.to_string(),
                data: data.clone(),
            })
            .collect();
        GraphDocument {
            metadata: GraphMetadata {
                chat_id: self.chat_id,
                chat_name: self.chat_name.clone(),
                user_count: self.users().count(),
                message_count: self.message_order.len(),
                node_count: self.node_count(),
                edge_count: self.edge_count(),
                edge_counts: self.edge_counts(),
                semantic_edges_enabled: self.semantic_edges_enabled,
                duplicates_skipped: self.duplicates_skipped,
            },
            nodes,
            edges,
        }
    }

    fn add_node(&mut self, id: NodeId, attrs: NodeAttrs) -> NodeIndex {
        let idx = self.graph.add_node(attrs);
        self.index.insert(id, idx);
        idx
    }

    fn add_edge(
        &mut self,
        source: NodeId,
        target: NodeId,
        kind: EdgeKind,
        weight: f64,
        features: &[(&str, f64)],
    ) {
        let (Some(&s), Some(&t)) = (self.index.get(&source), self.index.get(&target)) else {
            return;
        };
        self.graph.add_edge(
            s,
            t,
            EdgeData {
                kind,
                weight,
                features: features
                    .iter()
                    .map(|(k, v)| ((*k).to_string(), *v))
                    .collect(),
            },
        );
    }

    /// Add a sender or update its counters.
    fn touch_sender(&mut self, message: &NormalizedMessage) {
        let raw = &message.message;
        let id = NodeId::User(raw.sender_id);
        if let Some(&idx) = self.index.get(&id) {
            if let NodeAttrs::User(user) = &mut self.graph[idx] {
                user.last_seen = Some(raw.timestamp);
                user.message_count += 1;
                if user.handle.is_none() {
                    user.handle.clone_from(&raw.sender_handle);
                }
            }
            return;
        }
        self.add_node(
            id,
            NodeAttrs::User(UserNode {
                user_id: raw.sender_id,
                display_name: raw.sender_display_name.clone(),
                handle: raw.sender_handle.clone(),
                first_seen: Some(raw.timestamp),
                last_seen: Some(raw.timestamp),
                message_count: 1,
            }),
        );
    }
}

fn node_id(attrs: &NodeAttrs) -> NodeId {
    match attrs {
        NodeAttrs::User(u) => NodeId::User(u.user_id),
        NodeAttrs::Message(m) => NodeId::Message(m.message_id),
    }
}

/// Builds a [`KnowledgeGraph`] from one chat's normalized messages.
#[derive(Debug, Clone, Copy)]
pub struct GraphBuilder<'a> {
    config: &'a GraphConfig,
    embedder: Option<&'a dyn Embedder>,
}

impl<'a> GraphBuilder<'a> {
    #[must_use]
    pub const fn new(config: &'a GraphConfig) -> Self {
        Self {
            config,
            embedder: None,
        }
    }

    /// Provider for `semantic_sim` edges.
    #[must_use]
    pub const fn with_embedder(mut self, embedder: Option<&'a dyn Embedder>) -> Self {
        self.embedder = embedder;
        self
    }

    /// Build the graph. Input order does not matter: messages are processed
    /// by ascending timestamp, ties by id. A repeated id keeps the first
    /// message in that order; later copies are skipped and counted.
    ///
    /// # Errors
    ///
    /// [`GraphError::ForeignMessage`] for a message of another chat.
    #[allow(clippy::cast_precision_loss)]
    pub fn build(&self, chat: &Chat, messages: &[NormalizedMessage]) -> Result<KnowledgeGraph, GraphError> {
        let mut ordered: Vec<&NormalizedMessage> = messages.iter().collect();
        ordered.sort_by_key(|m| (m.timestamp(), m.id()));

        if let Some(m) = ordered.iter().find(|m| m.message.chat_id != chat.id) {
            return Err(GraphError::ForeignMessage {
                expected: chat.id,
                found: m.message.chat_id,
                id: m.id(),
            });
        }

        let mut seen = HashSet::with_capacity(ordered.len());
        let before = ordered.len();
        ordered.retain(|m| {
            let first = seen.insert(m.id());
            if !first {
                tracing::warn!(chat = chat.id, message = m.id(), "duplicate message id skipped");
            }
            first
        });

        let mut kg = KnowledgeGraph::empty(chat);
        kg.duplicates_skipped = before - ordered.len();
        for m in &ordered {
            kg.touch_sender(m);
        }

        let handles: HashMap<String, i64> = ordered
            .iter()
            .filter_map(|m| {
                m.message
                    .sender_handle
                    .as_deref()
                    .map(|h| (h.trim_start_matches('@').to_lowercase(), m.sender_id()))
            })
            .collect();
        for m in &ordered {
            for mention in &m.message.mentions {
                let Some(user_id) = resolve_mention(mention, &handles) else {
                    continue;
                };
                if !kg.contains(NodeId::User(user_id)) {
                    kg.add_node(
                        NodeId::User(user_id),
                        NodeAttrs::User(UserNode {
                            user_id,
                            display_name: mention.text.trim_start_matches('@').to_string(),
                            handle: None,
                            first_seen: None,
                            last_seen: None,
                            message_count: 0,
                        }),
                    );
                }
            }
        }

        for m in &ordered {
            kg.add_node(
                NodeId::Message(m.id()),
                NodeAttrs::Message(MessageNode {
                    message_id: m.id(),
                    sender_id: m.sender_id(),
                    text: m.text().to_string(),
                    timestamp: m.timestamp(),
                    intention: classify_intent(m.text()),
                }),
            );
            kg.message_order.push(m.id());
        }

        let window = self.config.temporal_window_secs();
        let mut last_by_sender: HashMap<i64, usize> = HashMap::new();
        for (i, m) in ordered.iter().enumerate() {
            let node = NodeId::Message(m.id());
            kg.add_edge(NodeId::User(m.sender_id()), node, EdgeKind::AuthoredBy, AUTHORED_WEIGHT, &[]);

            if let Some(parent) = m.message.reply_to_id {
                if parent != m.id() && kg.contains(NodeId::Message(parent)) {
                    kg.add_edge(node, NodeId::Message(parent), EdgeKind::ReplyTo, REPLY_WEIGHT, &[]);
                } else {
                    tracing::trace!(message = m.id(), parent, "reply target not in chat");
                }
            }

            let mut mentioned = BTreeSet::new();
            for mention in &m.message.mentions {
                if let Some(user_id) = resolve_mention(mention, &handles)
                    && mentioned.insert(user_id)
                {
                    kg.add_edge(node, NodeId::User(user_id), EdgeKind::Mentions, MENTION_WEIGHT, &[]);
                }
            }

            if let Some(prev) = i.checked_sub(1).map(|p| ordered[p]) {
                let gap = (m.timestamp() - prev.timestamp()).num_seconds();
                if gap <= window {
                    let weight = round4(1.0 - gap as f64 / window as f64);
                    if weight > 0.0 {
                        kg.add_edge(
                            node,
                            NodeId::Message(prev.id()),
                            EdgeKind::TemporalNear,
                            weight,
                            &[("gap_seconds", gap as f64)],
                        );
                    }
                }
            }

            if let Some(&p) = last_by_sender.get(&m.sender_id()) {
                let prev = ordered[p];
                let gap = (m.timestamp() - prev.timestamp()).num_seconds();
                if gap <= window {
                    kg.add_edge(
                        NodeId::Message(prev.id()),
                        node,
                        EdgeKind::SameAuthorSequence,
                        SAME_AUTHOR_WEIGHT,
                        &[("gap_seconds", gap as f64)],
                    );
                }
            }
            last_by_sender.insert(m.sender_id(), i);
        }

        if self.config.semantic_edges {
            kg.semantic_edges_enabled = self.add_semantic_edges(&mut kg, &ordered);
        }

        tracing::debug!(
            chat_id = chat.id,
            nodes = kg.node_count(),
            edges = kg.edge_count(),
            "knowledge graph built"
        );
        Ok(kg)
    }

    /// Returns whether semantic edges were computed.
    fn add_semantic_edges(&self, kg: &mut KnowledgeGraph, ordered: &[&NormalizedMessage]) -> bool {
        let Some(embedder) = self.embedder else {
            tracing::warn!(chat_id = kg.chat_id, "no embedder configured, skipping semantic edges");
            return false;
        };
        if ordered.is_empty() {
            return true;
        }
        let texts: Vec<String> = ordered.iter().map(|m| m.text().to_string()).collect();
        let vectors = match embedder.embed_batch(&texts) {
            Ok(v) if v.len() == texts.len() => v,
            Ok(v) => {
                tracing::warn!(
                    chat_id = kg.chat_id,
                    expected = texts.len(),
                    got = v.len(),
                    "embedder returned wrong vector count, skipping semantic edges"
                );
                return false;
            }
            Err(e) => {
                tracing::warn!(chat_id = kg.chat_id, error = %e, "embedding failed, skipping semantic edges");
                return false;
            }
        };

        let n = self.config.semantic_window_size;
        for i in 0..ordered.len() {
            if texts[i].trim().is_empty() {
                continue;
            }
            for j in i.saturating_sub(n)..i {
                if texts[j].trim().is_empty() {
                    continue;
                }
                let similarity = round4(f64::from(cosine_similarity(&vectors[i], &vectors[j])));
                if similarity > self.config.semantic_threshold {
                    kg.add_edge(
                        NodeId::Message(ordered[i].id()),
                        NodeId::Message(ordered[j].id()),
                        EdgeKind::SemanticSim,
                        similarity.min(1.0),
                        &[("similarity", similarity)],
                    );
                }
            }
        }
        true
    }
}

fn resolve_mention(mention: &Mention, handles: &HashMap<String, i64>) -> Option<i64> {
    mention.user_id.or_else(|| {
        handles
            .get(&mention.text.trim_start_matches('@').to_lowercase())
            .copied()
    })
}

pub(crate) fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
