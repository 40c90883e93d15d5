//! # hilo-graph
//!
//! Thread reconstruction for one chat: a directed knowledge graph of users
//! and messages, a partition of messages into threads, and conversation
//! analytics over both.
//!
//! Graph algorithms (connected components, betweenness centrality) come from
//! `rustworkx-core` over `petgraph` graphs. Semantic edges use any
//! [`hilo_embeddings::Embedder`]; without one they are skipped.

pub mod analytics;
pub mod error;
pub mod graph;
pub mod intent;
pub mod partition;

use hilo_config::GraphConfig;
use hilo_core::entities::{Chat, ConversationAnalysis, NormalizedMessage};
use hilo_embeddings::Embedder;

pub use analytics::analyze;
pub use error::GraphError;
pub use graph::{GraphBuilder, KnowledgeGraph};
pub use intent::classify_intent;
pub use partition::ThreadPartition;

/// Graph, threads and analytics of one chat.
#[derive(Debug, Clone)]
pub struct ChatStructure {
    pub graph: KnowledgeGraph,
    pub partition: ThreadPartition,
    pub analysis: ConversationAnalysis,
}

/// Build the graph, partition it and compute analytics.
///
/// # Errors
///
/// Returns [`GraphError`] when the input is not a single chat's message set.
pub fn reconstruct(
    chat: &Chat,
    messages: &[NormalizedMessage],
    config: &GraphConfig,
    embedder: Option<&dyn Embedder>,
) -> Result<ChatStructure, GraphError> {
    let graph = GraphBuilder::new(config)
        .with_embedder(embedder)
        .build(chat, messages)?;
    let partition = ThreadPartition::from_graph(&graph, config);
    let analysis = analyze(&graph, &partition, config);
    Ok(ChatStructure {
        graph,
        partition,
        analysis,
    })
}
