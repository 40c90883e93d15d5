//! Graph construction, thread partition and analytics on small chats.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, TimeZone, Utc};
use hilo_config::GraphConfig;
use hilo_core::entities::{Chat, Mention, NormalizedMessage, RawMessage};
use hilo_core::enums::{ChatKind, EdgeKind, Intent, TimeOfDay};
use hilo_core::ids::NodeId;
use hilo_embeddings::{Embedder, EmbeddingError, HashingEmbedder};
use hilo_graph::{GraphBuilder, GraphError, ThreadPartition, reconstruct};
use pretty_assertions::assert_eq;

fn chat() -> Chat {
    Chat {
        id: 7,
        name: "Ventas".to_string(),
        kind: ChatKind::SmallGroup,
        unread_count: 0,
        folder_tags: Vec::new(),
    }
}

fn base() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 10, 9, 0, 0).unwrap()
}

fn msg(id: i64, sender: i64, secs: i64, reply: Option<i64>, text: &str) -> NormalizedMessage {
    NormalizedMessage::passthrough(RawMessage {
        id,
        chat_id: 7,
        sender_id: sender,
        sender_display_name: format!("user{sender}"),
        sender_handle: Some(format!("handle{sender}")),
        text: text.to_string(),
        timestamp: base() + Duration::seconds(secs),
        reply_to_id: reply,
        reactions: BTreeMap::new(),
        mentions: Vec::new(),
        media: None,
    })
}

fn no_semantic() -> GraphConfig {
    GraphConfig {
        semantic_edges: false,
        ..GraphConfig::default()
    }
}

fn scenario() -> Vec<NormalizedMessage> {
    vec![
        msg(1, 10, 0, None, "¿alguien vende bici?"),
        msg(2, 20, 60, Some(1), "yo vendo una en $1500"),
        msg(3, 30, 120, Some(1), "yo también tengo"),
        msg(4, 10, 100_000, None, "hola"),
    ]
}

#[test]
fn replies_form_one_thread_and_late_message_is_orphan() {
    let out = reconstruct(&chat(), &scenario(), &no_semantic(), None).unwrap();
    let threads = out.partition.threads();
    assert_eq!(threads.len(), 1);
    assert_eq!(threads[0].thread_id, "thread_1");
    assert_eq!(threads[0].root_message_id, 1);
    assert_eq!(threads[0].ordered_message_ids, [1, 2, 3]);
    assert_eq!(out.partition.orphans(), [4]);
}

#[test]
fn every_reply_shares_a_thread_with_its_parent() {
    let messages: Vec<_> = (1..=12)
        .map(|i| {
            let reply = (i > 1 && i % 3 != 1).then(|| i - 1);
            msg(i, i % 4, i * 1000, reply, "mensaje")
        })
        .collect();
    let out = reconstruct(&chat(), &messages, &no_semantic(), None).unwrap();
    for m in &messages {
        if let Some(parent) = m.message.reply_to_id {
            let thread = out.partition.thread_of(m.id()).expect("reply is threaded");
            assert!(thread.contains(parent));
        }
    }
    let mut seen = std::collections::HashSet::new();
    for thread in out.partition.threads() {
        for id in &thread.ordered_message_ids {
            assert!(seen.insert(*id), "message {id} in two threads");
        }
    }
}

#[test]
fn edge_rules_and_weights() {
    let mut messages = scenario();
    messages[2].message.mentions.push(Mention {
        user_id: None,
        text: "@Handle20".to_string(),
    });
    messages.push(msg(5, 30, 180, Some(999), "y barata"));
    let graph = GraphBuilder::new(&no_semantic()).build(&chat(), &messages).unwrap();

    let counts = graph.edge_counts();
    assert_eq!(counts[&EdgeKind::AuthoredBy], 5);
    assert_eq!(counts[&EdgeKind::ReplyTo], 2);
    assert_eq!(counts[&EdgeKind::Mentions], 1);
    assert_eq!(counts[&EdgeKind::TemporalNear], 3);
    assert_eq!(counts[&EdgeKind::SameAuthorSequence], 1);
    assert_eq!(counts[&EdgeKind::SemanticSim], 0);

    let edge = |kind: EdgeKind, from: NodeId, to: NodeId| {
        graph
            .edges()
            .find(|(s, t, d)| d.kind == kind && *s == from && *t == to)
            .map(|(_, _, d)| d.clone())
    };
    let temporal = edge(EdgeKind::TemporalNear, NodeId::Message(2), NodeId::Message(1)).unwrap();
    assert!((temporal.weight - 0.8).abs() < 1e-9);
    assert_eq!(temporal.features.get("gap_seconds"), Some(&60.0));
    let mention = edge(EdgeKind::Mentions, NodeId::Message(3), NodeId::User(20)).unwrap();
    assert!((mention.weight - 0.7).abs() < 1e-9);
    let same = edge(EdgeKind::SameAuthorSequence, NodeId::Message(3), NodeId::Message(5)).unwrap();
    assert!((same.weight - 0.6).abs() < 1e-9);
    assert!(edge(EdgeKind::ReplyTo, NodeId::Message(5), NodeId::Message(999)).is_none());
}

#[test]
fn parallel_edges_combine_by_maximum_weight() {
    // 200 s apart: temporal weight 0.33 alone stays below the threshold,
    // the same-author edge (0.6) lifts the pair into one thread.
    let same_author = vec![msg(1, 10, 0, None, "uno"), msg(2, 10, 200, None, "dos")];
    let out = reconstruct(&chat(), &same_author, &no_semantic(), None).unwrap();
    assert_eq!(out.partition.len(), 1);

    let different = vec![msg(1, 10, 0, None, "uno"), msg(2, 20, 200, None, "dos")];
    let out = reconstruct(&chat(), &different, &no_semantic(), None).unwrap();
    assert!(out.partition.is_empty());
    assert_eq!(out.partition.orphans(), [1, 2]);
}

#[test]
fn reruns_are_byte_identical() {
    let config = GraphConfig::default();
    let embedder = HashingEmbedder::new(64);
    let messages: Vec<_> = (1..=30)
        .map(|i| msg(i, i % 5, i * 45, (i % 4 == 0).then(|| i - 2), &format!("tema {} precio", i % 3)))
        .collect();
    let mut shuffled = messages.clone();
    shuffled.reverse();

    let a = reconstruct(&chat(), &messages, &config, Some(&embedder)).unwrap();
    let b = reconstruct(&chat(), &shuffled, &config, Some(&embedder)).unwrap();
    let graph_a = serde_json::to_string(&a.graph.to_document()).unwrap();
    let graph_b = serde_json::to_string(&b.graph.to_document()).unwrap();
    assert_eq!(graph_a, graph_b);
    let threads_a = serde_json::to_string(&a.partition.to_document(&a.graph)).unwrap();
    let threads_b = serde_json::to_string(&b.partition.to_document(&b.graph)).unwrap();
    assert_eq!(threads_a, threads_b);
    assert_eq!(a.graph.node_count(), b.graph.node_count());
    assert_eq!(a.graph.edge_count(), b.graph.edge_count());
}

/// Two-dimensional topic vectors: apartment talk vs everything else.
#[derive(Debug)]
struct Topic;

impl Embedder for Topic {
    fn name(&self) -> &str {
        "topic"
    }
    fn dimension(&self) -> usize {
        2
    }
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Ok(texts
            .iter()
            .map(|t| if t.contains("depa") { vec![1.0, 0.0] } else { vec![0.0, 1.0] })
            .collect())
    }
}

#[derive(Debug)]
struct Failing;

impl Embedder for Failing {
    fn name(&self) -> &str {
        "failing"
    }
    fn dimension(&self) -> usize {
        2
    }
    fn embed_batch(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Err(EmbeddingError::EmbedFailed("offline".to_string()))
    }
}

#[test]
fn semantic_edges_join_distant_messages() {
    let messages = vec![
        msg(1, 10, 0, None, "busco depa en el centro"),
        msg(2, 20, 3_000, None, "el partido fue ayer"),
        msg(3, 30, 6_000, None, "tengo un depa disponible"),
    ];
    let out = reconstruct(&chat(), &messages, &GraphConfig::default(), Some(&Topic)).unwrap();
    assert!(out.graph.semantic_edges_enabled());
    assert_eq!(out.graph.edge_counts()[&EdgeKind::SemanticSim], 1);
    assert_eq!(out.partition.threads()[0].ordered_message_ids, [1, 3]);
    assert_eq!(out.partition.orphans(), [2]);
}

#[test]
fn failing_embedder_skips_semantic_edges() {
    let out = reconstruct(&chat(), &scenario(), &GraphConfig::default(), Some(&Failing)).unwrap();
    assert!(!out.graph.semantic_edges_enabled());
    assert_eq!(out.graph.edge_counts()[&EdgeKind::SemanticSim], 0);
    assert_eq!(out.partition.len(), 1);
}

#[test]
fn empty_chat_gives_empty_artifacts() {
    let out = reconstruct(&chat(), &[], &GraphConfig::default(), None).unwrap();
    assert!(out.graph.is_empty());
    assert!(out.partition.is_empty());
    assert_eq!(out.analysis.thread_metrics.total_threads, 0);
    assert_eq!(out.analysis.content_analysis.total_messages_analyzed, 0);
    assert!(out.analysis.graph_metrics.central_messages.is_empty());
    let doc = out.graph.to_document();
    assert!(doc.nodes.is_empty() && doc.edges.is_empty());
}

#[test]
fn repeated_message_ids_keep_the_earliest_copy() {
    let messages = vec![
        msg(1, 10, 5, None, "segunda copia"),
        msg(1, 10, 0, None, "original"),
        msg(2, 20, 10, Some(1), "respuesta"),
    ];
    let out = reconstruct(&chat(), &messages, &no_semantic(), None).unwrap();
    assert_eq!(out.graph.duplicates_skipped(), 1);
    assert_eq!(out.graph.message_ids(), [1, 2]);
    assert_eq!(out.graph.message(1).unwrap().text, "original");
    assert!(out.graph.contains(NodeId::Message(2)));

    let doc = out.graph.to_document();
    assert_eq!(doc.metadata.duplicates_skipped, 1);
    assert_eq!(doc.metadata.message_count, 2);
    assert_eq!(out.partition.len(), 1);
}

#[test]
fn foreign_messages_are_rejected() {
    let mut foreign = msg(2, 10, 0, None, "a");
    foreign.message.chat_id = 8;
    assert!(matches!(
        GraphBuilder::new(&no_semantic()).build(&chat(), &[foreign]),
        Err(GraphError::ForeignMessage { found: 8, .. })
    ));
}

#[test]
fn analytics_on_the_reply_scenario() {
    let out = reconstruct(&chat(), &scenario(), &no_semantic(), None).unwrap();
    let analysis = &out.analysis;

    assert_eq!(analysis.thread_metrics.total_threads, 1);
    assert!((analysis.thread_metrics.avg_thread_length - 3.0).abs() < 1e-9);
    assert_eq!(analysis.thread_metrics.orphan_messages, 1);

    let intents = &analysis.content_analysis.intention_distribution;
    assert_eq!(intents[&Intent::Question], 1);
    assert_eq!(intents[&Intent::Offer], 1);
    assert_eq!(intents[&Intent::Statement], 1);
    assert_eq!(intents[&Intent::Greeting], 1);
    assert_eq!(intents.values().sum::<usize>(), 4);

    let top = &analysis.user_engagement.most_active_users[0];
    assert_eq!(top.user_id, 10);
    assert_eq!(top.replies_received, 2);
    assert!((top.engagement_score - 4.0).abs() < 1e-9);

    let bigrams: Vec<_> = analysis
        .conversation_patterns
        .intention_bigrams
        .iter()
        .map(|(k, v)| (k.as_str(), *v))
        .collect();
    assert_eq!(bigrams, [("offer->statement", 1), ("question->offer", 1)]);

    assert_eq!(
        analysis.temporal_analysis.threads_by_time_of_day[&TimeOfDay::Morning],
        1
    );
    let metrics = &analysis.graph_metrics;
    assert_eq!(metrics.node_count, 7);
    assert_eq!(metrics.edge_count, 8);
    assert_eq!(metrics.weakly_connected_components, 1);
    assert!((metrics.density - 0.1905).abs() < 1e-9);
    assert!(metrics.central_messages.iter().any(|(id, _)| id == "message:2"));
}

#[test]
fn partition_respects_min_thread_size() {
    let config = GraphConfig {
        min_thread_size: 4,
        ..no_semantic()
    };
    let graph = GraphBuilder::new(&config).build(&chat(), &scenario()).unwrap();
    let partition = ThreadPartition::from_graph(&graph, &config);
    assert!(partition.is_empty());
    assert_eq!(partition.orphans(), [1, 2, 3, 4]);
    let doc = partition.to_document(&graph);
    assert_eq!(doc.metadata.orphan_count, 4);
    assert_eq!(doc.metadata.min_thread_size, 4);
}
