//! Every artifact produced by the analysis stages validates against its
//! registered schema.

use std::collections::BTreeMap;

use chrono::{Duration, TimeZone, Utc};
use hilo_config::HiloConfig;
use hilo_core::entities::{
    BatchReport, Chat, ChatOutcome, ChatStatus, NormalizedMessage, RawMessage, SentimentsDocument,
};
use hilo_core::enums::{ArtifactKind, ChatKind};
use hilo_links::TextNormalizer;
use hilo_scan::PatternScanner;
use hilo_schema::{SchemaError, SchemaRegistry};
use hilo_sentiment::{SentimentEvaluator, summarize};
use pretty_assertions::assert_eq;

fn chat() -> Chat {
    Chat {
        id: 42,
        name: "Mercado Centro".into(),
        kind: ChatKind::SmallGroup,
        unread_count: 0,
        folder_tags: vec!["ventas".into()],
    }
}

fn raw(id: i64, offset_s: i64, sender: i64, text: &str, reply_to: Option<i64>) -> RawMessage {
    RawMessage {
        id,
        chat_id: 42,
        sender_id: sender,
        sender_display_name: format!("user{sender}"),
        sender_handle: Some(format!("user{sender}")),
        text: text.to_string(),
        timestamp: Utc.with_ymd_and_hms(2024, 5, 10, 9, 0, 0).unwrap()
            + Duration::seconds(offset_s),
        reply_to_id: reply_to,
        reactions: BTreeMap::new(),
        mentions: Vec::new(),
        media: None,
    }
}

fn normalized() -> Vec<NormalizedMessage> {
    let normalizer = TextNormalizer::builtin().unwrap();
    [
        raw(1, 0, 10, "¿Alguien vende bicis? mira https://www.youtube.com/watch?v=dQw4w9WgXcQ", None),
        raw(2, 60, 11, "Yo, en **150 usd**, escríbeme a ana@example.com", Some(1)),
        raw(3, 120, 10, "no me gusta ese precio, pero la bici es excelente", Some(2)),
        raw(4, 100_000, 12, "#remate $100-200 el viernes", None),
    ]
    .into_iter()
    .map(|m| normalizer.normalize_message(m))
    .collect()
}

#[test]
fn stage_outputs_validate() {
    let config = HiloConfig::default();
    let registry = SchemaRegistry::new();
    let chat = chat();
    let messages = normalized();

    let scanner = PatternScanner::from_config(&config.patterns).unwrap();
    let enrichments = scanner.scan_messages(&messages);
    let evaluator = SentimentEvaluator::from_config(&config.sentiment).unwrap();
    let sentiments = evaluator.evaluate_messages(&messages);
    let summary = summarize(&sentiments);
    let structure = hilo_graph::reconstruct(&chat, &messages, &config.graph, None).unwrap();
    let trends = hilo_trends::analyze_trends(&enrichments, &config.trends);

    let documents = [
        (ArtifactKind::Normalized, serde_json::to_value(&messages).unwrap()),
        (ArtifactKind::Patterns, serde_json::to_value(&enrichments).unwrap()),
        (
            ArtifactKind::Sentiments,
            serde_json::to_value(SentimentsDocument {
                messages: sentiments,
                summary,
            })
            .unwrap(),
        ),
        (
            ArtifactKind::Graph,
            serde_json::to_value(structure.graph.to_document()).unwrap(),
        ),
        (
            ArtifactKind::Threads,
            serde_json::to_value(structure.partition.to_document(&structure.graph)).unwrap(),
        ),
        (ArtifactKind::Analysis, serde_json::to_value(&structure.analysis).unwrap()),
        (ArtifactKind::Trends, serde_json::to_value(&trends).unwrap()),
    ];
    assert_eq!(documents.len(), ArtifactKind::ALL.len());

    for (kind, document) in &documents {
        if let Err(err) = registry.validate_artifact(*kind, document) {
            panic!("{kind} artifact does not match its schema: {err}");
        }
    }
}

#[test]
fn batch_report_validates() {
    let registry = SchemaRegistry::new();
    let report = BatchReport {
        chats: vec![
            ChatOutcome {
                chat_id: 42,
                chat_name: "Mercado Centro".into(),
                status: ChatStatus::Complete,
                messages_processed: 4,
                skipped_malformed: 1,
                artifacts: ArtifactKind::ALL.to_vec(),
                error: None,
            },
            ChatOutcome {
                chat_id: 7,
                chat_name: "Roto".into(),
                status: ChatStatus::Failed,
                messages_processed: 0,
                skipped_malformed: 0,
                artifacts: Vec::new(),
                error: Some("duplicate message 3 in chat 7".into()),
            },
        ],
    };
    registry.validate_value("report", &report).unwrap();
}

#[test]
fn tampered_graph_is_rejected() {
    let registry = SchemaRegistry::new();
    let chat = chat();
    let messages = normalized();
    let structure =
        hilo_graph::reconstruct(&chat, &messages, &HiloConfig::default().graph, None).unwrap();

    let mut document = serde_json::to_value(structure.graph.to_document()).unwrap();
    document["edges"][0]["data"]["kind"] = serde_json::json!("teleported_to");

    let err = registry
        .validate_artifact(ArtifactKind::Graph, &document)
        .unwrap_err();
    assert!(matches!(err, SchemaError::ValidationFailed { ref schema, .. } if schema == "graph"));
}
