//! Conversation analytics over a knowledge graph and its thread partition.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::Timelike;
use hilo_config::GraphConfig;
use hilo_core::entities::{
    ContentAnalysis, ConversationAnalysis, ConversationPatterns, GraphMetrics, IntentBigram,
    TemporalAnalysis, ThreadMetrics, UserEngagement, UserEngagementEntry,
};
use hilo_core::enums::{EdgeKind, Intent, TimeOfDay};
use hilo_core::ids::NodeId;
use rustworkx_core::centrality::betweenness_centrality;
use rustworkx_core::connectivity::connected_components;

use crate::graph::{KnowledgeGraph, round4};
use crate::partition::ThreadPartition;

/// Every analytics section for one chat.
#[must_use]
pub fn analyze(
    graph: &KnowledgeGraph,
    partition: &ThreadPartition,
    config: &GraphConfig,
) -> ConversationAnalysis {
    ConversationAnalysis {
        chat_id: graph.chat_id(),
        chat_name: graph.chat_name().to_string(),
        thread_metrics: thread_metrics(partition),
        content_analysis: content_analysis(graph),
        user_engagement: user_engagement(graph, config.top_k),
        conversation_patterns: conversation_patterns(graph, partition, config.top_k),
        temporal_analysis: temporal_analysis(partition),
        graph_metrics: graph_metrics(graph, config),
    }
}

#[allow(clippy::cast_precision_loss)]
fn thread_metrics(partition: &ThreadPartition) -> ThreadMetrics {
    let lengths: Vec<usize> = partition.threads().iter().map(|t| t.len()).collect();
    let total: usize = lengths.iter().sum();
    ThreadMetrics {
        total_threads: lengths.len(),
        avg_thread_length: if lengths.is_empty() {
            0.0
        } else {
            round2(total as f64 / lengths.len() as f64)
        },
        min_thread_length: lengths.iter().copied().min().unwrap_or(0),
        max_thread_length: lengths.iter().copied().max().unwrap_or(0),
        orphan_messages: partition.orphans().len(),
    }
}

#[allow(clippy::cast_precision_loss)]
fn content_analysis(graph: &KnowledgeGraph) -> ContentAnalysis {
    let mut intention_distribution: BTreeMap<Intent, usize> =
        Intent::ALL.iter().map(|&i| (i, 0)).collect();
    let mut total = 0usize;
    let mut chars = 0usize;
    for message in graph.messages() {
        total += 1;
        chars += message.text.chars().count();
        *intention_distribution.entry(message.intention).or_insert(0) += 1;
    }
    ContentAnalysis {
        total_messages_analyzed: total,
        avg_message_length: if total == 0 {
            0.0
        } else {
            round2(chars as f64 / total as f64)
        },
        intention_distribution,
    }
}

/// Engagement score: sum of authored edge weights plus replies received.
#[allow(clippy::cast_precision_loss)]
fn user_engagement(graph: &KnowledgeGraph, top_k: usize) -> UserEngagement {
    let mut authored: BTreeMap<i64, f64> = BTreeMap::new();
    let mut replies: BTreeMap<i64, usize> = BTreeMap::new();
    let mut mentions: BTreeMap<i64, usize> = BTreeMap::new();
    for (source, target, data) in graph.edges() {
        match (data.kind, source, target) {
            (EdgeKind::AuthoredBy, NodeId::User(user), _) => {
                *authored.entry(user).or_insert(0.0) += data.weight;
            }
            (EdgeKind::ReplyTo, _, NodeId::Message(parent)) => {
                if let Some(parent) = graph.message(parent) {
                    *replies.entry(parent.sender_id).or_insert(0) += 1;
                }
            }
            (EdgeKind::Mentions, _, NodeId::User(user)) => {
                *mentions.entry(user).or_insert(0) += 1;
            }
            _ => {}
        }
    }

    let users: BTreeMap<String, UserEngagementEntry> = graph
        .users()
        .map(|u| {
            let replies_received = replies.get(&u.user_id).copied().unwrap_or(0);
            let entry = UserEngagementEntry {
                user_id: u.user_id,
                display_name: u.display_name.clone(),
                message_count: u.message_count,
                replies_received,
                mentions_received: mentions.get(&u.user_id).copied().unwrap_or(0),
                engagement_score: round2(
                    authored.get(&u.user_id).copied().unwrap_or(0.0) + replies_received as f64,
                ),
            };
            (NodeId::User(u.user_id).to_string(), entry)
        })
        .collect();

    let mut most_active_users: Vec<UserEngagementEntry> = users
        .values()
        .filter(|e| e.message_count > 0)
        .cloned()
        .collect();
    most_active_users.sort_by(|a, b| {
        b.engagement_score
            .partial_cmp(&a.engagement_score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.user_id.cmp(&b.user_id))
    });
    most_active_users.truncate(top_k);

    UserEngagement {
        users,
        most_active_users,
    }
}

fn conversation_patterns(
    graph: &KnowledgeGraph,
    partition: &ThreadPartition,
    top_k: usize,
) -> ConversationPatterns {
    let mut counts: BTreeMap<(Intent, Intent), usize> = BTreeMap::new();
    for thread in partition.threads() {
        let intents: Vec<Intent> = thread
            .ordered_message_ids
            .iter()
            .filter_map(|&id| graph.message(id).map(|m| m.intention))
            .collect();
        for pair in intents.windows(2) {
            *counts.entry((pair[0], pair[1])).or_insert(0) += 1;
        }
    }

    let intention_bigrams = counts
        .iter()
        .map(|((from, to), count)| (format!("{from}->{to}"), *count))
        .collect();
    let mut common_patterns: Vec<IntentBigram> = counts
        .into_iter()
        .map(|((from, to), count)| IntentBigram { from, to, count })
        .collect();
    common_patterns.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| (a.from, a.to).cmp(&(b.from, b.to)))
    });
    common_patterns.truncate(top_k);

    ConversationPatterns {
        intention_bigrams,
        common_patterns,
    }
}

fn temporal_analysis(partition: &ThreadPartition) -> TemporalAnalysis {
    let mut threads_by_time_of_day: BTreeMap<TimeOfDay, usize> =
        TimeOfDay::ALL.iter().map(|&t| (t, 0)).collect();
    let mut thread_start_times = BTreeMap::new();
    for thread in partition.threads() {
        thread_start_times.insert(thread.thread_id.clone(), thread.start_ts);
        *threads_by_time_of_day
            .entry(TimeOfDay::from_hour(thread.start_ts.hour()))
            .or_insert(0) += 1;
    }
    TemporalAnalysis {
        thread_start_times,
        threads_by_time_of_day,
    }
}

/// Structural metrics. Centrality is skipped above the configured node budget.
#[allow(clippy::cast_precision_loss)]
fn graph_metrics(graph: &KnowledgeGraph, config: &GraphConfig) -> GraphMetrics {
    let inner = graph.inner();
    let nodes = inner.node_count();
    let edges = inner.edge_count();
    let density = if nodes < 2 {
        0.0
    } else {
        round4(edges as f64 / (nodes as f64 * (nodes - 1) as f64))
    };

    let central_messages = if nodes > 0 && nodes <= config.max_nodes_for_centrality {
        let scores = betweenness_centrality(inner, false, true, 200);
        let mut ranked: Vec<(String, f64)> = graph
            .message_ids()
            .iter()
            .filter_map(|&id| {
                let idx = graph.index_of(NodeId::Message(id))?;
                let score = scores.get(idx.index()).copied().flatten().unwrap_or(0.0);
                (score > 0.0).then(|| (NodeId::Message(id).to_string(), round4(score)))
            })
            .collect();
        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        ranked.truncate(config.top_k);
        ranked
    } else {
        if nodes > config.max_nodes_for_centrality {
            tracing::debug!(nodes, budget = config.max_nodes_for_centrality, "skipping centrality");
        }
        Vec::new()
    };

    GraphMetrics {
        node_count: nodes,
        edge_count: edges,
        edges_by_kind: graph.edge_counts(),
        weakly_connected_components: connected_components(inner).len(),
        density,
        central_messages,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
