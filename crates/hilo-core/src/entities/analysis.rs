use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{EdgeKind, Intent, TimeOfDay};

/// Derived analytics over a chat's knowledge graph and thread set.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ConversationAnalysis {
    pub chat_id: i64,
    pub chat_name: String,
    pub thread_metrics: ThreadMetrics,
    pub content_analysis: ContentAnalysis,
    pub user_engagement: UserEngagement,
    pub conversation_patterns: ConversationPatterns,
    pub temporal_analysis: TemporalAnalysis,
    pub graph_metrics: GraphMetrics,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ThreadMetrics {
    pub total_threads: usize,
    pub avg_thread_length: f64,
    pub min_thread_length: usize,
    pub max_thread_length: usize,
    pub orphan_messages: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ContentAnalysis {
    pub total_messages_analyzed: usize,
    pub avg_message_length: f64,
    pub intention_distribution: BTreeMap<Intent, usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct UserEngagement {
    /// Per-user stats keyed by `user:<id>`.
    pub users: BTreeMap<String, UserEngagementEntry>,
    /// Users sorted by engagement score, descending (ties by id).
    pub most_active_users: Vec<UserEngagementEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct UserEngagementEntry {
    pub user_id: i64,
    pub display_name: String,
    pub message_count: usize,
    pub replies_received: usize,
    pub mentions_received: usize,
    pub engagement_score: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ConversationPatterns {
    /// Histogram of `from->to` intention bigrams along thread paths.
    pub intention_bigrams: BTreeMap<String, usize>,
    pub common_patterns: Vec<IntentBigram>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct IntentBigram {
    pub from: Intent,
    pub to: Intent,
    pub count: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct TemporalAnalysis {
    pub thread_start_times: BTreeMap<String, DateTime<Utc>>,
    pub threads_by_time_of_day: BTreeMap<TimeOfDay, usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct GraphMetrics {
    pub node_count: usize,
    pub edge_count: usize,
    pub edges_by_kind: BTreeMap<EdgeKind, usize>,
    pub weakly_connected_components: usize,
    pub density: f64,
    /// Highest betweenness centrality message nodes, empty when the graph
    /// exceeds the centrality node budget.
    pub central_messages: Vec<(String, f64)>,
}
