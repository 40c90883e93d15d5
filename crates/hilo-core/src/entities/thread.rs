use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::Intent;

/// A reconstructed conversation thread.
///
/// Messages are ordered by timestamp (ties by id); the earliest is the root.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Thread {
    pub thread_id: String,
    pub root_message_id: i64,
    pub ordered_message_ids: Vec<i64>,
    pub participants: BTreeSet<i64>,
    pub start_ts: DateTime<Utc>,
    pub end_ts: DateTime<Utc>,
}

impl Thread {
    #[must_use]
    pub fn len(&self) -> usize {
        self.ordered_message_ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ordered_message_ids.is_empty()
    }

    #[must_use]
    pub fn contains(&self, message_id: i64) -> bool {
        self.ordered_message_ids.contains(&message_id)
    }
}

/// Serialized thread set: `{ metadata, threads, orphans }`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ThreadsDocument {
    pub metadata: ThreadsMetadata,
    pub threads: BTreeMap<String, ThreadEntry>,
    /// Messages whose component fell below the minimum thread size.
    pub orphans: Vec<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ThreadsMetadata {
    pub chat_id: i64,
    pub chat_name: String,
    pub total_threads: usize,
    pub total_messages: usize,
    pub orphan_count: usize,
    pub min_thread_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ThreadEntry {
    pub root_message_id: i64,
    pub messages: Vec<MessageRef>,
    pub participants: Vec<i64>,
    pub start_ts: DateTime<Utc>,
    pub end_ts: DateTime<Utc>,
}

/// Compact message reference inside a thread.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct MessageRef {
    pub id: i64,
    pub sender_id: i64,
    pub timestamp: DateTime<Utc>,
    pub intention: Intent,
    pub text: String,
}
