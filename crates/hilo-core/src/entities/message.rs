use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::FileKind;

/// A message as produced by the ingestion collaborator. Immutable after ingestion.
///
/// `id` is unique within `chat_id`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct RawMessage {
    pub id: i64,
    pub chat_id: i64,
    pub sender_id: i64,
    pub sender_display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_handle: Option<String>,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to_id: Option<i64>,
    #[serde(default)]
    pub reactions: BTreeMap<String, u32>,
    #[serde(default)]
    pub mentions: Vec<Mention>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media: Option<MediaRef>,
}

impl RawMessage {
    /// Total reactions across all emoji.
    #[must_use]
    pub fn reaction_count(&self) -> u32 {
        self.reactions.values().sum()
    }
}

/// A user mention inside a message. `user_id` is absent for plain `@handle` text.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Mention {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    pub text: String,
}

/// Reference to an attached media object (never downloaded by the core).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct MediaRef {
    pub kind: FileKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
}

/// A [`RawMessage`] whose `text` has been normalized: URLs replaced by
/// bracketed descriptors and markdown stripped.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct NormalizedMessage {
    #[serde(flatten)]
    pub message: RawMessage,
    /// Rendered labels substituted for URLs, in order of appearance.
    #[serde(default)]
    pub links: Vec<String>,
    /// Character length of the text before normalization.
    pub original_length: usize,
}

impl NormalizedMessage {
    #[must_use]
    pub fn id(&self) -> i64 {
        self.message.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.message.text
    }

    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.message.timestamp
    }

    #[must_use]
    pub fn sender_id(&self) -> i64 {
        self.message.sender_id
    }

    /// Wrap a message whose text is already normalized.
    #[must_use]
    pub fn passthrough(message: RawMessage) -> Self {
        let original_length = message.text.chars().count();
        Self {
            message,
            links: Vec::new(),
            original_length,
        }
    }
}
