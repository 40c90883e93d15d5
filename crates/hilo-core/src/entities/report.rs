use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::ArtifactKind;

/// Outcome of one chat in a batch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ChatStatus {
    /// Every artifact was persisted.
    Complete,
    /// Cancelled after graph construction; the persisted set is partial.
    Partial,
    /// Cancelled before anything could be persisted.
    Cancelled,
    /// The chat aborted; no artifacts exist for it.
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ChatOutcome {
    pub chat_id: i64,
    pub chat_name: String,
    pub status: ChatStatus,
    pub messages_processed: usize,
    pub skipped_malformed: usize,
    #[serde(default)]
    pub artifacts: Vec<ArtifactKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Batch-level report written next to the artifacts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct BatchReport {
    pub chats: Vec<ChatOutcome>,
}

impl BatchReport {
    #[must_use]
    pub fn failed(&self) -> usize {
        self.chats
            .iter()
            .filter(|c| c.status == ChatStatus::Failed)
            .count()
    }

    #[must_use]
    pub fn all_complete(&self) -> bool {
        self.chats.iter().all(|c| c.status == ChatStatus::Complete)
    }
}
