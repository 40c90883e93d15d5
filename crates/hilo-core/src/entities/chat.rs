use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::ChatKind;
use crate::ids::artifact_base;

/// A chat discovered by the ingestion collaborator.
///
/// Created on discovery; mutated only by metadata refresh.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Chat {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub kind: ChatKind,
    #[serde(default)]
    pub unread_count: u32,
    #[serde(default)]
    pub folder_tags: Vec<String>,
}

impl Chat {
    /// Base name shared by every artifact persisted for this chat.
    #[must_use]
    pub fn artifact_base(&self) -> String {
        artifact_base(&self.name, self.id)
    }

    /// Apply refreshed metadata from the platform, keeping identity.
    pub fn refresh_from(&mut self, other: &Self) {
        debug_assert_eq!(self.id, other.id);
        self.name.clone_from(&other.name);
        self.kind = other.kind;
        self.unread_count = other.unread_count;
        self.folder_tags.clone_from(&other.folder_tags);
    }
}
