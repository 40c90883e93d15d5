//! Identifier formatting for graph nodes, threads and artifact file names.
//!
//! ```text
//! user:<user_id>        knowledge-graph user node
//! message:<message_id>  knowledge-graph message node
//! thread_<root_id>      thread keyed by its root message
//! <slug>_<chat_id>      artifact base name for a chat
//! ```

use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

pub const USER_PREFIX: &str = "user";
pub const MESSAGE_PREFIX: &str = "message";
pub const THREAD_PREFIX: &str = "thread_";

/// Identifier of a knowledge-graph node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeId {
    User(i64),
    Message(i64),
}

impl NodeId {
    #[must_use]
    pub const fn is_message(self) -> bool {
        matches!(self, Self::Message(_))
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User(id) => write!(f, "{USER_PREFIX}:{id}"),
            Self::Message(id) => write!(f, "{MESSAGE_PREFIX}:{id}"),
        }
    }
}

impl FromStr for NodeId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (prefix, raw) = s
            .split_once(':')
            .ok_or_else(|| CoreError::MalformedId(s.to_string()))?;
        let id: i64 = raw
            .parse()
            .map_err(|_| CoreError::MalformedId(s.to_string()))?;
        match prefix {
            USER_PREFIX => Ok(Self::User(id)),
            MESSAGE_PREFIX => Ok(Self::Message(id)),
            _ => Err(CoreError::MalformedId(s.to_string())),
        }
    }
}

/// Deterministic thread id derived from the root message.
#[must_use]
pub fn thread_id(root_message_id: i64) -> String {
    format!("{THREAD_PREFIX}{root_message_id}")
}

/// Artifact base name for a chat: a lowercase ASCII slug of the chat name
/// followed by the chat id, e.g. `ventas_mx_-100123`.
#[must_use]
pub fn artifact_base(chat_name: &str, chat_id: i64) -> String {
    let mut slug = String::with_capacity(chat_name.len());
    let mut last_was_sep = true;
    for ch in chat_name.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
            last_was_sep = false;
        } else if !last_was_sep {
            slug.push('_');
            last_was_sep = true;
        }
    }
    while slug.ends_with('_') {
        slug.pop();
    }
    if slug.is_empty() {
        format!("chat_{chat_id}")
    } else {
        format!("{slug}_{chat_id}")
    }
}
