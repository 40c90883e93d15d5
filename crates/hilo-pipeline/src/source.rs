//! The ingestion collaborator and its file-backed implementation.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::stream::{self, BoxStream};
use hilo_core::entities::{Chat, RawMessage};

use crate::error::SourceError;
use crate::wire::parse_record;

/// Messages of one chat. Items are messages or per-record errors;
/// [`SourceError::Malformed`] items are skipped by the runner,
/// [`SourceError::Transient`] items reopen the stream with backoff, any
/// other error aborts the chat.
pub type MessageStream = BoxStream<'static, Result<RawMessage, SourceError>>;

/// Inclusive time window of an ingestion run. Open ends are unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl TimeWindow {
    #[must_use]
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start.is_none_or(|s| at >= s) && self.end.is_none_or(|e| at <= e)
    }
}

/// Where chats and their messages come from.
#[async_trait]
pub trait MessageSource: Send + Sync {
    async fn list_chats(&self) -> Result<Vec<Chat>, SourceError>;

    /// Messages of `chat` within `window`, in any order. Reopening the
    /// stream for the same window must yield the same sequence: after a
    /// transient error mid-stream the runner reopens it and skips the items
    /// it already handled.
    async fn iter_messages(
        &self,
        chat: &Chat,
        window: TimeWindow,
    ) -> Result<MessageStream, SourceError>;
}

/// Reads a directory of chat exports:
///
/// ```text
/// chats.json          [Chat, ...]
/// <chat_id>.jsonl     one message record per line
/// <chat_id>.json      or a JSON array of message records
/// ```
#[derive(Debug, Clone)]
pub struct ExportDirSource {
    dir: PathBuf,
}

pub const CHATS_FILE: &str = "chats.json";

impl ExportDirSource {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn read_chats(dir: &Path) -> Result<Vec<Chat>, SourceError> {
        let path = dir.join(CHATS_FILE);
        let raw = std::fs::read(&path).map_err(|source| SourceError::Io {
            path: path.clone(),
            source,
        })?;
        serde_json::from_slice(&raw).map_err(|source| SourceError::Json { path, source })
    }

    /// Every record of a chat file, parsed or rejected, in file order.
    fn read_records(
        dir: &Path,
        chat_id: i64,
    ) -> Result<Vec<Result<RawMessage, SourceError>>, SourceError> {
        let lines = dir.join(format!("{chat_id}.jsonl"));
        let array = dir.join(format!("{chat_id}.json"));

        let values: Vec<Result<serde_json::Value, String>> = if lines.exists() {
            serde_jsonlines::json_lines::<serde_json::Value, _>(&lines)
                .map_err(|source| SourceError::Io {
                    path: lines.clone(),
                    source,
                })?
                .map(|line| line.map_err(|e| e.to_string()))
                .collect()
        } else if array.exists() {
            let raw = std::fs::read(&array).map_err(|source| SourceError::Io {
                path: array.clone(),
                source,
            })?;
            serde_json::from_slice::<Vec<serde_json::Value>>(&raw)
                .map_err(|source| SourceError::Json {
                    path: array.clone(),
                    source,
                })?
                .into_iter()
                .map(Ok)
                .collect()
        } else {
            return Err(SourceError::MissingMessages {
                chat_id,
                dir: dir.to_path_buf(),
            });
        };

        Ok(values
            .into_iter()
            .enumerate()
            .map(|(index, value)| {
                value
                    .and_then(|v| parse_record(v, chat_id))
                    .map_err(|reason| SourceError::Malformed {
                        chat_id,
                        index,
                        reason,
                    })
            })
            .collect())
    }
}

#[async_trait]
impl MessageSource for ExportDirSource {
    async fn list_chats(&self) -> Result<Vec<Chat>, SourceError> {
        let dir = self.dir.clone();
        tokio::task::spawn_blocking(move || Self::read_chats(&dir))
            .await
            .map_err(|e| SourceError::Transient(e.to_string()))?
    }

    async fn iter_messages(
        &self,
        chat: &Chat,
        window: TimeWindow,
    ) -> Result<MessageStream, SourceError> {
        let dir = self.dir.clone();
        let chat_id = chat.id;
        let records = tokio::task::spawn_blocking(move || Self::read_records(&dir, chat_id))
            .await
            .map_err(|e| SourceError::Transient(e.to_string()))??;

        let in_window = records.into_iter().filter(move |r| match r {
            Ok(message) => window.contains(message.timestamp),
            Err(_) => true,
        });
        Ok(Box::pin(stream::iter(in_window)))
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use futures::StreamExt;
    use pretty_assertions::assert_eq;

    use super::*;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 10, hour, 0, 0).unwrap()
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let window = TimeWindow {
            start: Some(at(9)),
            end: Some(at(12)),
        };
        assert!(window.contains(at(9)));
        assert!(window.contains(at(12)));
        assert!(!window.contains(at(8)));
        assert!(!window.contains(at(13)));
        assert!(TimeWindow::default().contains(at(0)));
    }

    #[tokio::test]
    async fn reads_array_exports() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CHATS_FILE),
            r#"[{"id": 3, "name": "Vecinos"}]"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("3.json"),
            r#"[
                {"id": 1, "sender_id": 10, "text": "hola", "date": "2024-05-10T09:00:00Z"},
                {"id": 2, "sender_id": 11, "text": "sin fecha"}
            ]"#,
        )
        .unwrap();

        let source = ExportDirSource::new(dir.path());
        let chats = source.list_chats().await.unwrap();
        assert_eq!(chats.len(), 1);
        assert_eq!(chats[0].name, "Vecinos");

        let items: Vec<_> = source
            .iter_messages(&chats[0], TimeWindow::default())
            .await
            .unwrap()
            .collect()
            .await;
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].as_ref().unwrap().text, "hola");
        assert!(items[1].as_ref().unwrap_err().is_malformed());
    }

    #[tokio::test]
    async fn missing_chat_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = ExportDirSource::new(dir.path());
        let chat = Chat {
            id: 9,
            name: "x".into(),
            kind: hilo_core::enums::ChatKind::Unknown,
            unread_count: 0,
            folder_tags: Vec::new(),
        };
        let Err(err) = source.iter_messages(&chat, TimeWindow::default()).await else {
            panic!("expected an error");
        };
        assert!(matches!(err, SourceError::MissingMessages { chat_id: 9, .. }));
        assert!(matches!(
            source.list_chats().await,
            Err(SourceError::Io { .. })
        ));
    }
}
