//! The persistence collaborator and its JSON-directory implementation.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use hilo_core::entities::{BatchReport, Chat};
use hilo_core::enums::ArtifactKind;
use hilo_schema::SchemaRegistry;
use hilo_schema::registry::REPORT;
use serde::Serialize;

use crate::error::StoreError;

pub const REPORT_FILE: &str = "report.json";

/// Serialized artifacts of one chat, keyed by kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArtifactSet {
    entries: BTreeMap<ArtifactKind, serde_json::Value>,
}

impl ArtifactSet {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Serialize `value` as the `kind` artifact, replacing any previous one.
    ///
    /// # Errors
    ///
    /// [`StoreError::Serialize`] when `value` cannot be represented as JSON.
    pub fn insert<T: Serialize + ?Sized>(
        &mut self,
        kind: ArtifactKind,
        value: &T,
    ) -> Result<(), StoreError> {
        let json = serde_json::to_value(value).map_err(|source| StoreError::Serialize {
            artifact: kind.to_string(),
            source,
        })?;
        self.entries.insert(kind, json);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, kind: ArtifactKind) -> Option<&serde_json::Value> {
        self.entries.get(&kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = ArtifactKind> + '_ {
        self.entries.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ArtifactKind, &serde_json::Value)> {
        self.entries.iter().map(|(k, v)| (*k, v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Where per-chat artifacts and the batch report go.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Persist every artifact of `chat`. Afterwards either the whole set is
    /// stored or nothing of it is. Returns the stored kinds.
    async fn persist(
        &self,
        chat: &Chat,
        artifacts: &ArtifactSet,
    ) -> Result<Vec<ArtifactKind>, StoreError>;

    async fn write_report(&self, report: &BatchReport) -> Result<(), StoreError>;
}

/// Writes `<base>_<kind>.json` files and `report.json` into one directory.
///
/// Each chat's files are written to temporaries first and renamed into place
/// only once all of them were written. Artifacts of the chat left over from
/// an earlier run but absent from the new set are removed.
#[derive(Debug, Clone)]
pub struct JsonDirStore {
    dir: PathBuf,
    schemas: Option<Arc<SchemaRegistry>>,
}

impl JsonDirStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            schemas: None,
        }
    }

    /// Validate every artifact against its schema before writing.
    #[must_use]
    pub fn with_validation(mut self, schemas: Arc<SchemaRegistry>) -> Self {
        self.schemas = Some(schemas);
        self
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Final path of an artifact of `chat`.
    #[must_use]
    pub fn artifact_path(&self, chat: &Chat, kind: ArtifactKind) -> PathBuf {
        self.dir.join(kind.file_name(&chat.artifact_base()))
    }

    /// Pretty JSON of `value`, validated against the schema `name` first
    /// when validation is on.
    fn encode(&self, name: &str, value: &serde_json::Value) -> Result<Vec<u8>, StoreError> {
        if let Some(schemas) = &self.schemas {
            schemas.validate(name, value)?;
        }
        serde_json::to_vec_pretty(value).map_err(|source| StoreError::Serialize {
            artifact: name.to_string(),
            source,
        })
    }

    fn persist_blocking(
        &self,
        base: &str,
        files: Vec<(ArtifactKind, Vec<u8>)>,
    ) -> Result<Vec<ArtifactKind>, StoreError> {
        create_dir(&self.dir)?;

        let mut staged: Vec<(ArtifactKind, PathBuf, PathBuf)> = Vec::with_capacity(files.len());
        for (kind, bytes) in files {
            let target = self.dir.join(kind.file_name(base));
            let temp = temp_path(&target);
            if let Err(err) = write_file(&temp, &bytes) {
                discard(staged.iter().map(|(_, t, _)| t.as_path()));
                discard([temp.as_path()]);
                return Err(err);
            }
            staged.push((kind, temp, target));
        }

        for (i, (_, temp, target)) in staged.iter().enumerate() {
            if let Err(source) = std::fs::rename(temp, target) {
                discard(staged[..i].iter().map(|(_, _, t)| t.as_path()));
                discard(staged[i..].iter().map(|(_, t, _)| t.as_path()));
                return Err(StoreError::Io {
                    path: target.clone(),
                    source,
                });
            }
        }

        let stored: Vec<ArtifactKind> = staged.into_iter().map(|(kind, _, _)| kind).collect();
        let stale: Vec<PathBuf> = ArtifactKind::ALL
            .iter()
            .filter(|kind| !stored.contains(kind))
            .map(|kind| self.dir.join(kind.file_name(base)))
            .collect();
        discard(stale.iter().map(PathBuf::as_path));
        Ok(stored)
    }
}

#[async_trait]
impl ArtifactStore for JsonDirStore {
    async fn persist(
        &self,
        chat: &Chat,
        artifacts: &ArtifactSet,
    ) -> Result<Vec<ArtifactKind>, StoreError> {
        let base = chat.artifact_base();
        let files = artifacts
            .iter()
            .map(|(kind, value)| Ok((kind, self.encode(kind.as_str(), value)?)))
            .collect::<Result<Vec<_>, StoreError>>()?;

        let store = self.clone();
        let stored = tokio::task::spawn_blocking(move || store.persist_blocking(&base, files))
            .await
            .map_err(|e| StoreError::Io {
                path: self.dir.clone(),
                source: std::io::Error::other(e),
            })??;
        tracing::debug!(chat_id = chat.id, artifacts = stored.len(), "artifacts persisted");
        Ok(stored)
    }

    async fn write_report(&self, report: &BatchReport) -> Result<(), StoreError> {
        let value = serde_json::to_value(report).map_err(|source| StoreError::Serialize {
            artifact: REPORT.to_string(),
            source,
        })?;
        let bytes = self.encode(REPORT, &value)?;
        let dir = self.dir.clone();
        tokio::task::spawn_blocking(move || {
            create_dir(&dir)?;
            let target = dir.join(REPORT_FILE);
            let temp = temp_path(&target);
            write_file(&temp, &bytes)?;
            std::fs::rename(&temp, &target).map_err(|source| {
                discard([temp.as_path()]);
                StoreError::Io {
                    path: target.clone(),
                    source,
                }
            })
        })
        .await
        .map_err(|e| StoreError::Io {
            path: self.dir.join(REPORT_FILE),
            source: std::io::Error::other(e),
        })?
    }
}

fn temp_path(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    target.with_file_name(format!(".{name}.tmp"))
}

fn create_dir(dir: &Path) -> Result<(), StoreError> {
    std::fs::create_dir_all(dir).map_err(|source| StoreError::Io {
        path: dir.to_path_buf(),
        source,
    })
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    std::fs::write(path, bytes).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Best-effort removal; missing files are fine.
fn discard<'a>(paths: impl IntoIterator<Item = &'a Path>) {
    for path in paths {
        if let Err(err) = std::fs::remove_file(path)
            && err.kind() != std::io::ErrorKind::NotFound
        {
            tracing::warn!(path = %path.display(), error = %err, "failed to remove file");
        }
    }
}

#[cfg(test)]
mod tests {
    use hilo_core::entities::{ChatOutcome, ChatStatus};
    use hilo_core::enums::ChatKind;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn chat() -> Chat {
        Chat {
            id: 5,
            name: "Ventas MX".into(),
            kind: ChatKind::MegaGroup,
            unread_count: 0,
            folder_tags: Vec::new(),
        }
    }

    fn listing(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn persist_replaces_the_previous_set() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonDirStore::new(dir.path());

        let mut first = ArtifactSet::new();
        first.insert(ArtifactKind::Normalized, &json!([])).unwrap();
        first.insert(ArtifactKind::Trends, &json!({"total": 0})).unwrap();
        let stored = store.persist(&chat(), &first).await.unwrap();
        assert_eq!(stored, [ArtifactKind::Normalized, ArtifactKind::Trends]);
        assert_eq!(
            listing(dir.path()),
            ["ventas_mx_5_normalized.json", "ventas_mx_5_trends.json"]
        );

        let mut second = ArtifactSet::new();
        second.insert(ArtifactKind::Normalized, &json!([1])).unwrap();
        store.persist(&chat(), &second).await.unwrap();
        assert_eq!(listing(dir.path()), ["ventas_mx_5_normalized.json"]);

        let written: serde_json::Value = serde_json::from_slice(
            &std::fs::read(store.artifact_path(&chat(), ArtifactKind::Normalized)).unwrap(),
        )
        .unwrap();
        assert_eq!(written, json!([1]));
    }

    #[tokio::test]
    async fn invalid_artifact_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store =
            JsonDirStore::new(dir.path()).with_validation(Arc::new(SchemaRegistry::new()));

        let mut set = ArtifactSet::new();
        set.insert(ArtifactKind::Normalized, &json!([])).unwrap();
        set.insert(ArtifactKind::Graph, &json!({"nodes": "not a map"}))
            .unwrap();
        let err = store.persist(&chat(), &set).await.unwrap_err();
        assert!(matches!(err, StoreError::Schema(_)), "{err}");
        assert!(listing(dir.path()).is_empty());
    }

    #[tokio::test]
    async fn report_is_written_atomically() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonDirStore::new(dir.path().join("out"))
            .with_validation(Arc::new(SchemaRegistry::new()));
        let report = BatchReport {
            chats: vec![ChatOutcome {
                chat_id: 5,
                chat_name: "Ventas MX".into(),
                status: ChatStatus::Failed,
                messages_processed: 0,
                skipped_malformed: 0,
                artifacts: Vec::new(),
                error: Some("boom".into()),
            }],
        };
        store.write_report(&report).await.unwrap();

        assert_eq!(listing(store.dir()), [REPORT_FILE]);
        let back: BatchReport =
            serde_json::from_slice(&std::fs::read(store.dir().join(REPORT_FILE)).unwrap())
                .unwrap();
        assert_eq!(back, report);
    }

    #[test]
    fn temp_files_are_hidden_siblings() {
        assert_eq!(
            temp_path(Path::new("/out/a_graph.json")),
            PathBuf::from("/out/.a_graph.json.tmp")
        );
    }
}
