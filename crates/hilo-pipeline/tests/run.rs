//! End-to-end runs from an export directory into a JSON artifact directory.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use futures::stream;
use hilo_config::{EmbeddingBackend, HiloConfig};
use hilo_core::entities::{BatchReport, Chat, ChatStatus, ThreadsDocument};
use hilo_core::enums::{ArtifactKind, ChatKind};
use hilo_pipeline::source::CHATS_FILE;
use hilo_pipeline::store::REPORT_FILE;
use hilo_pipeline::{
    CancelFlag, ExportDirSource, JsonDirStore, MessageSource, MessageStream, Pipeline,
    PipelineError, RetryPolicy, RunObserver, RunOptions, SourceError, TimeWindow,
};
use hilo_schema::SchemaRegistry;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn config() -> HiloConfig {
    let mut config = HiloConfig::default();
    config.embedding.backend = EmbeddingBackend::None;
    config.pipeline.batch_size = 2;
    config.pipeline.channel_capacity = 1;
    config
}

/// Chat 1 is the reply scenario as JSONL with one broken line, chat 2 a
/// small JSON array, chat 3 is listed but has no messages file.
fn export_dir(with_missing_chat: bool) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let mut chats = vec![
        r#"{"id": 1, "name": "Ventas", "kind": "small_group"}"#,
        r#"{"id": 2, "name": "Vecinos", "kind": "mega_group"}"#,
    ];
    if with_missing_chat {
        chats.push(r#"{"id": 3, "name": "Perdido"}"#);
    }
    std::fs::write(dir.path().join(CHATS_FILE), format!("[{}]", chats.join(","))).unwrap();

    let lines = [
        r#"{"id": 4, "sender_id": 10, "sender_display_name": "Ana", "text": "hola", "date": "2024-05-11T12:46:40Z"}"#,
        r#"{"id": 1, "sender_id": 10, "sender_display_name": "Ana", "text": "¿alguien vende bici?", "date": "2024-05-10T09:00:00Z"}"#,
        r#"{"id": 3, "sender_id": 30, "from": "Luis", "text": "yo también tengo", "date": "2024-05-10T09:02:00Z", "reply_to_id": 1}"#,
        r#"{"id": 9, "sender_id": 10, "text": "sin fecha"}"#,
        r#"{"id": 2, "from_id": "user20", "from": "Eva", "text": "yo vendo una en $1500", "date": 1715331660, "reply_to_message_id": 1}"#,
    ];
    std::fs::write(dir.path().join("1.jsonl"), lines.join("\n")).unwrap();

    std::fs::write(
        dir.path().join("2.json"),
        r#"[
            {"id": 1, "sender_id": 5, "text": "no me gusta el ruido", "date": "2024-05-10T03:00:00Z"},
            {"id": 2, "sender_id": 6, "text": "llámame al 555-123-4567", "date": "2024-05-10T03:01:00Z", "reply_to_id": 1}
        ]"#,
    )
    .unwrap();
    dir
}

fn pipeline(input: &Path, output: &Path) -> Pipeline {
    let store = JsonDirStore::new(output).with_validation(Arc::new(SchemaRegistry::new()));
    Pipeline::new(
        Arc::new(ExportDirSource::new(input)),
        Arc::new(store),
        config(),
    )
    .unwrap()
}

fn files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}

fn read<T: serde::de::DeserializeOwned>(path: &Path) -> T {
    serde_json::from_slice(&std::fs::read(path).unwrap()).unwrap()
}

#[tokio::test]
async fn analyzes_every_chat_and_writes_the_report() {
    let input = export_dir(false);
    let output = tempfile::tempdir().unwrap();

    let report = pipeline(input.path(), output.path())
        .run(&RunOptions::default())
        .await
        .unwrap();

    assert!(report.all_complete());
    assert_eq!(report.chats.len(), 2);
    let ventas = &report.chats[0];
    assert_eq!(ventas.chat_id, 1);
    assert_eq!(ventas.messages_processed, 4);
    assert_eq!(ventas.skipped_malformed, 1);
    assert_eq!(ventas.artifacts, ArtifactKind::ALL.to_vec());

    let mut expected: Vec<String> = ["ventas_1", "vecinos_2"]
        .iter()
        .flat_map(|base| ArtifactKind::ALL.map(|kind| kind.file_name(base)))
        .collect();
    expected.push(REPORT_FILE.to_string());
    expected.sort();
    assert_eq!(files(output.path()), expected);

    let threads: ThreadsDocument = read(&output.path().join("ventas_1_threads.json"));
    let thread = &threads.threads["thread_1"];
    let ids: Vec<i64> = thread.messages.iter().map(|m| m.id).collect();
    assert_eq!(ids, [1, 2, 3]);
    assert_eq!(threads.orphans, [4]);

    let on_disk: BatchReport = read(&output.path().join(REPORT_FILE));
    assert_eq!(on_disk, report);
}

#[tokio::test]
async fn a_failing_chat_does_not_stop_the_others() {
    let input = export_dir(true);
    let output = tempfile::tempdir().unwrap();

    let report = pipeline(input.path(), output.path())
        .run(&RunOptions::default())
        .await
        .unwrap();

    assert_eq!(report.failed(), 1);
    let lost = &report.chats[2];
    assert_eq!(lost.status, ChatStatus::Failed);
    assert!(lost.error.as_deref().unwrap().contains("No messages file"));
    assert!(lost.artifacts.is_empty());
    assert!(!files(output.path()).iter().any(|f| f.starts_with("perdido_3")));
    assert_eq!(report.chats[0].status, ChatStatus::Complete);
    assert_eq!(report.chats[1].status, ChatStatus::Complete);
}

#[tokio::test]
async fn selection_and_window_limit_the_run() {
    let input = export_dir(true);
    let output = tempfile::tempdir().unwrap();
    let options = RunOptions {
        chat_ids: vec![1],
        window: TimeWindow {
            start: None,
            end: Some("2024-05-10T23:59:59Z".parse().unwrap()),
        },
    };

    let report = pipeline(input.path(), output.path())
        .run(&options)
        .await
        .unwrap();

    assert_eq!(report.chats.len(), 1);
    assert_eq!(report.chats[0].messages_processed, 3);
    let threads: ThreadsDocument = read(&output.path().join("ventas_1_threads.json"));
    assert!(threads.orphans.is_empty());
}

#[tokio::test]
async fn cancelled_before_ingestion_persists_nothing() {
    let input = export_dir(false);
    let output = tempfile::tempdir().unwrap();
    let cancel = CancelFlag::new();
    cancel.cancel();

    let report = pipeline(input.path(), output.path())
        .with_cancel_flag(cancel)
        .run(&RunOptions::default())
        .await
        .unwrap();

    assert!(
        report
            .chats
            .iter()
            .all(|c| c.status == ChatStatus::Cancelled && c.artifacts.is_empty())
    );
    assert_eq!(files(output.path()), [REPORT_FILE]);
}

/// Cancels the run as soon as the first graph exists.
struct CancelAfterGraph(CancelFlag);

impl RunObserver for CancelAfterGraph {
    fn graph_built(&self, _chat: &Chat) {
        self.0.cancel();
    }
}

#[tokio::test]
async fn cancelled_after_the_graph_keeps_a_partial_set() {
    let input = export_dir(false);
    let output = tempfile::tempdir().unwrap();
    let cancel = CancelFlag::new();

    let mut config = config();
    config.pipeline.max_parallel_chats = 1;
    let store = JsonDirStore::new(output.path());
    let report = Pipeline::new(
        Arc::new(ExportDirSource::new(input.path())),
        Arc::new(store),
        config,
    )
    .unwrap()
    .with_cancel_flag(cancel.clone())
    .with_observer(Arc::new(CancelAfterGraph(cancel)))
    .run(&RunOptions {
        chat_ids: vec![1],
        ..RunOptions::default()
    })
    .await
    .unwrap();

    let outcome = &report.chats[0];
    assert_eq!(outcome.status, ChatStatus::Partial);
    assert!(!outcome.artifacts.contains(&ArtifactKind::Trends));
    assert_eq!(outcome.artifacts.len(), ArtifactKind::ALL.len() - 1);
    assert!(!output.path().join("ventas_1_trends.json").exists());
    assert!(output.path().join("ventas_1_graph.json").exists());
}

/// Fails the first `failures` listings with a transient error.
struct Flaky {
    inner: ExportDirSource,
    failures: u32,
    calls: AtomicU32,
}

#[async_trait]
impl MessageSource for Flaky {
    async fn list_chats(&self) -> Result<Vec<Chat>, SourceError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) < self.failures {
            return Err(SourceError::Transient("rate limited".into()));
        }
        self.inner.list_chats().await
    }

    async fn iter_messages(
        &self,
        chat: &Chat,
        window: TimeWindow,
    ) -> Result<MessageStream, SourceError> {
        self.inner.iter_messages(chat, window).await
    }
}

fn fast_retry(attempts: u32) -> RetryPolicy {
    RetryPolicy {
        initial: Duration::from_millis(1),
        max: Duration::from_millis(2),
        attempts,
    }
}

#[tokio::test]
async fn transient_listing_failures_are_retried() {
    let input = export_dir(false);
    let output = tempfile::tempdir().unwrap();
    let source = Arc::new(Flaky {
        inner: ExportDirSource::new(input.path()),
        failures: 2,
        calls: AtomicU32::new(0),
    });

    let report = Pipeline::new(
        Arc::clone(&source) as Arc<dyn MessageSource>,
        Arc::new(JsonDirStore::new(output.path())),
        config(),
    )
    .unwrap()
    .with_retry(fast_retry(3))
    .run(&RunOptions::default())
    .await
    .unwrap();

    assert!(report.all_complete());
    assert_eq!(source.calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn listing_that_keeps_failing_is_an_ingestion_error() {
    let input = export_dir(false);
    let output = tempfile::tempdir().unwrap();
    let source = Flaky {
        inner: ExportDirSource::new(input.path()),
        failures: u32::MAX,
        calls: AtomicU32::new(0),
    };

    let err = Pipeline::new(
        Arc::new(source),
        Arc::new(JsonDirStore::new(output.path())),
        config(),
    )
    .unwrap()
    .with_retry(fast_retry(2))
    .run(&RunOptions::default())
    .await
    .unwrap_err();

    assert!(matches!(err, PipelineError::Source(SourceError::Transient(_))));
    assert!(files(output.path()).is_empty());
}

#[tokio::test]
async fn chat_kinds_survive_the_listing() {
    let input = export_dir(false);
    let chats = ExportDirSource::new(input.path()).list_chats().await.unwrap();
    let kinds: Vec<ChatKind> = chats.iter().map(|c| c.kind).collect();
    assert_eq!(kinds, [ChatKind::SmallGroup, ChatKind::MegaGroup]);
}

/// Breaks chat 1's stream after `after` items on the first `breaks` opens.
struct Interrupted {
    inner: ExportDirSource,
    after: usize,
    breaks: u32,
    opens: AtomicU32,
}

#[async_trait]
impl MessageSource for Interrupted {
    async fn list_chats(&self) -> Result<Vec<Chat>, SourceError> {
        self.inner.list_chats().await
    }

    async fn iter_messages(
        &self,
        chat: &Chat,
        window: TimeWindow,
    ) -> Result<MessageStream, SourceError> {
        let messages = self.inner.iter_messages(chat, window).await?;
        if chat.id != 1 || self.opens.fetch_add(1, Ordering::SeqCst) >= self.breaks {
            return Ok(messages);
        }
        let reset = stream::once(async { Err(SourceError::Transient("connection reset".into())) });
        Ok(messages.take(self.after).chain(reset).boxed())
    }
}

#[tokio::test]
async fn interrupted_stream_resumes_where_it_stopped() {
    let input = export_dir(false);
    let output = tempfile::tempdir().unwrap();
    let source = Arc::new(Interrupted {
        inner: ExportDirSource::new(input.path()),
        after: 2,
        breaks: 1,
        opens: AtomicU32::new(0),
    });

    let report = Pipeline::new(
        Arc::clone(&source) as Arc<dyn MessageSource>,
        Arc::new(JsonDirStore::new(output.path())),
        config(),
    )
    .unwrap()
    .with_retry(fast_retry(3))
    .run(&RunOptions {
        chat_ids: vec![1],
        ..RunOptions::default()
    })
    .await
    .unwrap();

    assert_eq!(source.opens.load(Ordering::SeqCst), 2);
    let ventas = &report.chats[0];
    assert_eq!(ventas.status, ChatStatus::Complete);
    assert_eq!(ventas.messages_processed, 4);
    assert_eq!(ventas.skipped_malformed, 1);

    let threads: ThreadsDocument = read(&output.path().join("ventas_1_threads.json"));
    let ids: Vec<i64> = threads.threads["thread_1"].messages.iter().map(|m| m.id).collect();
    assert_eq!(ids, [1, 2, 3]);
}

#[tokio::test]
async fn stream_that_keeps_breaking_fails_the_chat() {
    let input = export_dir(false);
    let output = tempfile::tempdir().unwrap();
    let source = Arc::new(Interrupted {
        inner: ExportDirSource::new(input.path()),
        after: 1,
        breaks: u32::MAX,
        opens: AtomicU32::new(0),
    });

    let report = Pipeline::new(
        Arc::clone(&source) as Arc<dyn MessageSource>,
        Arc::new(JsonDirStore::new(output.path())),
        config(),
    )
    .unwrap()
    .with_retry(fast_retry(3))
    .run(&RunOptions::default())
    .await
    .unwrap();

    assert_eq!(source.opens.load(Ordering::SeqCst), 3);
    let ventas = &report.chats[0];
    assert_eq!(ventas.status, ChatStatus::Failed);
    assert!(ventas.error.as_deref().unwrap().contains("connection reset"));
    assert_eq!(report.chats[1].status, ChatStatus::Complete);
    assert!(!output.path().join("ventas_1_graph.json").exists());
}
