//! The batch runner: ingest, enrich, reconstruct and persist every chat.
//!
//! Chats run in parallel up to `max_parallel_chats`. Within a chat a producer
//! task pulls messages from the source into a bounded channel in batches and
//! the consumer normalizes each batch on the blocking pool. Once the stream
//! ends the chat is ordered, enriched, reconstructed and handed to the store.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use futures::StreamExt;
use hilo_config::HiloConfig;
use hilo_core::entities::{
    BatchReport, Chat, ChatOutcome, ChatStatus, MessageEnrichment, MessageSentiment,
    NormalizedMessage, RawMessage, SentimentsDocument,
};
use hilo_core::enums::ArtifactKind;
use hilo_graph::ChatStructure;
use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;

use crate::context::{AnalysisContext, sort_chronologically};
use crate::error::{PipelineError, SourceError};
use crate::retry::RetryPolicy;
use crate::source::{MessageSource, MessageStream, TimeWindow};
use crate::store::{ArtifactSet, ArtifactStore};

/// Cooperative cancellation shared between the caller and the runner.
/// Observed at message boundaries and between stages.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Progress callbacks. Called from worker tasks, so implementations must be
/// cheap and thread-safe.
pub trait RunObserver: Send + Sync {
    fn run_started(&self, _chats: usize) {}
    fn chat_started(&self, _chat: &Chat) {}
    fn messages_ingested(&self, _chat: &Chat, _count: usize) {}
    /// The chat's graph and threads exist; from here on a cancelled chat
    /// still persists what it has.
    fn graph_built(&self, _chat: &Chat) {}
    fn chat_finished(&self, _outcome: &ChatOutcome) {}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl RunObserver for NoopObserver {}

/// Which chats and messages a run covers.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Only these chats; all when empty.
    pub chat_ids: Vec<i64>,
    pub window: TimeWindow,
}

/// Per-chat ingestion counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub messages: usize,
    pub skipped_malformed: usize,
    pub cancelled: bool,
}

pub struct Pipeline {
    shared: Shared,
}

#[derive(Clone)]
struct Shared {
    source: Arc<dyn MessageSource>,
    store: Arc<dyn ArtifactStore>,
    config: HiloConfig,
    context: AnalysisContext,
    retry: RetryPolicy,
    cancel: CancelFlag,
    observer: Arc<dyn RunObserver>,
}

/// Everything derived from one ordered chat before trends.
struct ChatAnalysis {
    messages: Vec<NormalizedMessage>,
    patterns: Vec<MessageEnrichment>,
    sentiments: Vec<MessageSentiment>,
    structure: ChatStructure,
}

enum ChatRun {
    Cancelled,
    Persisted {
        artifacts: Vec<ArtifactKind>,
        partial: bool,
    },
}

impl Pipeline {
    /// Pipeline over `source` and `store` with engines built from `config`.
    pub fn new(
        source: Arc<dyn MessageSource>,
        store: Arc<dyn ArtifactStore>,
        config: HiloConfig,
    ) -> Result<Self, PipelineError> {
        let context = AnalysisContext::from_config(&config)?;
        Ok(Self::with_context(source, store, config, context))
    }

    #[must_use]
    pub fn with_context(
        source: Arc<dyn MessageSource>,
        store: Arc<dyn ArtifactStore>,
        config: HiloConfig,
        context: AnalysisContext,
    ) -> Self {
        let retry = RetryPolicy::from_config(&config.retry);
        Self {
            shared: Shared {
                source,
                store,
                config,
                context,
                retry,
                cancel: CancelFlag::new(),
                observer: Arc::new(NoopObserver),
            },
        }
    }

    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn RunObserver>) -> Self {
        self.shared.observer = observer;
        self
    }

    #[must_use]
    pub fn with_cancel_flag(mut self, cancel: CancelFlag) -> Self {
        self.shared.cancel = cancel;
        self
    }

    #[must_use]
    pub const fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.shared.retry = retry;
        self
    }

    /// Flag that cancels this pipeline's runs.
    #[must_use]
    pub fn cancel_flag(&self) -> CancelFlag {
        self.shared.cancel.clone()
    }

    /// Analyze the selected chats and write the batch report.
    ///
    /// Per-chat failures are recorded in the report; only a failing chat
    /// listing or report write is an error.
    pub async fn run(&self, options: &RunOptions) -> Result<BatchReport, PipelineError> {
        let shared = Arc::new(self.shared.clone());
        let chats = shared
            .retry
            .run("list_chats", || shared.source.list_chats())
            .await?;
        let chats = select_chats(chats, &options.chat_ids);
        tracing::info!(chats = chats.len(), "starting analysis run");
        shared.observer.run_started(chats.len());

        let mut outcomes: Vec<ChatOutcome> = chats
            .iter()
            .map(|chat| failed_outcome(chat, "worker task did not finish"))
            .collect();

        let mut set = JoinSet::new();
        let semaphore = Arc::new(Semaphore::new(shared.config.pipeline.max_parallel_chats));
        for (idx, chat) in chats.into_iter().enumerate() {
            let shared = Arc::clone(&shared);
            let sem = Arc::clone(&semaphore);
            let window = options.window;
            set.spawn(async move {
                let Ok(_permit) = sem.acquire().await else {
                    return (idx, failed_outcome(&chat, "run aborted"));
                };
                shared.observer.chat_started(&chat);
                let outcome = shared.process_chat(&chat, window).await;
                shared.observer.chat_finished(&outcome);
                (idx, outcome)
            });
        }
        while let Some(res) = set.join_next().await {
            match res {
                Ok((idx, outcome)) => outcomes[idx] = outcome,
                Err(e) => tracing::error!(%e, "chat worker failed"),
            }
        }

        let report = BatchReport { chats: outcomes };
        shared.store.write_report(&report).await?;
        tracing::info!(
            chats = report.chats.len(),
            failed = report.failed(),
            "analysis run finished"
        );
        Ok(report)
    }
}

impl Shared {
    async fn process_chat(&self, chat: &Chat, window: TimeWindow) -> ChatOutcome {
        let mut stats = IngestStats::default();
        let result = self.analyze_chat(chat, window, &mut stats).await;
        let mut outcome = ChatOutcome {
            chat_id: chat.id,
            chat_name: chat.name.clone(),
            status: ChatStatus::Failed,
            messages_processed: stats.messages,
            skipped_malformed: stats.skipped_malformed,
            artifacts: Vec::new(),
            error: None,
        };
        match result {
            Ok(ChatRun::Cancelled) => {
                tracing::info!(chat_id = chat.id, "chat cancelled before graph construction");
                outcome.status = ChatStatus::Cancelled;
            }
            Ok(ChatRun::Persisted { artifacts, partial }) => {
                outcome.status = if partial {
                    ChatStatus::Partial
                } else {
                    ChatStatus::Complete
                };
                outcome.artifacts = artifacts;
            }
            Err(err) => {
                tracing::error!(chat_id = chat.id, error = %err, "chat failed");
                outcome.error = Some(err.to_string());
            }
        }
        outcome
    }

    async fn analyze_chat(
        &self,
        chat: &Chat,
        window: TimeWindow,
        stats: &mut IngestStats,
    ) -> Result<ChatRun, PipelineError> {
        let messages = self.ingest(chat, window, stats).await?;
        if stats.cancelled || self.cancel.is_cancelled() {
            return Ok(ChatRun::Cancelled);
        }

        let context = self.context.clone();
        let graph_config = self.config.graph.clone();
        let owned_chat = chat.clone();
        let analysis = tokio::task::spawn_blocking(move || {
            analyze_blocking(&context, &graph_config, &owned_chat, messages)
        })
        .await??;
        tracing::debug!(
            chat_id = chat.id,
            nodes = analysis.structure.graph.node_count(),
            edges = analysis.structure.graph.edge_count(),
            threads = analysis.structure.partition.len(),
            "chat structure reconstructed"
        );
        self.observer.graph_built(chat);

        let partial = self.cancel.is_cancelled();
        let trends = if partial {
            None
        } else {
            let patterns = analysis.patterns.clone();
            let trends_config = self.config.trends.clone();
            Some(
                tokio::task::spawn_blocking(move || {
                    hilo_trends::analyze_trends(&patterns, &trends_config)
                })
                .await?,
            )
        };

        let mut artifacts = ArtifactSet::new();
        artifacts.insert(ArtifactKind::Normalized, &analysis.messages)?;
        artifacts.insert(ArtifactKind::Patterns, &analysis.patterns)?;
        let summary = hilo_sentiment::summarize(&analysis.sentiments);
        artifacts.insert(
            ArtifactKind::Sentiments,
            &SentimentsDocument {
                messages: analysis.sentiments,
                summary,
            },
        )?;
        let graph = &analysis.structure.graph;
        artifacts.insert(ArtifactKind::Graph, &graph.to_document())?;
        artifacts.insert(
            ArtifactKind::Threads,
            &analysis.structure.partition.to_document(graph),
        )?;
        artifacts.insert(ArtifactKind::Analysis, &analysis.structure.analysis)?;
        if let Some(trends) = &trends {
            artifacts.insert(ArtifactKind::Trends, trends)?;
        }

        let stored = self.store.persist(chat, &artifacts).await?;
        Ok(ChatRun::Persisted {
            artifacts: stored,
            partial,
        })
    }

    /// Pull the chat's messages through the bounded channel and normalize
    /// them batch by batch. Returns them in chronological order.
    async fn ingest(
        &self,
        chat: &Chat,
        window: TimeWindow,
        stats: &mut IngestStats,
    ) -> Result<Vec<NormalizedMessage>, PipelineError> {
        let pipeline = &self.config.pipeline;
        let (tx, mut rx) = mpsc::channel::<Vec<RawMessage>>(pipeline.channel_capacity);
        let producer = tokio::spawn(produce(
            Arc::clone(&self.source),
            chat.clone(),
            window,
            self.retry,
            self.cancel.clone(),
            pipeline.batch_size,
            tx,
        ));

        let mut messages = Vec::new();
        while let Some(batch) = rx.recv().await {
            let context = self.context.clone();
            let normalized =
                tokio::task::spawn_blocking(move || context.normalize_batch(batch)).await?;
            stats.messages += normalized.len();
            self.observer.messages_ingested(chat, normalized.len());
            messages.extend(normalized);
        }

        let produced = producer.await??;
        stats.skipped_malformed = produced.skipped_malformed;
        stats.cancelled = produced.cancelled;
        if produced.skipped_malformed > 0 {
            tracing::warn!(
                chat_id = chat.id,
                skipped = produced.skipped_malformed,
                "skipped malformed records"
            );
        }

        sort_chronologically(&mut messages);
        Ok(messages)
    }
}

/// Producer side of a chat's ingestion channel.
///
/// A transient error inside the stream reopens it after the policy's backoff
/// and skips the items already handled; the attempt count restarts after
/// every item that goes through.
async fn produce(
    source: Arc<dyn MessageSource>,
    chat: Chat,
    window: TimeWindow,
    retry: RetryPolicy,
    cancel: CancelFlag,
    batch_size: usize,
    tx: mpsc::Sender<Vec<RawMessage>>,
) -> Result<IngestStats, SourceError> {
    let mut stream = open_stream(source.as_ref(), &chat, window, retry).await?;

    let mut stats = IngestStats::default();
    let mut batch = Vec::with_capacity(batch_size);
    // Items handled across reopenings, and the position in the current stream.
    let mut handled = 0usize;
    let mut position = 0usize;
    let mut failures = 0u32;
    while let Some(item) = stream.next().await {
        if cancel.is_cancelled() {
            stats.cancelled = true;
            return Ok(stats);
        }
        position += 1;
        if position <= handled {
            continue;
        }
        match item {
            Ok(message) => {
                batch.push(message);
                if batch.len() >= batch_size {
                    let full = std::mem::replace(&mut batch, Vec::with_capacity(batch_size));
                    if tx.send(full).await.is_err() {
                        return Ok(stats);
                    }
                }
            }
            Err(err) if err.is_malformed() => {
                tracing::debug!(chat_id = chat.id, error = %err, "malformed record");
                stats.skipped_malformed += 1;
            }
            Err(err) if err.is_transient() && failures + 1 < retry.attempts => {
                failures += 1;
                let delay = retry.backoff(failures);
                tracing::warn!(
                    chat_id = chat.id,
                    after = handled,
                    attempt = failures,
                    delay_s = delay.as_secs_f64(),
                    error = %err,
                    "message stream interrupted, reopening"
                );
                tokio::time::sleep(delay).await;
                stream = open_stream(source.as_ref(), &chat, window, retry).await?;
                position = 0;
                continue;
            }
            Err(err) => return Err(err),
        }
        handled += 1;
        failures = 0;
    }
    if !batch.is_empty() {
        // A closed receiver means the consumer already failed.
        let _ = tx.send(batch).await;
    }
    Ok(stats)
}

async fn open_stream(
    source: &dyn MessageSource,
    chat: &Chat,
    window: TimeWindow,
    retry: RetryPolicy,
) -> Result<MessageStream, SourceError> {
    retry
        .run("iter_messages", || source.iter_messages(chat, window))
        .await
}

fn analyze_blocking(
    context: &AnalysisContext,
    config: &hilo_config::GraphConfig,
    chat: &Chat,
    messages: Vec<NormalizedMessage>,
) -> Result<ChatAnalysis, PipelineError> {
    let (patterns, sentiments) = context.enrich(&messages);
    let structure = hilo_graph::reconstruct(chat, &messages, config, context.embedder.as_deref())?;
    Ok(ChatAnalysis {
        messages,
        patterns,
        sentiments,
        structure,
    })
}

fn select_chats(chats: Vec<Chat>, ids: &[i64]) -> Vec<Chat> {
    if ids.is_empty() {
        return chats;
    }
    for id in ids {
        if !chats.iter().any(|c| c.id == *id) {
            tracing::warn!(chat_id = id, "requested chat not found in source");
        }
    }
    chats.into_iter().filter(|c| ids.contains(&c.id)).collect()
}

fn failed_outcome(chat: &Chat, error: &str) -> ChatOutcome {
    ChatOutcome {
        chat_id: chat.id,
        chat_name: chat.name.clone(),
        status: ChatStatus::Failed,
        messages_processed: 0,
        skipped_malformed: 0,
        artifacts: Vec::new(),
        error: Some(error.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use hilo_core::enums::ChatKind;
    use pretty_assertions::assert_eq;

    use super::*;

    fn chat(id: i64) -> Chat {
        Chat {
            id,
            name: format!("chat {id}"),
            kind: ChatKind::Unknown,
            unread_count: 0,
            folder_tags: Vec::new(),
        }
    }

    #[test]
    fn empty_selection_keeps_every_chat() {
        let ids: Vec<i64> = select_chats(vec![chat(1), chat(2)], &[])
            .iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, [1, 2]);
    }

    #[test]
    fn selection_keeps_source_order() {
        let ids: Vec<i64> = select_chats(vec![chat(1), chat(2), chat(3)], &[3, 1, 99])
            .iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, [1, 3]);
    }

    #[test]
    fn cancel_flag_is_shared_between_clones() {
        let flag = CancelFlag::new();
        let other = flag.clone();
        assert!(!other.is_cancelled());
        flag.cancel();
        assert!(other.is_cancelled());
    }
}
