//! Error types of the ingestion source, the artifact store and the runner.

use std::path::PathBuf;

use hilo_embeddings::EmbeddingError;
use hilo_graph::GraphError;
use hilo_links::RegistryError;
use hilo_scan::ScanError;
use hilo_schema::SchemaError;
use hilo_sentiment::LexiconError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("No messages file for chat {chat_id} in {}", dir.display())]
    MissingMessages { chat_id: i64, dir: PathBuf },

    /// One record could not be turned into a message. The record is skipped
    /// and counted; the stream continues.
    #[error("Malformed record {index} in chat {chat_id}: {reason}")]
    Malformed {
        chat_id: i64,
        index: usize,
        reason: String,
    },

    /// A failure worth retrying (network hiccup, rate limit, busy file).
    #[error("Transient source failure: {0}")]
    Transient(String),
}

impl SourceError {
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }

    #[must_use]
    pub const fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed { .. })
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize {artifact}: {source}")]
    Serialize {
        artifact: String,
        #[source]
        source: serde_json::Error,
    },

    /// An artifact did not match its registered schema and was not written.
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Lexicon(#[from] LexiconError),

    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    /// A worker task panicked or was aborted.
    #[error("Worker task failed: {0}")]
    Task(String),
}

impl From<tokio::task::JoinError> for PipelineError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Task(err.to_string())
    }
}
