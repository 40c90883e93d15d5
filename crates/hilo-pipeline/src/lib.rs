//! # hilo-pipeline
//!
//! Runs the analysis stages over whole chats.
//!
//! - [`MessageSource`]: where chats and messages come from, with the
//!   file-backed [`ExportDirSource`]
//! - [`ArtifactStore`]: where artifacts go, with the atomic [`JsonDirStore`]
//! - [`RetryPolicy`]: exponential backoff for transient source failures
//! - [`Pipeline`]: the bounded, chat-parallel batch runner

pub mod context;
pub mod error;
pub mod retry;
pub mod runner;
pub mod source;
pub mod store;
pub mod wire;

pub use context::AnalysisContext;
pub use error::{PipelineError, SourceError, StoreError};
pub use retry::RetryPolicy;
pub use runner::{CancelFlag, IngestStats, NoopObserver, Pipeline, RunObserver, RunOptions};
pub use source::{ExportDirSource, MessageSource, MessageStream, TimeWindow};
pub use store::{ArtifactSet, ArtifactStore, JsonDirStore};
