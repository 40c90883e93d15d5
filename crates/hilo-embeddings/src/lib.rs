//! # hilo-embeddings
//!
//! Message embeddings for the `semantic_sim` edges of the knowledge graph.
//!
//! - [`HashingEmbedder`]: deterministic feature hashing, the offline default
//! - [`FastEmbedder`]: multilingual MiniLM through fastembed (ONNX runtime)
//! - [`CachedEmbedder`]: blake3-keyed LRU cache around either provider
//!
//! Providers are synchronous. From async code wrap calls in
//! `tokio::task::spawn_blocking`.

mod cache;
pub mod error;
mod hashing;
mod onnx;

use std::path::PathBuf;
use std::sync::Arc;

use hilo_config::{EmbeddingBackend, EmbeddingConfig};

pub use cache::{CacheStats, CachedEmbedder};
pub use error::EmbeddingError;
pub use hashing::HashingEmbedder;
pub use onnx::FastEmbedder;

/// A text embedding provider. Implementations must be safe to share.
pub trait Embedder: Send + Sync + std::fmt::Debug {
    fn name(&self) -> &str;

    /// Width of every vector this provider returns.
    fn dimension(&self) -> usize;

    /// One vector per input, in input order.
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError>;
}

impl<T: Embedder + ?Sized> Embedder for Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn dimension(&self) -> usize {
        (**self).dimension()
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        (**self).embed_batch(texts)
    }
}

/// Build the configured provider behind a fresh cache, or `None` when
/// embeddings are disabled.
///
/// # Errors
///
/// Returns [`EmbeddingError::InitFailed`] when the fastembed model cannot load.
pub fn from_config(config: &EmbeddingConfig) -> Result<Option<Arc<dyn Embedder>>, EmbeddingError> {
    let embedder: Arc<dyn Embedder> = match config.backend {
        EmbeddingBackend::None => return Ok(None),
        EmbeddingBackend::Hashing => Arc::new(CachedEmbedder::new(
            HashingEmbedder::new(config.hashing_dimension),
            config.cache_capacity,
        )),
        EmbeddingBackend::Fastembed => {
            let cache_dir = (!config.cache_dir.is_empty()).then(|| PathBuf::from(&config.cache_dir));
            Arc::new(CachedEmbedder::new(
                FastEmbedder::new(cache_dir)?,
                config.cache_capacity,
            ))
        }
    };
    tracing::debug!(provider = embedder.name(), dimension = embedder.dimension(), "embedder ready");
    Ok(Some(embedder))
}

/// Cosine similarity; zero when either vector has no length.
#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}
