//! Local ONNX embeddings through fastembed.

use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use fastembed::{EmbeddingModel, TextEmbedding, TextInitOptions};

use crate::{Embedder, EmbeddingError};

/// Output width of `paraphrase-multilingual-MiniLM-L12-v2`.
const DIMENSION: usize = 384;

/// Multilingual MiniLM sentence embeddings (inference only).
///
/// Model files are downloaded on first use and cached under
/// `~/.hilo/cache/fastembed/` unless another directory is given.
///
/// [`TextEmbedding::embed`] needs `&mut self`, so the model sits behind a
/// `Mutex`; callers from async code should go through `spawn_blocking`.
pub struct FastEmbedder {
    model: Mutex<TextEmbedding>,
}

impl std::fmt::Debug for FastEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FastEmbedder").finish_non_exhaustive()
    }
}

impl FastEmbedder {
    /// # Errors
    ///
    /// Returns [`EmbeddingError::InitFailed`] if model download or ONNX initialization fails.
    pub fn new(cache_dir: Option<PathBuf>) -> Result<Self, EmbeddingError> {
        let cache_dir = cache_dir.unwrap_or_else(default_cache_dir);
        tracing::info!(cache_dir = %cache_dir.display(), "loading fastembed model");

        let model = TextEmbedding::try_new(
            TextInitOptions::new(EmbeddingModel::ParaphraseMLMiniLML12V2)
                .with_cache_dir(cache_dir)
                .with_show_download_progress(false),
        )
        .map_err(|e| EmbeddingError::InitFailed(e.to_string()))?;

        Ok(Self {
            model: Mutex::new(model),
        })
    }
}

fn default_cache_dir() -> PathBuf {
    dirs::home_dir().map_or_else(
        || PathBuf::from(".fastembed_cache"),
        |h| h.join(".hilo").join("cache").join("fastembed"),
    )
}

impl Embedder for FastEmbedder {
    fn name(&self) -> &str {
        "fastembed"
    }

    fn dimension(&self) -> usize {
        DIMENSION
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let mut model = self.model.lock().unwrap_or_else(PoisonError::into_inner);
        model
            .embed(texts.to_vec(), None)
            .map_err(|e| EmbeddingError::EmbedFailed(e.to_string()))
    }
}
