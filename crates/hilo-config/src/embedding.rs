//! Embedding provider configuration.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Which provider produces message embeddings for `semantic_sim` edges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingBackend {
    /// Deterministic feature hashing, no model download.
    #[default]
    Hashing,
    /// Local ONNX inference through fastembed.
    Fastembed,
    /// No embeddings; semantic edges are skipped.
    None,
}

impl EmbeddingBackend {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hashing => "hashing",
            Self::Fastembed => "fastembed",
            Self::None => "none",
        }
    }
}

impl fmt::Display for EmbeddingBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const fn default_cache_capacity() -> usize {
    4096
}

const fn default_hashing_dimension() -> usize {
    256
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmbeddingConfig {
    #[serde(default)]
    pub backend: EmbeddingBackend,

    /// Maximum entries in the per-run LRU embedding cache.
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,

    /// Vector width of the hashing backend.
    #[serde(default = "default_hashing_dimension")]
    pub hashing_dimension: usize,

    /// Model cache directory for fastembed. Empty uses `~/.hilo/cache/fastembed/`.
    #[serde(default)]
    pub cache_dir: String,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            backend: EmbeddingBackend::default(),
            cache_capacity: default_cache_capacity(),
            hashing_dimension: default_hashing_dimension(),
            cache_dir: String::new(),
        }
    }
}

impl EmbeddingConfig {
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.backend != EmbeddingBackend::None
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.cache_capacity == 0 {
            return Err(ConfigError::invalid(
                "embedding.cache_capacity",
                "must be at least 1",
            ));
        }
        if self.hashing_dimension == 0 {
            return Err(ConfigError::invalid(
                "embedding.hashing_dimension",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}
