//! Content-hash keyed LRU cache in front of any [`Embedder`].

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use lru::LruCache;

use crate::{Embedder, EmbeddingError};

type Key = [u8; 32];

/// Wraps a provider with a bounded LRU cache keyed by the blake3 hash of
/// each text. Safe to share across threads; scope one to a pipeline run.
#[derive(Debug)]
pub struct CachedEmbedder<E> {
    inner: E,
    cache: Mutex<LruCache<Key, Vec<f32>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

/// Hit and miss counters since construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

impl<E: Embedder> CachedEmbedder<E> {
    /// A capacity of zero is raised to one entry.
    pub fn new(inner: E, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner,
            cache: Mutex::new(LruCache::new(capacity)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn inner(&self) -> &E {
        &self.inner
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    pub fn len(&self) -> usize {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<E: Embedder> Embedder for CachedEmbedder<E> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn dimension(&self) -> usize {
        self.inner.dimension()
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let keys: Vec<Key> = texts.iter().map(|t| *blake3::hash(t.as_bytes()).as_bytes()).collect();
        let mut found: Vec<Option<Vec<f32>>> = {
            let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
            keys.iter().map(|k| cache.get(k).cloned()).collect()
        };

        // Each distinct missing text is embedded once.
        let mut missing_keys: Vec<Key> = Vec::new();
        let mut missing_texts: Vec<String> = Vec::new();
        for (i, slot) in found.iter().enumerate() {
            if slot.is_none() && !missing_keys.contains(&keys[i]) {
                missing_keys.push(keys[i]);
                missing_texts.push(texts[i].clone());
            }
        }

        let hits = found.iter().filter(|s| s.is_some()).count();
        self.hits.fetch_add(hits as u64, Ordering::Relaxed);
        self.misses
            .fetch_add(missing_texts.len() as u64, Ordering::Relaxed);

        if !missing_texts.is_empty() {
            let fresh = self.inner.embed_batch(&missing_texts)?;
            if fresh.len() != missing_texts.len() {
                return Err(EmbeddingError::CountMismatch {
                    expected: missing_texts.len(),
                    got: fresh.len(),
                });
            }
            let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
            for (key, vector) in missing_keys.iter().zip(fresh) {
                for (i, slot) in found.iter_mut().enumerate() {
                    if slot.is_none() && keys[i] == *key {
                        *slot = Some(vector.clone());
                    }
                }
                cache.put(*key, vector);
            }
        }

        Ok(found.into_iter().map(Option::unwrap_or_default).collect())
    }
}
