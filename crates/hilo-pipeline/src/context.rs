//! Engines shared by every chat of a run.

use std::sync::Arc;

use hilo_config::HiloConfig;
use hilo_core::entities::{MessageEnrichment, MessageSentiment, NormalizedMessage, RawMessage};
use hilo_embeddings::Embedder;
use hilo_links::TextNormalizer;
use hilo_scan::PatternScanner;
use hilo_sentiment::SentimentEvaluator;
use rayon::prelude::*;

use crate::error::PipelineError;

/// Immutable after construction and shared read-only across chats.
///
/// The embedder (and its cache) belongs to this context, so two runs never
/// share cached vectors.
#[derive(Debug, Clone)]
pub struct AnalysisContext {
    pub normalizer: TextNormalizer,
    pub scanner: Arc<PatternScanner>,
    pub evaluator: Arc<SentimentEvaluator>,
    pub embedder: Option<Arc<dyn Embedder>>,
}

impl AnalysisContext {
    /// Build every engine from configuration. Registry, catalog and lexicon
    /// failures are fatal for the run.
    pub fn from_config(config: &HiloConfig) -> Result<Self, PipelineError> {
        let normalizer = TextNormalizer::builtin()?;
        let scanner = PatternScanner::from_config(&config.patterns)?;
        let evaluator = SentimentEvaluator::from_config(&config.sentiment)?;
        let embedder = match hilo_embeddings::from_config(&config.embedding) {
            Ok(embedder) => embedder,
            Err(err) => {
                tracing::warn!(error = %err, "embedder unavailable, semantic edges disabled");
                None
            }
        };
        tracing::debug!(
            extractors = normalizer.registry().len(),
            patterns = scanner.len(),
            lexicon = evaluator.lexicon().len(),
            embedder = embedder.as_ref().map(|e| e.name().to_string()),
            "analysis context ready"
        );
        Ok(Self {
            normalizer,
            scanner: Arc::new(scanner),
            evaluator: Arc::new(evaluator),
            embedder,
        })
    }

    /// Normalize a batch in parallel, keeping batch order.
    #[must_use]
    pub fn normalize_batch(&self, batch: Vec<RawMessage>) -> Vec<NormalizedMessage> {
        batch
            .into_par_iter()
            .map(|m| self.normalizer.normalize_message(m))
            .collect()
    }

    /// Pattern and sentiment records of an ordered chat.
    #[must_use]
    pub fn enrich(
        &self,
        messages: &[NormalizedMessage],
    ) -> (Vec<MessageEnrichment>, Vec<MessageSentiment>) {
        rayon::join(
            || self.scanner.scan_messages(messages),
            || self.evaluator.evaluate_messages(messages),
        )
    }
}

/// Strict ascending timestamp order, ties by id.
pub fn sort_chronologically(messages: &mut [NormalizedMessage]) {
    messages.sort_by_key(|m| (m.timestamp(), m.id()));
}
