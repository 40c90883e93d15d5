//! Sentiment evaluator configuration.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

const fn default_pos_threshold() -> f64 {
    0.3
}

const fn default_neg_threshold() -> f64 {
    -0.3
}

const fn default_use_parser() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SentimentConfig {
    /// Scores at or above this are `positive`.
    #[serde(default = "default_pos_threshold")]
    pub sentiment_pos_threshold: f64,

    /// Scores at or below this are `negative`.
    #[serde(default = "default_neg_threshold")]
    pub sentiment_neg_threshold: f64,

    /// Path to a replacement lexicon TOML. Empty uses the built-in lexicon.
    #[serde(default)]
    pub lexicon_path: String,

    /// Use the dependency-aware evaluator. When false only the token-window
    /// fallback runs.
    #[serde(default = "default_use_parser")]
    pub use_parser: bool,
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            sentiment_pos_threshold: default_pos_threshold(),
            sentiment_neg_threshold: default_neg_threshold(),
            lexicon_path: String::new(),
            use_parser: default_use_parser(),
        }
    }
}

impl SentimentConfig {
    #[must_use]
    pub fn has_custom_lexicon(&self) -> bool {
        !self.lexicon_path.is_empty()
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.sentiment_neg_threshold > self.sentiment_pos_threshold {
            return Err(ConfigError::invalid(
                "sentiment.sentiment_neg_threshold",
                format!(
                    "{} is above the positive threshold {}",
                    self.sentiment_neg_threshold, self.sentiment_pos_threshold
                ),
            ));
        }
        Ok(())
    }
}
