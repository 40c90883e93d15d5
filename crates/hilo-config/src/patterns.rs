//! Pattern scanner configuration.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

const fn default_context_window_chars() -> usize {
    40
}

const fn default_examples_per_name() -> usize {
    5
}

const fn default_case_insensitive() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PatternsConfig {
    /// Characters kept on each side of a match in context examples.
    #[serde(default = "default_context_window_chars")]
    pub pattern_context_window_chars: usize,

    /// Maximum example contexts kept per pattern.
    #[serde(default = "default_examples_per_name")]
    pub pattern_examples_per_name: usize,

    #[serde(default = "default_case_insensitive")]
    pub case_insensitive: bool,

    /// Emit every pattern (empty lists included) instead of only matching ones.
    #[serde(default)]
    pub dense: bool,

    /// Catalog pattern names to skip.
    #[serde(default)]
    pub disabled: Vec<String>,
}

impl Default for PatternsConfig {
    fn default() -> Self {
        Self {
            pattern_context_window_chars: default_context_window_chars(),
            pattern_examples_per_name: default_examples_per_name(),
            case_insensitive: default_case_insensitive(),
            dense: false,
            disabled: Vec::new(),
        }
    }
}

impl PatternsConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.pattern_context_window_chars == 0 {
            return Err(ConfigError::invalid(
                "patterns.pattern_context_window_chars",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}
