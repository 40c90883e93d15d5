//! Retry policy for the ingestion collaborator.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

const fn default_initial_backoff_s() -> u64 {
    1
}

const fn default_max_backoff_s() -> u64 {
    60
}

const fn default_max_attempts() -> u32 {
    5
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RetryConfig {
    /// First backoff delay, doubled after every failed attempt.
    #[serde(default = "default_initial_backoff_s")]
    pub retry_initial_backoff_s: u64,

    /// Backoff cap.
    #[serde(default = "default_max_backoff_s")]
    pub retry_max_backoff_s: u64,

    /// Total attempts including the first one.
    #[serde(default = "default_max_attempts")]
    pub retry_max_attempts: u32,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            retry_initial_backoff_s: default_initial_backoff_s(),
            retry_max_backoff_s: default_max_backoff_s(),
            retry_max_attempts: default_max_attempts(),
        }
    }
}

impl RetryConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.retry_max_attempts == 0 {
            return Err(ConfigError::invalid(
                "retry.retry_max_attempts",
                "must be at least 1",
            ));
        }
        if self.retry_initial_backoff_s > self.retry_max_backoff_s {
            return Err(ConfigError::invalid(
                "retry.retry_initial_backoff_s",
                format!(
                    "{}s exceeds retry_max_backoff_s ({}s)",
                    self.retry_initial_backoff_s, self.retry_max_backoff_s
                ),
            ));
        }
        Ok(())
    }
}
