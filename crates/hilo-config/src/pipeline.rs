//! Batch pipeline sizing and output location.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

const fn default_channel_capacity() -> usize {
    64
}

const fn default_batch_size() -> usize {
    128
}

const fn default_max_parallel_chats() -> usize {
    4
}

fn default_output_dir() -> String {
    "hilo-output".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PipelineConfig {
    /// Bound of the channel between ingestion and enrichment, in batches.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,

    /// Messages per enrichment batch.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Chats analyzed concurrently.
    #[serde(default = "default_max_parallel_chats")]
    pub max_parallel_chats: usize,

    /// Directory artifacts are written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            channel_capacity: default_channel_capacity(),
            batch_size: default_batch_size(),
            max_parallel_chats: default_max_parallel_chats(),
            output_dir: default_output_dir(),
        }
    }
}

impl PipelineConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("pipeline.channel_capacity", self.channel_capacity),
            ("pipeline.batch_size", self.batch_size),
            ("pipeline.max_parallel_chats", self.max_parallel_chats),
        ] {
            if value == 0 {
                return Err(ConfigError::invalid(field, "must be at least 1"));
            }
        }
        if self.output_dir.is_empty() {
            return Err(ConfigError::NotConfigured {
                section: "pipeline.output_dir".to_string(),
            });
        }
        Ok(())
    }
}
