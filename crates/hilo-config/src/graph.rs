//! Knowledge graph and thread reconstruction configuration.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

const fn default_temporal_window_minutes() -> u64 {
    5
}

const fn default_semantic_window_size() -> usize {
    10
}

const fn default_semantic_threshold() -> f64 {
    0.5
}

const fn default_partition_threshold() -> f64 {
    0.5
}

const fn default_min_thread_size() -> usize {
    2
}

const fn default_semantic_edges() -> bool {
    true
}

/// Betweenness centrality is skipped for graphs larger than this.
const fn default_max_nodes_for_centrality() -> usize {
    2000
}

const fn default_top_k() -> usize {
    5
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GraphConfig {
    /// Maximum gap between consecutive messages for `temporal_near` and
    /// `same_author_sequence` edges.
    #[serde(default = "default_temporal_window_minutes")]
    pub temporal_window_minutes: u64,

    /// Number of preceding messages compared for `semantic_sim` edges.
    #[serde(default = "default_semantic_window_size")]
    pub semantic_window_size: usize,

    /// Cosine similarity a pair must exceed to get a `semantic_sim` edge.
    #[serde(default = "default_semantic_threshold")]
    pub semantic_threshold: f64,

    /// Inferred edges must exceed this weight to join the thread partition.
    #[serde(default = "default_partition_threshold")]
    pub partition_threshold: f64,

    /// Components smaller than this become orphans.
    #[serde(default = "default_min_thread_size")]
    pub min_thread_size: usize,

    /// Whether to build `semantic_sim` edges at all.
    #[serde(default = "default_semantic_edges")]
    pub semantic_edges: bool,

    #[serde(default = "default_max_nodes_for_centrality")]
    pub max_nodes_for_centrality: usize,

    /// Length of the central-message and common-pattern lists.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            temporal_window_minutes: default_temporal_window_minutes(),
            semantic_window_size: default_semantic_window_size(),
            semantic_threshold: default_semantic_threshold(),
            partition_threshold: default_partition_threshold(),
            min_thread_size: default_min_thread_size(),
            semantic_edges: default_semantic_edges(),
            max_nodes_for_centrality: default_max_nodes_for_centrality(),
            top_k: default_top_k(),
        }
    }
}

impl GraphConfig {
    /// Temporal window in seconds.
    #[must_use]
    pub fn temporal_window_secs(&self) -> i64 {
        i64::try_from(self.temporal_window_minutes.saturating_mul(60)).unwrap_or(i64::MAX)
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.temporal_window_minutes == 0 {
            return Err(ConfigError::invalid(
                "graph.temporal_window_minutes",
                "must be at least 1",
            ));
        }
        if !(0.0..=1.0).contains(&self.semantic_threshold) {
            return Err(ConfigError::invalid(
                "graph.semantic_threshold",
                format!("{} is outside [0, 1]", self.semantic_threshold),
            ));
        }
        if !(0.0..=1.0).contains(&self.partition_threshold) {
            return Err(ConfigError::invalid(
                "graph.partition_threshold",
                format!("{} is outside [0, 1]", self.partition_threshold),
            ));
        }
        if self.min_thread_size == 0 {
            return Err(ConfigError::invalid(
                "graph.min_thread_size",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}
