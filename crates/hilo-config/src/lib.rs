//! # hilo-config
//!
//! Layered configuration loading for Hilo using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`HILO_*` prefix, `__` as separator)
//! 2. Project-level `.hilo/config.toml`
//! 3. User-level `~/.config/hilo/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `HILO_GRAPH__MIN_THREAD_SIZE` -> `graph.min_thread_size`,
//! `HILO_EMBEDDING__BACKEND` -> `embedding.backend`, etc.
//! The `__` (double underscore) separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use hilo_config::HiloConfig;
//!
//! let config = HiloConfig::load_with_dotenv().expect("config");
//! config.validate().expect("valid config");
//! println!("min thread size: {}", config.graph.min_thread_size);
//! ```

mod embedding;
mod error;
mod graph;
mod patterns;
mod pipeline;
mod retry;
mod sentiment;
mod trends;

pub use embedding::{EmbeddingBackend, EmbeddingConfig};
pub use error::ConfigError;
pub use graph::GraphConfig;
pub use patterns::PatternsConfig;
pub use pipeline::PipelineConfig;
pub use retry::RetryConfig;
pub use sentiment::SentimentConfig;
pub use trends::TrendsConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable prefix for every config key.
pub const ENV_PREFIX: &str = "HILO_";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct HiloConfig {
    #[serde(default)]
    pub graph: GraphConfig,
    #[serde(default)]
    pub sentiment: SentimentConfig,
    #[serde(default)]
    pub patterns: PatternsConfig,
    #[serde(default)]
    pub trends: TrendsConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

impl HiloConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] for `.env` support.
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment().extract().map_err(ConfigError::from)
    }

    /// Load configuration with `.env` file support.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv_from_workspace();
        Self::load()
    }

    /// Load from the standard chain plus an explicit TOML file merged just
    /// below the environment layer.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        Self::base_figment()
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(ConfigError::from)
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add providers on top.
    pub fn figment() -> Figment {
        Self::base_figment().merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    fn base_figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".hilo/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment
    }

    /// Check every section for out-of-range values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.graph.validate()?;
        self.sentiment.validate()?;
        self.patterns.validate()?;
        self.trends.validate()?;
        self.embedding.validate()?;
        self.retry.validate()?;
        self.pipeline.validate()?;
        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("hilo").join("config.toml"))
    }

    /// Load `.env` from the workspace root, falling back to the current dir.
    fn load_dotenv_from_workspace() {
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let mut dir = PathBuf::from(manifest_dir);
            // crate -> crates/ -> workspace
            for _ in 0..3 {
                let env_path = dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                    return;
                }
                if !dir.pop() {
                    break;
                }
            }
        }

        let _ = dotenvy::dotenv();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = HiloConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.embedding.backend, EmbeddingBackend::Hashing);
        assert_eq!(config.retry.retry_initial_backoff_s, 1);
        assert_eq!(config.retry.retry_max_backoff_s, 60);
        assert_eq!(config.patterns.pattern_context_window_chars, 40);
        assert_eq!(config.patterns.pattern_examples_per_name, 5);
    }

    #[test]
    fn figment_builds_without_files() {
        figment::Jail::expect_with(|_jail| {
            let config: HiloConfig = HiloConfig::figment().extract()?;
            assert_eq!(config.graph.min_thread_size, 2);
            assert_eq!(config.pipeline.max_parallel_chats, 4);
            Ok(())
        });
    }

    #[test]
    fn validate_reports_first_bad_section() {
        let mut config = HiloConfig::default();
        config.pipeline.channel_capacity = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("pipeline.channel_capacity"));
    }
}
