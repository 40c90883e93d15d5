//! Lexicon loading errors. Evaluation itself never fails.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum LexiconError {
    #[error("Failed to parse lexicon: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Failed to read lexicon {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Lexicon entry '{entry}' in [{section}] is {value}, expected {min} to {max}")]
    OutOfRange {
        section: &'static str,
        entry: String,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Lexicon entry '{entry}' is listed as both positive and negative")]
    Conflict { entry: String },
}
