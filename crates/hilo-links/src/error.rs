//! Registry construction errors. Classification itself never fails.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Failed to parse extractor record '{site}': {source}")]
    Toml {
        site: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid regex in extractor '{site}' ({pattern}): {source}")]
    InvalidRegex {
        site: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Registry order names unknown extractor '{0}'")]
    UnknownSite(String),

    #[error("Extractor '{site}' registered twice")]
    DuplicateSite { site: String },

    #[error("Extractor '{site}' has no content entry for '{content_type}'")]
    MissingContent { site: String, content_type: String },

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
