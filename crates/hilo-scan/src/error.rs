#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("Invalid regex for pattern '{name}': {source}")]
    InvalidPattern {
        name: String,
        #[source]
        source: regex::Error,
    },

    #[error("Pattern '{name}' is already registered")]
    DuplicatePattern { name: String },

    #[error("Unknown pattern '{0}'")]
    UnknownPattern(String),
}
