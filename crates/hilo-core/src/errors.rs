//! Cross-cutting error types for Hilo.
//!
//! Domain-specific errors (e.g. `RegistryError`, `ScanError`) live in their
//! respective crates. All crate errors converge in `hilo-cli` through `anyhow`.

use thiserror::Error;

/// Errors that can be raised by any Hilo crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Entity lookup returned no result.
    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: String, id: String },

    /// A node or thread identifier did not follow the expected format.
    #[error("Malformed identifier: {0}")]
    MalformedId(String),

    /// Data failed validation (schema, format, constraints).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
