use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("unknown schema: {0}")]
    NotFound(String),

    /// The instance failed validation; one message per violation.
    #[error("validation against `{schema}` failed: {}", errors.join("; "))]
    ValidationFailed { schema: String, errors: Vec<String> },

    #[error("schema `{schema}` does not compile: {message}")]
    Compile { schema: String, message: String },

    #[error("cannot serialize instance: {0}")]
    Serialize(#[from] serde_json::Error),
}
