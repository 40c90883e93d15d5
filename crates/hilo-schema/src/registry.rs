//! Schema registry for the Hilo artifacts and the records inside them.
//!
//! Schemas are built once with [`schemars::schema_for!`] from the
//! `hilo-core` types; validation compiles them with `jsonschema`.

use std::collections::HashMap;

use hilo_core::entities::{
    BatchReport, Chat, ConversationAnalysis, FileTypeDescriptor, GraphDocument, LinkDescriptor,
    MessageEnrichment, MessageSentiment, NormalizedMessage, PatternContext, RawMessage,
    SentimentResult, SentimentsDocument, ThreadsDocument, TrendReport,
};
use hilo_core::enums::ArtifactKind;
use schemars::schema_for;
use serde::Serialize;

use crate::error::SchemaError;

/// Name of the batch report schema.
pub const REPORT: &str = "report";

pub struct SchemaRegistry {
    schemas: HashMap<&'static str, serde_json::Value>,
}

macro_rules! register {
    ($map:expr, $name:expr, $ty:ty) => {
        $map.insert($name, serde_json::Value::from(schema_for!($ty)));
    };
}

impl SchemaRegistry {
    /// Registry with one schema per [`ArtifactKind`], the batch report, and
    /// the record types those documents are made of.
    #[must_use]
    pub fn new() -> Self {
        let mut schemas = HashMap::new();

        // Per-chat artifacts, named after ArtifactKind::as_str.
        register!(schemas, "normalized", Vec<NormalizedMessage>);
        register!(schemas, "patterns", Vec<MessageEnrichment>);
        register!(schemas, "sentiments", SentimentsDocument);
        register!(schemas, "graph", GraphDocument);
        register!(schemas, "threads", ThreadsDocument);
        register!(schemas, "analysis", ConversationAnalysis);
        register!(schemas, "trends", TrendReport);
        register!(schemas, REPORT, BatchReport);

        // Records
        register!(schemas, "chat", Chat);
        register!(schemas, "raw_message", RawMessage);
        register!(schemas, "link_descriptor", LinkDescriptor);
        register!(schemas, "file_type_descriptor", FileTypeDescriptor);
        register!(schemas, "message_enrichment", MessageEnrichment);
        register!(schemas, "pattern_context", PatternContext);
        register!(schemas, "sentiment_result", SentimentResult);
        register!(schemas, "message_sentiment", MessageSentiment);

        Self { schemas }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&serde_json::Value> {
        self.schemas.get(name)
    }

    /// Schema of a per-chat artifact. Every kind is registered.
    #[must_use]
    pub fn artifact(&self, kind: ArtifactKind) -> Option<&serde_json::Value> {
        self.get(kind.as_str())
    }

    /// Validate `instance` against the schema called `name`.
    ///
    /// # Errors
    ///
    /// [`SchemaError::NotFound`] for an unknown name,
    /// [`SchemaError::ValidationFailed`] with every violation otherwise.
    pub fn validate(&self, name: &str, instance: &serde_json::Value) -> Result<(), SchemaError> {
        let schema = self
            .get(name)
            .ok_or_else(|| SchemaError::NotFound(name.to_string()))?;

        let validator = jsonschema::validator_for(schema).map_err(|e| SchemaError::Compile {
            schema: name.to_string(),
            message: e.to_string(),
        })?;

        let errors: Vec<String> = validator
            .iter_errors(instance)
            .map(|e| format!("{}: {e}", e.instance_path))
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SchemaError::ValidationFailed {
                schema: name.to_string(),
                errors,
            })
        }
    }

    /// Serialize `value` and validate it against the schema called `name`.
    ///
    /// # Errors
    ///
    /// As [`SchemaRegistry::validate`], plus [`SchemaError::Serialize`].
    pub fn validate_value<T: Serialize + ?Sized>(
        &self,
        name: &str,
        value: &T,
    ) -> Result<(), SchemaError> {
        self.validate(name, &serde_json::to_value(value)?)
    }

    /// Validate a per-chat artifact document.
    ///
    /// # Errors
    ///
    /// As [`SchemaRegistry::validate`].
    pub fn validate_artifact(
        &self,
        kind: ArtifactKind,
        instance: &serde_json::Value,
    ) -> Result<(), SchemaError> {
        self.validate(kind.as_str(), instance)
    }

    /// Registered names, sorted.
    #[must_use]
    pub fn list(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.schemas.keys().copied().collect();
        names.sort_unstable();
        names
    }

    #[must_use]
    pub fn schema_count(&self) -> usize {
        self.schemas.len()
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SchemaRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaRegistry")
            .field("schemas", &self.list())
            .finish()
    }
}
