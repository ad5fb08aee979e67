//! Error types for schema parsing, validation and lookup.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for schema model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised while loading or querying the schema.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The schema document could not be read.
    #[error("failed to read schema document {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The schema document is not well-formed YAML for the model.
    #[error("failed to parse schema YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The parsed schema violates a syntax, semantic or constraint rule.
    #[error("schema validation failed: {0}")]
    Invalid(String),

    /// No schema has been successfully loaded yet.
    #[error("schema not loaded")]
    SchemaNotLoaded,

    #[error("object type '{0}' not found")]
    ObjectTypeNotFound(String),

    #[error("link type '{0}' not found")]
    LinkTypeNotFound(String),

    #[error("unknown data type: {0}")]
    UnknownDataType(String),
}

impl ModelError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::Invalid(reason.into())
    }
}
