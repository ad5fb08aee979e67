//! Error types for engine operations.

use ontology_model::ModelError;
use ontology_storage::StorageError;
use ontology_types::Numeric;
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors surfaced by the engine services.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Runtime data does not conform to its declared type.
    #[error(transparent)]
    Field(#[from] FieldError),

    /// A request argument is malformed independently of the schema.
    #[error("bad request: {0}")]
    BadRequest(String),
}

/// Coarse classification of an [`EngineError`], for transports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// An object type, link type or record does not exist.
    NotFound,
    /// The schema document failed to load.
    Validation,
    /// Runtime data failed validation against the schema.
    FieldValidation,
    BadRequest,
    SchemaNotLoaded,
    /// Filesystem or encoding failure.
    Io,
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Model(e) => match e {
                ModelError::SchemaNotLoaded => ErrorKind::SchemaNotLoaded,
                ModelError::ObjectTypeNotFound(_) | ModelError::LinkTypeNotFound(_) => {
                    ErrorKind::NotFound
                }
                ModelError::Io { .. } => ErrorKind::Io,
                ModelError::Yaml(_) | ModelError::Invalid(_) | ModelError::UnknownDataType(_) => {
                    ErrorKind::Validation
                }
            },
            Self::Storage(e) => match e {
                StorageError::NotFound { .. } => ErrorKind::NotFound,
                StorageError::Io { .. }
                | StorageError::Decode { .. }
                | StorageError::Serialization(_) => ErrorKind::Io,
            },
            Self::Field(_) => ErrorKind::FieldValidation,
            Self::BadRequest(_) => ErrorKind::BadRequest,
        }
    }

    /// The offending field, for field validation failures.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Field(e) => Some(&e.field),
            _ => None,
        }
    }
}

/// A runtime data violation, always naming the field.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("field '{field}': {kind}")]
pub struct FieldError {
    pub field: String,
    pub kind: FieldErrorKind,
}

impl FieldError {
    pub fn new(field: impl Into<String>, kind: FieldErrorKind) -> Self {
        Self {
            field: field.into(),
            kind,
        }
    }

    pub fn missing(field: impl Into<String>) -> Self {
        Self::new(field, FieldErrorKind::MissingRequired)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldErrorKind {
    MissingRequired,
    /// Wrong JSON shape for the declared type.
    TypeMismatch { expected: String },
    /// Right shape, unparsable content (dates, datetimes, numeric text).
    InvalidFormat { expected: &'static str },
    TooShort { min: i64 },
    TooLong { max: i64 },
    PatternMismatch { pattern: String },
    InvalidPattern { reason: String },
    BelowMinimum { min: Numeric },
    AboveMaximum { max: Numeric },
    NotInEnum { allowed: Vec<Value> },
    UnknownDataType(String),
}

impl fmt::Display for FieldErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingRequired => f.write_str("required field is missing"),
            Self::TypeMismatch { expected } => write!(f, "expected {expected} type"),
            Self::InvalidFormat { expected } => write!(f, "invalid format, expected {expected}"),
            Self::TooShort { min } => write!(f, "string length must be >= {min}"),
            Self::TooLong { max } => write!(f, "string length must be <= {max}"),
            Self::PatternMismatch { pattern } => {
                write!(f, "string does not match pattern '{pattern}'")
            }
            Self::InvalidPattern { reason } => write!(f, "invalid regex pattern: {reason}"),
            Self::BelowMinimum { min } => write!(f, "value must be >= {min}"),
            Self::AboveMaximum { max } => write!(f, "value must be <= {max}"),
            Self::NotInEnum { allowed } => {
                f.write_str("value must be one of: ")?;
                for (i, v) in allowed.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    match v {
                        Value::String(s) => f.write_str(s)?,
                        other => write!(f, "{other}")?,
                    }
                }
                Ok(())
            }
            Self::UnknownDataType(name) => write!(f, "unknown data type: {name}"),
        }
    }
}
