//! Core type definitions for the ontology store.
//!
//! This crate defines the schema-agnostic types shared by every layer:
//! - Record identifiers (random UUID v4)
//! - UTC timestamps rendered as RFC3339
//! - [`Record`], the JSON object persisted for every instance and link
//! - [`Numeric`], the explicit numeric view used for coercion and comparison
//!
//! Nothing here knows about object types or link types; those live in
//! `ontology-model`.

mod ids;
mod numeric;
mod record;
mod timestamp;

pub use ids::RecordId;
pub use numeric::{loose_eq, Numeric};
pub use record::{Fields, Record, CREATED_AT, ID, SOURCE_ID, TARGET_ID, UPDATED_AT};
pub use timestamp::Timestamp;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("invalid record: {0}")]
    InvalidRecord(String),
}
