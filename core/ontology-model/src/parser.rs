//! Schema document decoding.

use crate::{ModelError, ModelResult, Schema};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
enum SchemaSource {
    File(PathBuf),
    Inline(String),
}

/// Decodes a YAML schema document into a [`Schema`].
///
/// Parsing is a pure transformation: a document that decodes is returned
/// as-is, however inconsistent. Run [`crate::SchemaValidator`] on the result.
#[derive(Debug, Clone)]
pub struct SchemaParser {
    source: SchemaSource,
}

impl SchemaParser {
    /// A parser that re-reads `path` on every [`parse`](Self::parse).
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            source: SchemaSource::File(path.into()),
        }
    }

    /// A parser over an in-memory document.
    pub fn from_yaml(text: impl Into<String>) -> Self {
        Self {
            source: SchemaSource::Inline(text.into()),
        }
    }

    /// The file backing this parser, if any.
    pub fn path(&self) -> Option<&Path> {
        match &self.source {
            SchemaSource::File(path) => Some(path),
            SchemaSource::Inline(_) => None,
        }
    }

    pub fn parse(&self) -> ModelResult<Schema> {
        match &self.source {
            SchemaSource::File(path) => {
                let text = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
                    path: path.clone(),
                    source,
                })?;
                Self::parse_str(&text)
            }
            SchemaSource::Inline(text) => Self::parse_str(text),
        }
    }

    /// Decodes a YAML document.
    pub fn parse_str(text: &str) -> ModelResult<Schema> {
        Ok(serde_yaml::from_str(text)?)
    }
}
