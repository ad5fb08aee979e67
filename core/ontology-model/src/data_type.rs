//! The property type grammar.

use crate::ModelError;
use std::fmt;
use std::str::FromStr;

const ARRAY_PREFIX: &str = "array<";
const ARRAY_SUFFIX: &str = ">";

/// A declared property type.
///
/// Written in schema documents as one of `string`, `int`, `float`, `bool`,
/// `date`, `datetime`, `json`, or `array<T>` where `T` is itself a data type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DataType {
    String,
    Int,
    Float,
    Bool,
    /// `YYYY-MM-DD`
    Date,
    /// RFC3339
    DateTime,
    /// Any JSON value.
    Json,
    Array(Box<DataType>),
}

impl DataType {
    /// Parses a data type name, returning `None` if it is not recognized.
    pub fn parse(name: &str) -> Option<Self> {
        if let Some(inner) = name
            .strip_prefix(ARRAY_PREFIX)
            .and_then(|rest| rest.strip_suffix(ARRAY_SUFFIX))
        {
            return Self::parse(inner).map(|t| Self::Array(Box::new(t)));
        }
        let scalar = match name {
            "string" => Self::String,
            "int" => Self::Int,
            "float" => Self::Float,
            "bool" => Self::Bool,
            "date" => Self::Date,
            "datetime" => Self::DateTime,
            "json" => Self::Json,
            _ => return None,
        };
        Some(scalar)
    }
}

impl FromStr for DataType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ModelError::UnknownDataType(s.to_string()))
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => f.write_str("string"),
            Self::Int => f.write_str("int"),
            Self::Float => f.write_str("float"),
            Self::Bool => f.write_str("bool"),
            Self::Date => f.write_str("date"),
            Self::DateTime => f.write_str("datetime"),
            Self::Json => f.write_str("json"),
            Self::Array(inner) => write!(f, "{ARRAY_PREFIX}{inner}{ARRAY_SUFFIX}"),
        }
    }
}
