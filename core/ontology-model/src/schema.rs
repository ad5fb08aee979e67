use crate::{DataType, ModelError, ModelResult};
use ontology_types::Numeric;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Namespace used when a schema does not declare one.
pub const DEFAULT_NAMESPACE: &str = "default";

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

/// Accepts `version: 1.0` as well as `version: "1.0"`.
fn scalar_as_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a scalar version, got {other}"
        ))),
    }
}

/// A complete ontology declaration.
///
/// Missing fields decode to their empty values; the validator, not the
/// parser, decides whether that is acceptable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub version: String,
    #[serde(default = "default_namespace")]
    pub namespace: String,
    #[serde(default)]
    pub object_types: Vec<ObjectType>,
    #[serde(default)]
    pub link_types: Vec<LinkType>,
}

impl Default for Schema {
    fn default() -> Self {
        Self {
            version: String::new(),
            namespace: default_namespace(),
            object_types: Vec::new(),
            link_types: Vec::new(),
        }
    }
}

impl Schema {
    pub fn object_type(&self, name: &str) -> Option<&ObjectType> {
        self.object_types.iter().find(|ot| ot.name == name)
    }

    pub fn link_type(&self, name: &str) -> Option<&LinkType> {
        self.link_types.iter().find(|lt| lt.name == name)
    }

    /// Link types whose `source_type` is `object_type`.
    pub fn outgoing_links(&self, object_type: &str) -> Vec<&LinkType> {
        self.link_types
            .iter()
            .filter(|lt| lt.source_type == object_type)
            .collect()
    }

    /// Link types whose `target_type` is `object_type`.
    pub fn incoming_links(&self, object_type: &str) -> Vec<&LinkType> {
        self.link_types
            .iter()
            .filter(|lt| lt.target_type == object_type)
            .collect()
    }
}

/// A declared entity kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectType {
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Declared parent type. Recorded only; fields are not inherited.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_type: Option<String>,
    pub properties: Vec<Property>,
}

impl ObjectType {
    /// Returns the base type, treating an empty string as absent.
    pub fn base_type(&self) -> Option<&str> {
        self.base_type.as_deref().filter(|b| !b.is_empty())
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }
}

/// A typed field of an object type or link type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Property {
    pub name: String,
    pub data_type: String,
    pub required: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constraints: Option<Constraints>,
}

impl Property {
    /// Resolves the declared `data_type` string.
    pub fn resolve_type(&self) -> ModelResult<DataType> {
        self.data_type.parse()
    }
}

/// Constraint mapping attached to a property.
///
/// Recognized keys depend on the data type: `min_length`, `max_length` and
/// `pattern` for strings; `min` and `max` for numbers; `enum` for any type.
/// Unrecognized keys are carried along and ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Constraints(serde_json::Map<String, Value>);

impl Constraints {
    pub const MIN_LENGTH: &'static str = "min_length";
    pub const MAX_LENGTH: &'static str = "max_length";
    pub const PATTERN: &'static str = "pattern";
    pub const MIN: &'static str = "min";
    pub const MAX: &'static str = "max";
    pub const ENUM: &'static str = "enum";

    pub fn new(entries: serde_json::Map<String, Value>) -> Self {
        Self(entries)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Numeric view of a constraint, `None` if absent or not a number.
    pub fn numeric(&self, key: &str) -> Option<Numeric> {
        self.0.get(key).and_then(Numeric::from_value)
    }

    pub fn pattern(&self) -> Option<&str> {
        self.0.get(Self::PATTERN).and_then(Value::as_str)
    }

    /// The allowed literals of an `enum` constraint.
    pub fn enum_values(&self) -> Option<&[Value]> {
        self.0
            .get(Self::ENUM)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A declared relationship kind between two object types.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkType {
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub source_type: String,
    pub target_type: String,
    pub cardinality: String,
    pub direction: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<Property>,
}

impl LinkType {
    /// The declared cardinality, `None` if it is not one of the fixed values.
    pub fn cardinality_kind(&self) -> Option<Cardinality> {
        self.cardinality.parse().ok()
    }

    /// The declared direction, `None` if it is not `directed`/`undirected`.
    pub fn direction_kind(&self) -> Option<Direction> {
        self.direction.parse().ok()
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }
}

/// How many records may sit on each end of a link. Recorded, not enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cardinality {
    OneToOne,
    OneToMany,
    ManyToOne,
    ManyToMany,
}

impl Cardinality {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::OneToOne => "one-to-one",
            Self::OneToMany => "one-to-many",
            Self::ManyToOne => "many-to-one",
            Self::ManyToMany => "many-to-many",
        }
    }
}

impl FromStr for Cardinality {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "one-to-one" => Ok(Self::OneToOne),
            "one-to-many" => Ok(Self::OneToMany),
            "many-to-one" => Ok(Self::ManyToOne),
            "many-to-many" => Ok(Self::ManyToMany),
            other => Err(ModelError::invalid(format!("invalid cardinality '{other}'"))),
        }
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Directed,
    Undirected,
}

impl Direction {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Directed => "directed",
            Self::Undirected => "undirected",
        }
    }
}

impl FromStr for Direction {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "directed" => Ok(Self::Directed),
            "undirected" => Ok(Self::Undirected),
            other => Err(ModelError::invalid(format!("invalid direction '{other}'"))),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
