use crate::{loose_eq, Timestamp};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A flat map of field name to JSON value, as supplied by callers and as
/// stored on disk.
pub type Fields = serde_json::Map<String, Value>;

/// Store-managed key holding the record id.
pub const ID: &str = "id";
/// Store-managed key holding the creation time.
pub const CREATED_AT: &str = "created_at";
/// Store-managed key holding the last update time.
pub const UPDATED_AT: &str = "updated_at";
/// Link key holding the source record id.
pub const SOURCE_ID: &str = "source_id";
/// Link key holding the target record id.
pub const TARGET_ID: &str = "target_id";

/// A persisted instance or link.
///
/// The store keeps records schema-agnostic: every caller field sits at the top
/// level next to `id`, `created_at` and `updated_at` (and `source_id` /
/// `target_id` for links).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Fields);

impl Record {
    /// Wraps an existing field map.
    #[must_use]
    pub fn new(fields: Fields) -> Self {
        Self(fields)
    }

    /// Builds a record from a JSON value, which must be an object.
    pub fn from_value(value: Value) -> crate::Result<Self> {
        match value {
            Value::Object(fields) => Ok(Self(fields)),
            other => Err(crate::Error::InvalidRecord(format!(
                "expected a JSON object, got {other}"
            ))),
        }
    }

    /// Returns the record id, if present.
    pub fn id(&self) -> Option<&str> {
        self.get_str(ID)
    }

    /// Returns the link source id, if present.
    pub fn source_id(&self) -> Option<&str> {
        self.get_str(SOURCE_ID)
    }

    /// Returns the link target id, if present.
    pub fn target_id(&self) -> Option<&str> {
        self.get_str(TARGET_ID)
    }

    /// Returns the parsed creation time, if present and well-formed.
    pub fn created_at(&self) -> Option<Timestamp> {
        self.get_str(CREATED_AT).and_then(|s| Timestamp::parse(s).ok())
    }

    /// Returns the parsed last-update time, if present and well-formed.
    pub fn updated_at(&self) -> Option<Timestamp> {
        self.get_str(UPDATED_AT).and_then(|s| Timestamp::parse(s).ok())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Extract a string field.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Extract a numeric field as `f64`.
    pub fn get_number(&self, key: &str) -> Option<f64> {
        self.0.get(key).and_then(Value::as_f64)
    }

    /// Extract a boolean field.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.0.get(key).and_then(Value::as_bool)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn fields(&self) -> &Fields {
        &self.0
    }

    /// Returns true when every filter is loosely equal to the record's value
    /// for that key. A missing key compares as `null`.
    pub fn matches(&self, filters: &Fields) -> bool {
        filters.iter().all(|(key, expected)| {
            let actual = self.0.get(key).unwrap_or(&Value::Null);
            loose_eq(actual, expected)
        })
    }
}

impl From<Fields> for Record {
    fn from(fields: Fields) -> Self {
        Self(fields)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Object(record.0)
    }
}
