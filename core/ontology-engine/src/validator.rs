//! Runtime data validation against the active schema.

use crate::{EngineResult, FieldError, FieldErrorKind};
use chrono::{DateTime, NaiveDate};
use ontology_model::{Constraints, DataType, Property, SchemaLoader};
use ontology_types::{loose_eq, Fields, Numeric, SOURCE_ID, TARGET_ID};
use regex::Regex;
use serde_json::Value;
use std::cmp::Ordering;
use std::sync::Arc;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Checks instance and link payloads against their declared properties.
///
/// Full validation (`validate_*_data`) is used on create: it injects
/// declared defaults for absent fields and rejects missing required fields.
/// Patch validation (`validate_*_patch`) is used on update: only the fields
/// present are checked and nothing is injected.
///
/// The first violation is returned.
#[derive(Clone)]
pub struct DataValidator {
    loader: Arc<SchemaLoader>,
}

impl DataValidator {
    pub fn new(loader: Arc<SchemaLoader>) -> Self {
        Self { loader }
    }

    pub fn validate_instance_data(&self, object_type: &str, data: &mut Fields) -> EngineResult<()> {
        let object_type = self.loader.get_object_type(object_type)?;
        validate_full(&object_type.properties, data)?;
        Ok(())
    }

    pub fn validate_link_data(
        &self,
        link_type: &str,
        source_id: &str,
        target_id: &str,
        properties: &mut Fields,
    ) -> EngineResult<()> {
        let link_type = self.loader.get_link_type(link_type)?;
        if source_id.is_empty() {
            return Err(FieldError::missing(SOURCE_ID).into());
        }
        if target_id.is_empty() {
            return Err(FieldError::missing(TARGET_ID).into());
        }
        validate_full(&link_type.properties, properties)?;
        Ok(())
    }

    pub fn validate_instance_patch(&self, object_type: &str, patch: &Fields) -> EngineResult<()> {
        let object_type = self.loader.get_object_type(object_type)?;
        validate_patch(&object_type.properties, patch)?;
        Ok(())
    }

    pub fn validate_link_patch(&self, link_type: &str, patch: &Fields) -> EngineResult<()> {
        let link_type = self.loader.get_link_type(link_type)?;
        validate_patch(&link_type.properties, patch)?;
        Ok(())
    }

    /// Converts loosely-typed input, such as query-string text, to `data_type`.
    ///
    /// - `int`: from a float (truncated) or from decimal text
    /// - `float`: from an integer or from text
    /// - `bool`: from `true`/`false`/`1`/`0`/`t`/`f` in any common casing
    ///
    /// Other types, and values already of the right shape, pass through.
    pub fn convert_value(data_type: &DataType, value: Value) -> Result<Value, FieldErrorKind> {
        match (data_type, &value) {
            (DataType::Int, Value::Number(_)) => match Numeric::from_value(&value) {
                Some(Numeric::Float(f)) => truncate_to_int(f),
                _ => Ok(value),
            },
            (DataType::Int, Value::String(s)) => s
                .trim()
                .parse::<i64>()
                .map(Value::from)
                .map_err(|_| FieldErrorKind::InvalidFormat { expected: "integer" }),
            (DataType::Float, Value::Number(n)) => match n.as_f64() {
                Some(f) if !n.is_f64() => Ok(Value::from(f)),
                _ => Ok(value),
            },
            (DataType::Float, Value::String(s)) => s
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(serde_json::Number::from_f64)
                .map(Value::Number)
                .ok_or(FieldErrorKind::InvalidFormat { expected: "number" }),
            (DataType::Bool, Value::String(s)) => parse_bool(s)
                .map(Value::Bool)
                .ok_or(FieldErrorKind::InvalidFormat { expected: "bool" }),
            _ => Ok(value),
        }
    }
}

fn truncate_to_int(f: f64) -> Result<Value, FieldErrorKind> {
    let t = f.trunc();
    if t.is_finite() && t >= i64::MIN as f64 && t < i64::MAX as f64 {
        Ok(Value::from(t as i64))
    } else {
        Err(FieldErrorKind::TypeMismatch {
            expected: "int".into(),
        })
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}

/// Per declared property, in declaration order: inject defaults for absent
/// fields, reject absent required fields without one, check present fields.
/// Injected defaults are not checked.
fn validate_full(properties: &[Property], data: &mut Fields) -> Result<(), FieldError> {
    for prop in properties {
        match data.get(&prop.name) {
            Some(value) => check_value(prop, value)?,
            None => match &prop.default_value {
                Some(default) => {
                    data.insert(prop.name.clone(), default.clone());
                }
                None if prop.required => return Err(FieldError::missing(&prop.name)),
                None => {}
            },
        }
    }
    Ok(())
}

fn validate_patch(properties: &[Property], patch: &Fields) -> Result<(), FieldError> {
    for prop in properties {
        if let Some(value) = patch.get(&prop.name) {
            check_value(prop, value)?;
        }
    }
    Ok(())
}

fn check_value(prop: &Property, value: &Value) -> Result<(), FieldError> {
    let fail = |kind: FieldErrorKind| FieldError::new(&prop.name, kind);

    let data_type = DataType::parse(&prop.data_type)
        .ok_or_else(|| fail(FieldErrorKind::UnknownDataType(prop.data_type.clone())))?;
    check_type(&data_type, value).map_err(fail)?;
    if let Some(constraints) = &prop.constraints {
        check_constraints(&data_type, constraints, value).map_err(fail)?;
    }
    Ok(())
}

fn check_type(data_type: &DataType, value: &Value) -> Result<(), FieldErrorKind> {
    let mismatch = || FieldErrorKind::TypeMismatch {
        expected: data_type.to_string(),
    };
    let ok = match data_type {
        DataType::String => value.is_string(),
        DataType::Int => Numeric::from_value(value).is_some_and(|n| n.is_integral()),
        DataType::Float => value.is_number(),
        DataType::Bool => value.is_boolean(),
        DataType::Json => true,
        DataType::Array(_) => value.is_array(),
        DataType::Date => {
            let s = value.as_str().ok_or_else(mismatch)?;
            return NaiveDate::parse_from_str(s, DATE_FORMAT)
                .map(|_| ())
                .map_err(|_| FieldErrorKind::InvalidFormat {
                    expected: "YYYY-MM-DD",
                });
        }
        DataType::DateTime => {
            let s = value.as_str().ok_or_else(mismatch)?;
            return DateTime::parse_from_rfc3339(s)
                .map(|_| ())
                .map_err(|_| FieldErrorKind::InvalidFormat { expected: "RFC3339" });
        }
    };
    if ok { Ok(()) } else { Err(mismatch()) }
}

fn check_constraints(
    data_type: &DataType,
    constraints: &Constraints,
    value: &Value,
) -> Result<(), FieldErrorKind> {
    match data_type {
        DataType::String => {
            if let Some(s) = value.as_str() {
                check_string(constraints, s)?;
            }
        }
        DataType::Int | DataType::Float => {
            if let Some(n) = Numeric::from_value(value) {
                check_range(constraints, n)?;
            }
        }
        _ => {}
    }

    if let Some(allowed) = constraints.enum_values() {
        if !allowed.iter().any(|candidate| loose_eq(candidate, value)) {
            return Err(FieldErrorKind::NotInEnum {
                allowed: allowed.to_vec(),
            });
        }
    }
    Ok(())
}

fn check_string(constraints: &Constraints, s: &str) -> Result<(), FieldErrorKind> {
    let len = i64::try_from(s.chars().count()).unwrap_or(i64::MAX);
    let bound = |key| constraints.numeric(key).and_then(|n| n.as_i64());

    if let Some(min) = bound(Constraints::MIN_LENGTH) {
        if len < min {
            return Err(FieldErrorKind::TooShort { min });
        }
    }
    if let Some(max) = bound(Constraints::MAX_LENGTH) {
        if len > max {
            return Err(FieldErrorKind::TooLong { max });
        }
    }
    if let Some(pattern) = constraints.pattern() {
        let re = Regex::new(pattern).map_err(|e| FieldErrorKind::InvalidPattern {
            reason: e.to_string(),
        })?;
        if !re.is_match(s) {
            return Err(FieldErrorKind::PatternMismatch {
                pattern: pattern.to_string(),
            });
        }
    }
    Ok(())
}

fn check_range(constraints: &Constraints, n: Numeric) -> Result<(), FieldErrorKind> {
    if let Some(min) = constraints.numeric(Constraints::MIN) {
        if n.compare(&min) == Some(Ordering::Less) {
            return Err(FieldErrorKind::BelowMinimum { min });
        }
    }
    if let Some(max) = constraints.numeric(Constraints::MAX) {
        if n.compare(&max) == Some(Ordering::Greater) {
            return Err(FieldErrorKind::AboveMaximum { max });
        }
    }
    Ok(())
}
