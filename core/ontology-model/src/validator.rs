//! Consistency checks for a parsed [`Schema`].
//!
//! Three ordered phases, each of which must pass before the next runs:
//!
//! 1. **Syntax**: names, uniqueness, data types, link cardinality/direction
//! 2. **Semantics**: `base_type`, `source_type` and `target_type` resolve
//! 3. **Constraints**: per-property constraint maps are self-consistent
//!
//! The first violation is returned; there is no multi-error aggregation.

use crate::{
    is_valid_identifier, Cardinality, Constraints, DataType, Direction, ModelError, ModelResult,
    Property, Schema,
};
use ontology_types::Numeric;
use regex::Regex;
use std::cmp::Ordering;
use std::collections::HashSet;

pub struct SchemaValidator<'a> {
    schema: &'a Schema,
}

impl<'a> SchemaValidator<'a> {
    pub fn new(schema: &'a Schema) -> Self {
        Self { schema }
    }

    pub fn validate(&self) -> ModelResult<()> {
        self.validate_syntax()?;
        self.validate_semantics()?;
        self.validate_constraints()
    }

    fn validate_syntax(&self) -> ModelResult<()> {
        if self.schema.version.is_empty() {
            return Err(ModelError::invalid("version is required"));
        }

        let mut object_type_names = HashSet::new();
        for (i, ot) in self.schema.object_types.iter().enumerate() {
            if ot.name.is_empty() {
                return Err(ModelError::invalid(format!("object_types[{i}]: name is required")));
            }
            if !is_valid_identifier(&ot.name) {
                return Err(ModelError::invalid(format!(
                    "object_types[{i}]: invalid name format '{}'",
                    ot.name
                )));
            }
            if !object_type_names.insert(ot.name.as_str()) {
                return Err(ModelError::invalid(format!(
                    "duplicate object type name: {}",
                    ot.name
                )));
            }
            check_property_syntax("object_types", "object type", &ot.name, &ot.properties)?;
        }

        let mut link_type_names = HashSet::new();
        for (i, lt) in self.schema.link_types.iter().enumerate() {
            if lt.name.is_empty() {
                return Err(ModelError::invalid(format!("link_types[{i}]: name is required")));
            }
            if !is_valid_identifier(&lt.name) {
                return Err(ModelError::invalid(format!(
                    "link_types[{i}]: invalid name format '{}'",
                    lt.name
                )));
            }
            if !link_type_names.insert(lt.name.as_str()) {
                return Err(ModelError::invalid(format!("duplicate link type name: {}", lt.name)));
            }
            check_property_syntax("link_types", "link type", &lt.name, &lt.properties)?;

            if lt.source_type.is_empty() {
                return Err(ModelError::invalid(format!(
                    "link_types[{}]: source_type is required",
                    lt.name
                )));
            }
            if lt.target_type.is_empty() {
                return Err(ModelError::invalid(format!(
                    "link_types[{}]: target_type is required",
                    lt.name
                )));
            }
            if lt.cardinality.parse::<Cardinality>().is_err() {
                return Err(ModelError::invalid(format!(
                    "link_types[{}]: invalid cardinality '{}'",
                    lt.name, lt.cardinality
                )));
            }
            if lt.direction.parse::<Direction>().is_err() {
                return Err(ModelError::invalid(format!(
                    "link_types[{}]: invalid direction '{}'",
                    lt.name, lt.direction
                )));
            }
        }

        Ok(())
    }

    fn validate_semantics(&self) -> ModelResult<()> {
        let object_types: HashSet<&str> = self
            .schema
            .object_types
            .iter()
            .map(|ot| ot.name.as_str())
            .collect();

        for ot in &self.schema.object_types {
            if let Some(base) = ot.base_type() {
                if !object_types.contains(base) {
                    return Err(ModelError::invalid(format!(
                        "object_type '{}': base_type '{base}' does not exist",
                        ot.name
                    )));
                }
            }
        }

        for lt in &self.schema.link_types {
            if !object_types.contains(lt.source_type.as_str()) {
                return Err(ModelError::invalid(format!(
                    "link_type '{}': source_type '{}' does not exist",
                    lt.name, lt.source_type
                )));
            }
            if !object_types.contains(lt.target_type.as_str()) {
                return Err(ModelError::invalid(format!(
                    "link_type '{}': target_type '{}' does not exist",
                    lt.name, lt.target_type
                )));
            }
        }

        Ok(())
    }

    fn validate_constraints(&self) -> ModelResult<()> {
        for ot in &self.schema.object_types {
            let owner = format!("object_type '{}'", ot.name);
            for prop in &ot.properties {
                check_property_constraints(&owner, prop)?;
            }
        }
        for lt in &self.schema.link_types {
            let owner = format!("link_type '{}'", lt.name);
            for prop in &lt.properties {
                check_property_constraints(&owner, prop)?;
            }
        }
        // Default values are accepted without type checking.
        Ok(())
    }
}

fn check_property_syntax(
    section: &str,
    kind: &str,
    owner: &str,
    properties: &[Property],
) -> ModelResult<()> {
    let mut names = HashSet::new();
    for (j, prop) in properties.iter().enumerate() {
        if prop.name.is_empty() {
            return Err(ModelError::invalid(format!(
                "{section}[{owner}].properties[{j}]: name is required"
            )));
        }
        if !is_valid_identifier(&prop.name) {
            return Err(ModelError::invalid(format!(
                "{section}[{owner}].properties[{j}]: invalid name format '{}'",
                prop.name
            )));
        }
        if !names.insert(prop.name.as_str()) {
            return Err(ModelError::invalid(format!(
                "duplicate property name '{}' in {kind} '{owner}'",
                prop.name
            )));
        }
        if DataType::parse(&prop.data_type).is_none() {
            return Err(ModelError::invalid(format!(
                "{section}[{owner}].properties[{}]: invalid data_type '{}'",
                prop.name, prop.data_type
            )));
        }
    }
    Ok(())
}

fn check_property_constraints(owner: &str, prop: &Property) -> ModelResult<()> {
    let Some(constraints) = &prop.constraints else {
        return Ok(());
    };
    let context = format!("{owner}.property '{}'", prop.name);

    match DataType::parse(&prop.data_type) {
        Some(DataType::String) => {
            let min = length_bound(&context, constraints, Constraints::MIN_LENGTH)?;
            let max = length_bound(&context, constraints, Constraints::MAX_LENGTH)?;
            if let (Some(min), Some(max)) = (min, max) {
                if max < min {
                    return Err(ModelError::invalid(format!(
                        "{context}: max_length must be >= min_length"
                    )));
                }
            }
            if let Some(pattern) = constraints.get(Constraints::PATTERN) {
                let Some(pattern) = pattern.as_str() else {
                    return Err(ModelError::invalid(format!("{context}: pattern must be a string")));
                };
                if let Err(e) = Regex::new(pattern) {
                    return Err(ModelError::invalid(format!(
                        "{context}: invalid regex pattern: {e}"
                    )));
                }
            }
        }
        Some(DataType::Int | DataType::Float) => {
            let min = numeric_bound(&context, constraints, Constraints::MIN)?;
            let max = numeric_bound(&context, constraints, Constraints::MAX)?;
            if let (Some(min), Some(max)) = (min, max) {
                if max.compare(&min) == Some(Ordering::Less) {
                    return Err(ModelError::invalid(format!("{context}: max must be >= min")));
                }
            }
        }
        _ => {}
    }

    if let Some(allowed) = constraints.get(Constraints::ENUM) {
        if !allowed.is_array() {
            return Err(ModelError::invalid(format!("{context}: enum must be a list of values")));
        }
    }

    Ok(())
}

fn length_bound(context: &str, constraints: &Constraints, key: &str) -> ModelResult<Option<i64>> {
    let Some(raw) = constraints.get(key) else {
        return Ok(None);
    };
    match constraints.numeric(key).and_then(|n| n.as_i64()) {
        Some(n) if n >= 0 => Ok(Some(n)),
        _ => Err(ModelError::invalid(format!(
            "{context}: {key} must be a non-negative integer, got {raw}"
        ))),
    }
}

fn numeric_bound(
    context: &str,
    constraints: &Constraints,
    key: &str,
) -> ModelResult<Option<Numeric>> {
    match constraints.get(key) {
        None => Ok(None),
        Some(raw) => constraints
            .numeric(key)
            .map(Some)
            .ok_or_else(|| ModelError::invalid(format!("{context}: {key} must be a number, got {raw}"))),
    }
}
