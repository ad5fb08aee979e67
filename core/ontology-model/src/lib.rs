//! Ontology schema model.
//!
//! Defines the declaration-side types every other layer depends on:
//! - [`Schema`]: version, namespace, object types and link types
//! - [`ObjectType`] / [`LinkType`] / [`Property`]: the declared shapes
//! - [`DataType`]: the property type grammar (`string`, `int`, ..., `array<T>`)
//!
//! and the pipeline that turns a YAML document into the active schema:
//! [`SchemaParser`] (pure decode) → [`SchemaValidator`] (syntax, semantics,
//! constraints) → [`SchemaLoader`] (atomic publish, reload, lookups).

mod data_type;
mod error;
mod ident;
mod loader;
mod parser;
mod schema;
mod validator;

pub use data_type::DataType;
pub use error::{ModelError, ModelResult};
pub use ident::is_valid_identifier;
pub use loader::SchemaLoader;
pub use parser::SchemaParser;
pub use schema::{
    Cardinality, Constraints, Direction, LinkType, ObjectType, Property, Schema,
    DEFAULT_NAMESPACE,
};
pub use validator::SchemaValidator;
