//! Schema-aware services over the ontology store.
//!
//! [`OntologyEngine`] wires a [`SchemaLoader`](ontology_model::SchemaLoader)
//! to the file-backed stores and exposes three services:
//!
//! - [`SchemaService`]: lookups over the active schema, and reload
//! - [`InstanceService`]: validated instance CRUD, listing and search
//! - [`LinkService`]: validated link CRUD and connected-instance traversal
//!
//! Every write passes through [`DataValidator`] first.

mod engine;
mod error;
mod instance;
mod link;
mod schema;
mod validator;

pub use engine::{EngineConfig, OntologyEngine};
pub use error::{EngineError, EngineResult, ErrorKind, FieldError, FieldErrorKind};
pub use instance::InstanceService;
pub use link::{LinkService, TraversalDirection};
pub use schema::SchemaService;
pub use validator::DataValidator;

pub use ontology_storage::Page;
pub use ontology_types::{Fields, Record, RecordId};
