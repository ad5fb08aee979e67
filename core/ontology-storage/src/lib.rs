//! File-backed record storage for the ontology store.
//!
//! Every instance and link is one pretty-printed JSON document on disk:
//!
//! ```text
//! <data_root>/<namespace>/<object_type>/<id>.json
//! <data_root>/<namespace>/links/<link_type>/<id>.json
//! ```
//!
//! Stores are schema-agnostic: they stamp ids and timestamps and persist
//! whatever fields they are given. Validation happens a layer up, in
//! `ontology-engine`.

mod error;
mod files;
mod instance_store;
mod link_store;
mod page;
mod path;

pub use error::{StorageError, StorageResult};
pub use instance_store::InstanceStore;
pub use link_store::LinkStore;
pub use page::Page;
pub use path::{normalize_name, normalize_namespace, PathResolver};
