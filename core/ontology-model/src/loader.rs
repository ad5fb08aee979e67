//! Publication of the active schema.

use crate::{
    LinkType, ModelError, ModelResult, ObjectType, Property, Schema, SchemaParser, SchemaValidator,
};
use arc_swap::ArcSwapOption;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{info, warn};

/// Owns the active schema snapshot.
///
/// `load` runs parse → validate under a mutex and only publishes on full
/// success, swapping the whole snapshot atomically. Readers always observe
/// either the previous schema or the new one, never a mix; a failed reload
/// leaves the previous snapshot in place.
pub struct SchemaLoader {
    parser: SchemaParser,
    active: ArcSwapOption<Schema>,
    load_lock: Mutex<()>,
}

impl SchemaLoader {
    pub fn new(parser: SchemaParser) -> Self {
        Self {
            parser,
            active: ArcSwapOption::empty(),
            load_lock: Mutex::new(()),
        }
    }

    /// Parses, validates and publishes the schema.
    pub fn load(&self) -> ModelResult<()> {
        let _guard = self.load_lock.lock();

        let schema = self.parser.parse()?;
        SchemaValidator::new(&schema).validate()?;

        info!(
            version = %schema.version,
            namespace = %schema.namespace,
            object_types = schema.object_types.len(),
            link_types = schema.link_types.len(),
            "schema loaded"
        );
        self.active.store(Some(Arc::new(schema)));
        Ok(())
    }

    /// Re-runs [`load`](Self::load). On failure the previous schema stays active.
    pub fn reload(&self) -> ModelResult<()> {
        self.load().inspect_err(|e| {
            warn!(error = %e, "schema reload failed; keeping previous schema");
        })
    }

    /// The active schema, if one has ever loaded.
    pub fn schema(&self) -> Option<Arc<Schema>> {
        self.active.load_full()
    }

    /// The active schema, or `SchemaNotLoaded`.
    pub fn snapshot(&self) -> ModelResult<Arc<Schema>> {
        self.schema().ok_or(ModelError::SchemaNotLoaded)
    }

    pub fn is_loaded(&self) -> bool {
        self.active.load().is_some()
    }

    pub fn parser(&self) -> &SchemaParser {
        &self.parser
    }

    pub fn get_object_type(&self, name: &str) -> ModelResult<ObjectType> {
        self.snapshot()?
            .object_type(name)
            .cloned()
            .ok_or_else(|| ModelError::ObjectTypeNotFound(name.to_string()))
    }

    pub fn get_link_type(&self, name: &str) -> ModelResult<LinkType> {
        self.snapshot()?
            .link_type(name)
            .cloned()
            .ok_or_else(|| ModelError::LinkTypeNotFound(name.to_string()))
    }

    pub fn list_object_types(&self) -> ModelResult<Vec<ObjectType>> {
        Ok(self.snapshot()?.object_types.clone())
    }

    pub fn list_link_types(&self) -> ModelResult<Vec<LinkType>> {
        Ok(self.snapshot()?.link_types.clone())
    }

    /// Properties declared on an object type, in declaration order.
    pub fn get_object_type_properties(&self, name: &str) -> ModelResult<Vec<Property>> {
        Ok(self.get_object_type(name)?.properties)
    }

    /// Link types leaving `object_type`.
    pub fn get_outgoing_links(&self, object_type: &str) -> ModelResult<Vec<LinkType>> {
        let schema = self.snapshot()?;
        Ok(schema
            .outgoing_links(object_type)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Link types arriving at `object_type`.
    pub fn get_incoming_links(&self, object_type: &str) -> ModelResult<Vec<LinkType>> {
        let schema = self.snapshot()?;
        Ok(schema
            .incoming_links(object_type)
            .into_iter()
            .cloned()
            .collect())
    }
}
