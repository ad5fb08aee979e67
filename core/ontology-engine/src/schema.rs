use crate::EngineResult;
use ontology_model::{LinkType, ObjectType, Property, Schema, SchemaLoader};
use std::sync::Arc;

/// Read-only view of the active schema, plus reload.
#[derive(Clone)]
pub struct SchemaService {
    loader: Arc<SchemaLoader>,
}

impl SchemaService {
    pub fn new(loader: Arc<SchemaLoader>) -> Self {
        Self { loader }
    }

    pub fn snapshot(&self) -> EngineResult<Arc<Schema>> {
        Ok(self.loader.snapshot()?)
    }

    pub fn object_types(&self) -> EngineResult<Vec<ObjectType>> {
        Ok(self.loader.list_object_types()?)
    }

    pub fn object_type(&self, name: &str) -> EngineResult<ObjectType> {
        Ok(self.loader.get_object_type(name)?)
    }

    pub fn object_type_properties(&self, name: &str) -> EngineResult<Vec<Property>> {
        Ok(self.loader.get_object_type_properties(name)?)
    }

    pub fn link_types(&self) -> EngineResult<Vec<LinkType>> {
        Ok(self.loader.list_link_types()?)
    }

    pub fn link_type(&self, name: &str) -> EngineResult<LinkType> {
        Ok(self.loader.get_link_type(name)?)
    }

    /// Link types leaving `object_type`. An undeclared type has none.
    pub fn outgoing_links(&self, object_type: &str) -> EngineResult<Vec<LinkType>> {
        Ok(self.loader.get_outgoing_links(object_type)?)
    }

    /// Link types arriving at `object_type`.
    pub fn incoming_links(&self, object_type: &str) -> EngineResult<Vec<LinkType>> {
        Ok(self.loader.get_incoming_links(object_type)?)
    }

    /// Re-reads the schema document. On failure the previous schema stays
    /// active and the error is returned.
    pub fn reload(&self) -> EngineResult<Arc<Schema>> {
        self.loader.reload()?;
        self.snapshot()
    }
}
