use crate::{DataValidator, EngineResult, FieldError};
use ontology_model::{DataType, SchemaLoader};
use ontology_storage::{InstanceStore, Page};
use ontology_types::{Fields, Record, RecordId};
use std::sync::Arc;

/// Schema-checked CRUD over object instances.
#[derive(Clone)]
pub struct InstanceService {
    loader: Arc<SchemaLoader>,
    store: Arc<InstanceStore>,
    validator: DataValidator,
}

impl InstanceService {
    pub fn new(loader: Arc<SchemaLoader>, store: Arc<InstanceStore>, validator: DataValidator) -> Self {
        Self {
            loader,
            store,
            validator,
        }
    }

    /// Validates `data` (injecting declared defaults) and stores it.
    pub fn create(&self, object_type: &str, mut data: Fields) -> EngineResult<RecordId> {
        self.validator.validate_instance_data(object_type, &mut data)?;
        Ok(self.store.create(object_type, data)?)
    }

    pub fn get(&self, object_type: &str, id: &str) -> EngineResult<Record> {
        self.loader.get_object_type(object_type)?;
        Ok(self.store.get(object_type, id)?)
    }

    /// Merges `patch` into the stored instance. Only the fields present in
    /// the patch are validated, and only once the instance is known to exist.
    pub fn update(&self, object_type: &str, id: &str, patch: Fields) -> EngineResult<Record> {
        self.loader.get_object_type(object_type)?;
        self.store.get(object_type, id)?;
        self.validator.validate_instance_patch(object_type, &patch)?;
        Ok(self.store.update(object_type, id, patch)?)
    }

    pub fn delete(&self, object_type: &str, id: &str) -> EngineResult<()> {
        self.loader.get_object_type(object_type)?;
        Ok(self.store.delete(object_type, id)?)
    }

    /// Lists instances. With filters, the matches are paginated and `total`
    /// is the number of matches.
    pub fn list(
        &self,
        object_type: &str,
        offset: usize,
        limit: usize,
        filters: &Fields,
    ) -> EngineResult<Page<Record>> {
        self.loader.get_object_type(object_type)?;
        if filters.is_empty() {
            return Ok(self.store.list(object_type, offset, limit)?);
        }
        let matches = self.store.search(object_type, filters)?;
        Ok(Page::slice(matches, offset, limit))
    }

    pub fn search(&self, object_type: &str, filters: &Fields) -> EngineResult<Vec<Record>> {
        self.loader.get_object_type(object_type)?;
        Ok(self.store.search(object_type, filters)?)
    }

    /// Converts raw filter values to the declared type of each property.
    /// Keys that are not declared properties are kept as given.
    pub fn coerce_filters(&self, object_type: &str, raw: Fields) -> EngineResult<Fields> {
        let object_type = self.loader.get_object_type(object_type)?;
        let mut filters = Fields::new();
        for (key, value) in raw {
            let data_type = object_type
                .property(&key)
                .and_then(|p| DataType::parse(&p.data_type));
            let value = match data_type {
                Some(data_type) => DataValidator::convert_value(&data_type, value)
                    .map_err(|kind| FieldError::new(&key, kind))?,
                None => value,
            };
            filters.insert(key, value);
        }
        Ok(filters)
    }
}
