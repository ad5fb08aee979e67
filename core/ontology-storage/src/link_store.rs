use crate::files::{read_record, remove_record, scan_dir, write_record};
use crate::path::is_safe_id;
use crate::{Page, PathResolver, StorageError, StorageResult};
use ontology_types::{
    Fields, Record, RecordId, Timestamp, CREATED_AT, ID, SOURCE_ID, TARGET_ID, UPDATED_AT,
};
use parking_lot::RwLock;
use serde_json::Value;
use tracing::debug;

const KIND: &str = "link";

/// Keys a link update may not change.
const IMMUTABLE_KEYS: [&str; 4] = [ID, SOURCE_ID, TARGET_ID, CREATED_AT];

/// Persists links between instances under `links/<link_type>/`.
pub struct LinkStore {
    paths: PathResolver,
    lock: RwLock<()>,
}

impl LinkStore {
    pub fn new(paths: PathResolver) -> Self {
        Self {
            paths,
            lock: RwLock::new(()),
        }
    }

    /// Stores a new link and returns its generated id. Store-managed keys
    /// win over same-named entries in `properties`.
    pub fn create(
        &self,
        link_type: &str,
        source_id: &str,
        target_id: &str,
        properties: Fields,
    ) -> StorageResult<RecordId> {
        let _guard = self.lock.write();

        let id = RecordId::new();
        let now = Value::String(Timestamp::now().to_rfc3339());
        let mut record = Record::new(properties);
        record.insert(ID, Value::String(id.to_string()));
        record.insert(SOURCE_ID, Value::String(source_id.to_string()));
        record.insert(TARGET_ID, Value::String(target_id.to_string()));
        record.insert(CREATED_AT, now.clone());
        record.insert(UPDATED_AT, now);

        write_record(&self.paths.link_path(link_type, &id.to_string()), &record)?;
        debug!(link_type, %id, source_id, target_id, "link created");
        Ok(id)
    }

    pub fn get(&self, link_type: &str, id: &str) -> StorageResult<Record> {
        let _guard = self.lock.read();
        self.read_unlocked(link_type, id)
    }

    /// Merges `properties` into the stored link and refreshes `updated_at`.
    /// Endpoints, `id` and `created_at` are left untouched.
    pub fn update(&self, link_type: &str, id: &str, properties: Fields) -> StorageResult<Record> {
        let _guard = self.lock.write();

        let mut record = self.read_unlocked(link_type, id)?;
        for (key, value) in properties {
            if !IMMUTABLE_KEYS.contains(&key.as_str()) {
                record.insert(key, value);
            }
        }
        record.insert(UPDATED_AT, Value::String(Timestamp::now().to_rfc3339()));

        write_record(&self.paths.link_path(link_type, id), &record)?;
        debug!(link_type, id, "link updated");
        Ok(record)
    }

    pub fn delete(&self, link_type: &str, id: &str) -> StorageResult<()> {
        let _guard = self.lock.write();
        if !is_safe_id(id) {
            return Err(not_found(id));
        }
        remove_record(&self.paths.link_path(link_type, id), KIND, id)?;
        debug!(link_type, id, "link deleted");
        Ok(())
    }

    pub fn list(&self, link_type: &str, offset: usize, limit: usize) -> StorageResult<Page<Record>> {
        let _guard = self.lock.read();
        let all = scan_dir(&self.paths.link_dir(link_type))?;
        Ok(Page::slice(all, offset, limit))
    }

    /// Links of `link_type` whose `source_id` is `source_id`.
    pub fn get_by_source(&self, link_type: &str, source_id: &str) -> StorageResult<Vec<Record>> {
        self.find_by_field(link_type, SOURCE_ID, source_id)
    }

    /// Links of `link_type` whose `target_id` is `target_id`.
    pub fn get_by_target(&self, link_type: &str, target_id: &str) -> StorageResult<Vec<Record>> {
        self.find_by_field(link_type, TARGET_ID, target_id)
    }

    fn find_by_field(&self, link_type: &str, field: &str, value: &str) -> StorageResult<Vec<Record>> {
        let _guard = self.lock.read();
        let mut all = scan_dir(&self.paths.link_dir(link_type))?;
        all.retain(|record| record.get_str(field) == Some(value));
        Ok(all)
    }

    fn read_unlocked(&self, link_type: &str, id: &str) -> StorageResult<Record> {
        if !is_safe_id(id) {
            return Err(not_found(id));
        }
        read_record(&self.paths.link_path(link_type, id), KIND, id)
    }
}

fn not_found(id: &str) -> StorageError {
    StorageError::NotFound {
        kind: KIND,
        id: id.to_string(),
    }
}
