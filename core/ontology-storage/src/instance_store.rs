use crate::files::{read_record, remove_record, scan_dir, write_record};
use crate::path::is_safe_id;
use crate::{Page, PathResolver, StorageError, StorageResult};
use ontology_types::{Fields, Record, RecordId, Timestamp, CREATED_AT, ID, UPDATED_AT};
use parking_lot::RwLock;
use serde_json::Value;
use tracing::debug;

const KIND: &str = "instance";

/// Persists object instances, one JSON file per record.
///
/// A single reader/writer lock guards the whole tree: mutations are
/// exclusive, reads are shared.
pub struct InstanceStore {
    paths: PathResolver,
    lock: RwLock<()>,
}

impl InstanceStore {
    pub fn new(paths: PathResolver) -> Self {
        Self {
            paths,
            lock: RwLock::new(()),
        }
    }

    /// Stores a new instance and returns its generated id.
    ///
    /// `id`, `created_at` and `updated_at` are always set by the store, even
    /// if `data` carries its own values for them.
    pub fn create(&self, object_type: &str, data: Fields) -> StorageResult<RecordId> {
        let _guard = self.lock.write();

        let id = RecordId::new();
        let now = Value::String(Timestamp::now().to_rfc3339());
        let mut record = Record::new(data);
        record.insert(ID, Value::String(id.to_string()));
        record.insert(CREATED_AT, now.clone());
        record.insert(UPDATED_AT, now);

        write_record(&self.paths.instance_path(object_type, &id.to_string()), &record)?;
        debug!(object_type, %id, "instance created");
        Ok(id)
    }

    pub fn get(&self, object_type: &str, id: &str) -> StorageResult<Record> {
        let _guard = self.lock.read();
        self.read_unlocked(object_type, id)
    }

    /// Merges `patch` into the stored instance and refreshes `updated_at`.
    /// `id` and `created_at` are never overwritten.
    pub fn update(&self, object_type: &str, id: &str, patch: Fields) -> StorageResult<Record> {
        let _guard = self.lock.write();

        let mut record = self.read_unlocked(object_type, id)?;
        for (key, value) in patch {
            if key != ID && key != CREATED_AT {
                record.insert(key, value);
            }
        }
        record.insert(UPDATED_AT, Value::String(Timestamp::now().to_rfc3339()));

        write_record(&self.paths.instance_path(object_type, id), &record)?;
        debug!(object_type, id, "instance updated");
        Ok(record)
    }

    pub fn delete(&self, object_type: &str, id: &str) -> StorageResult<()> {
        let _guard = self.lock.write();
        if !is_safe_id(id) {
            return Err(not_found(id));
        }
        remove_record(&self.paths.instance_path(object_type, id), KIND, id)?;
        debug!(object_type, id, "instance deleted");
        Ok(())
    }

    /// Returns records `[offset, offset + limit)` in file-name order.
    pub fn list(&self, object_type: &str, offset: usize, limit: usize) -> StorageResult<Page<Record>> {
        let _guard = self.lock.read();
        let all = scan_dir(&self.paths.instance_dir(object_type))?;
        Ok(Page::slice(all, offset, limit))
    }

    /// Returns every instance whose fields loosely equal all `filters`.
    pub fn search(&self, object_type: &str, filters: &Fields) -> StorageResult<Vec<Record>> {
        let _guard = self.lock.read();
        let mut all = scan_dir(&self.paths.instance_dir(object_type))?;
        all.retain(|record| record.matches(filters));
        Ok(all)
    }

    fn read_unlocked(&self, object_type: &str, id: &str) -> StorageResult<Record> {
        if !is_safe_id(id) {
            return Err(not_found(id));
        }
        read_record(&self.paths.instance_path(object_type, id), KIND, id)
    }
}

fn not_found(id: &str) -> StorageError {
    StorageError::NotFound {
        kind: KIND,
        id: id.to_string(),
    }
}
