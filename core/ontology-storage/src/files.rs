//! Record file primitives shared by both stores. None of these take a lock.

use crate::{StorageError, StorageResult};
use ontology_types::Record;
use std::ffi::OsStr;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::warn;

pub(crate) fn read_record(path: &Path, kind: &'static str, id: &str) -> StorageResult<Record> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(StorageError::NotFound {
                kind,
                id: id.to_string(),
            });
        }
        Err(e) => return Err(StorageError::io(path, e)),
    };
    serde_json::from_slice(&bytes).map_err(|source| StorageError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes `record` as pretty JSON through a sibling `.<name>.tmp` file and a
/// rename, creating parent directories as needed.
pub(crate) fn write_record(path: &Path, record: &Record) -> StorageResult<()> {
    let dir = path
        .parent()
        .ok_or_else(|| StorageError::io(path, ErrorKind::InvalidInput.into()))?;
    fs::create_dir_all(dir).map_err(|e| StorageError::io(dir, e))?;

    let mut bytes = serde_json::to_vec_pretty(record)?;
    bytes.push(b'\n');

    let tmp = temp_path(path);
    fs::write(&tmp, &bytes).map_err(|e| StorageError::io(&tmp, e))?;
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(StorageError::io(path, e));
    }
    Ok(())
}

pub(crate) fn remove_record(path: &Path, kind: &'static str, id: &str) -> StorageResult<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(StorageError::NotFound {
            kind,
            id: id.to_string(),
        }),
        Err(e) => Err(StorageError::io(path, e)),
    }
}

/// Decodes every `*.json` file in `dir`, in file-name order.
///
/// A missing directory yields nothing. Files that cannot be read or decoded
/// are logged and skipped.
pub(crate) fn scan_dir(dir: &Path) -> StorageResult<Vec<Record>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(StorageError::io(dir, e)),
    };

    let mut files: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| StorageError::io(dir, e))?;
        let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
        let path = entry.path();
        if is_file && is_record_file(&path) {
            files.push(path);
        }
    }
    files.sort();

    let mut records = Vec::with_capacity(files.len());
    for path in files {
        let decoded = fs::read(&path)
            .map_err(|e| e.to_string())
            .and_then(|bytes| serde_json::from_slice::<Record>(&bytes).map_err(|e| e.to_string()));
        match decoded {
            Ok(record) => records.push(record),
            Err(error) => warn!(path = %path.display(), %error, "skipping unreadable record"),
        }
    }
    Ok(records)
}

fn is_record_file(path: &Path) -> bool {
    let hidden = path
        .file_name()
        .and_then(OsStr::to_str)
        .is_none_or(|name| name.starts_with('.'));
    !hidden && path.extension() == Some(OsStr::new("json"))
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.tmp"))
}
