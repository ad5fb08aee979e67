//! On-disk layout.

use md5::{Digest, Md5};
use std::path::{Path, PathBuf};

const DEFAULT_NAMESPACE_DIR: &str = "default";
const LINKS_DIR: &str = "links";
const RECORD_EXTENSION: &str = "json";

/// Maps type names and record ids to directories and files under
/// `<data_root>/<namespace>`.
#[derive(Debug, Clone)]
pub struct PathResolver {
    root: PathBuf,
}

impl PathResolver {
    pub fn new(data_root: impl AsRef<Path>, namespace: &str) -> Self {
        Self {
            root: data_root.as_ref().join(normalize_namespace(namespace)),
        }
    }

    /// `<data_root>/<namespace>`
    pub fn namespace_root(&self) -> &Path {
        &self.root
    }

    pub fn instance_dir(&self, object_type: &str) -> PathBuf {
        self.root.join(normalize_name(object_type))
    }

    pub fn instance_path(&self, object_type: &str, id: &str) -> PathBuf {
        record_file(self.instance_dir(object_type), id)
    }

    pub fn link_dir(&self, link_type: &str) -> PathBuf {
        self.root.join(LINKS_DIR).join(normalize_name(link_type))
    }

    pub fn link_path(&self, link_type: &str, id: &str) -> PathBuf {
        record_file(self.link_dir(link_type), id)
    }
}

fn record_file(dir: PathBuf, id: &str) -> PathBuf {
    dir.join(format!("{id}.{RECORD_EXTENSION}"))
}

/// Returns true if `id` can name a record file without leaving its directory.
pub(crate) fn is_safe_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Lower-cases the namespace and replaces everything outside `[a-z0-9_]`
/// with `_`. An empty namespace maps to `default`.
pub fn normalize_namespace(namespace: &str) -> String {
    if namespace.is_empty() {
        return DEFAULT_NAMESPACE_DIR.to_string();
    }
    sanitize_ascii(namespace)
}

/// Directory name for an object type or link type.
///
/// ASCII names are lower-cased with everything outside `[a-z0-9_]` replaced
/// by `_`. A name with any non-ASCII character becomes the lower-hex MD5
/// digest of its UTF-8 bytes.
pub fn normalize_name(name: &str) -> String {
    if name.is_ascii() {
        sanitize_ascii(name)
    } else {
        hex::encode(Md5::digest(name.as_bytes()))
    }
}

fn sanitize_ascii(s: &str) -> String {
    s.chars()
        .map(|c| {
            let c = c.to_ascii_lowercase();
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
