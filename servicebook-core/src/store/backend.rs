//! Key-value blob backends the record store persists through.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{ServiceBookError, ServiceBookResult};

/// A string blob store keyed by name.
pub trait BlobStore {
    /// Read a blob; `None` when nothing was ever saved under `key`.
    fn load(&self, key: &str) -> ServiceBookResult<Option<String>>;

    /// Replace the blob stored under `key`.
    fn save(&mut self, key: &str, value: &str) -> ServiceBookResult<()>;
}

/// Stores each key as `<key>.json` inside a data directory.
#[derive(Debug, Clone)]
pub struct FileBlobStore {
    dir: PathBuf,
}

impl FileBlobStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileBlobStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl BlobStore for FileBlobStore {
    fn load(&self, key: &str) -> ServiceBookResult<Option<String>> {
        let path = self.path_for(key);

        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path).map_err(|e| {
            ServiceBookError::Storage(format!("Could not read {}: {e}", path.display()))
        })?;
        Ok(Some(content))
    }

    fn save(&mut self, key: &str, value: &str) -> ServiceBookResult<()> {
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            ServiceBookError::Storage(format!(
                "Could not create data directory {}: {e}",
                self.dir.display()
            ))
        })?;

        let path = self.path_for(key);
        let temp = self.dir.join(format!("{key}.json.tmp"));

        std::fs::write(&temp, value)?;
        std::fs::rename(&temp, &path)?;
        Ok(())
    }
}

/// In-memory backend, used by tests and dry runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryBlobStore {
    entries: HashMap<String, String>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl BlobStore for MemoryBlobStore {
    fn load(&self, key: &str) -> ServiceBookResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> ServiceBookResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
