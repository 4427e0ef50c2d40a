//! Key-value persistence seam for the cache envelope.
//!
//! The cache is the sole owner of its persisted slot and only touches it
//! through this trait, so the backing store can be a directory of JSON files
//! (production), a browser-style store, or an in-memory map (tests).

use std::collections::HashMap;
use std::path::PathBuf;

use tracing::debug;

use crate::FileStoreError;

pub trait KvStore: Send {
    fn get(&self, key: &str) -> Option<String>;
    fn put(&mut self, key: &str, value: &str) -> Result<(), FileStoreError>;
    /// Best-effort: deleting an absent key is not an error.
    fn delete(&mut self, key: &str);
}

/// One JSON file per key under the platform data directory.
pub struct DiskKvStore {
    dir: PathBuf,
}

impl DiskKvStore {
    /// Store under `<data_dir>/pdfpal`, e.g. `~/.local/share/pdfpal` on Linux.
    pub fn open_default() -> Result<Self, FileStoreError> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| FileStoreError::Store("could not determine data directory".into()))?;
        Ok(Self::open_at(data_dir.join("pdfpal")))
    }

    pub fn open_at(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KvStore for DiskKvStore {
    fn get(&self, key: &str) -> Option<String> {
        std::fs::read_to_string(self.path_for(key)).ok()
    }

    fn put(&mut self, key: &str, value: &str) -> Result<(), FileStoreError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            FileStoreError::Store(format!(
                "failed to create store directory {}: {e}",
                self.dir.display()
            ))
        })?;
        std::fs::write(self.path_for(key), value)
            .map_err(|e| FileStoreError::Store(format!("failed to write {key}: {e}")))
    }

    fn delete(&mut self, key: &str) {
        if let Err(e) = std::fs::remove_file(self.path_for(key)) {
            if e.kind() != std::io::ErrorKind::NotFound {
                debug!(key, error = %e, "failed to delete store entry");
            }
        }
    }
}

/// In-memory store for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryKvStore {
    entries: HashMap<String, String>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryKvStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn put(&mut self, key: &str, value: &str) -> Result<(), FileStoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn disk_store_in_tmp(name: &str) -> DiskKvStore {
        let dir = std::env::temp_dir().join("pdfpal_store_test").join(name);
        let _ = std::fs::remove_dir_all(&dir);
        DiskKvStore::open_at(dir)
    }

    #[test]
    fn disk_store_round_trip() {
        let mut store = disk_store_in_tmp("round_trip");
        assert_eq!(store.get("k"), None);
        store.put("k", "value").unwrap();
        assert_eq!(store.get("k").as_deref(), Some("value"));
        store.delete("k");
        assert_eq!(store.get("k"), None);
    }

    #[test]
    fn disk_store_delete_missing_key_is_quiet() {
        let mut store = disk_store_in_tmp("delete_missing");
        store.delete("never_written");
    }

    #[test]
    fn disk_store_overwrites() {
        let mut store = disk_store_in_tmp("overwrite");
        store.put("k", "one").unwrap();
        store.put("k", "two").unwrap();
        assert_eq!(store.get("k").as_deref(), Some("two"));
    }

    #[test]
    fn memory_store_round_trip() {
        let mut store = MemoryKvStore::new();
        store.put("k", "v").unwrap();
        assert_eq!(store.get("k").as_deref(), Some("v"));
        store.delete("k");
        assert_eq!(store.get("k"), None);
    }
}
