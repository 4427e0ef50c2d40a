//! The file-list cache: load, refresh, invalidate, remove.

use chrono::Utc;
use tracing::{debug, warn};

use crate::client::FileBackend;
use crate::store::KvStore;
use crate::types::{CacheEnvelope, FileInfo};
use crate::FileStoreError;

/// Bumped whenever the envelope or `FileInfo` shape changes. The version is
/// embedded in the persisted key, so an envelope written under an old schema
/// is never deserialized against the new shape.
pub const CACHE_VERSION: &str = "1";

/// The file list rarely changes unexpectedly and every mutation rewrites the
/// cache, so a generous freshness window is safe.
const CACHE_MAX_AGE_SECS: i64 = 30 * 60;

/// Lists beyond this size are served from memory but never persisted.
pub const MAX_CACHED_FILES: usize = 1000;

pub(crate) fn cache_key() -> String {
    format!("pdfpal_file_list_v{CACHE_VERSION}")
}

/// Client-side cache of the remote file list.
///
/// The in-memory list is what callers render; the persisted envelope exists
/// only to skip the initial listing call on the next run. Invalidation is
/// lazy: stale or unreadable envelopes are discarded when `load` observes
/// them, never by a background sweep.
pub struct FileListCache<S: KvStore> {
    store: S,
    files: Vec<FileInfo>,
}

impl<S: KvStore> FileListCache<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            files: Vec::new(),
        }
    }

    /// Serve the persisted list if it matches the current schema version and
    /// is within the freshness window. Any other envelope (corrupt, wrong
    /// version, stale, oversized) is discarded and reported as a miss.
    pub fn load(&mut self) -> Option<&[FileInfo]> {
        let raw = self.store.get(&cache_key())?;

        let envelope: CacheEnvelope = match serde_json::from_str(&raw) {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!(error = %e, "discarding unreadable file-list cache");
                self.store.delete(&cache_key());
                return None;
            }
        };

        let age = Utc::now().timestamp() - envelope.timestamp;
        if envelope.version != CACHE_VERSION
            || age >= CACHE_MAX_AGE_SECS
            || envelope.files.len() > MAX_CACHED_FILES
        {
            debug!(version = %envelope.version, age, "discarding stale file-list cache");
            self.store.delete(&cache_key());
            return None;
        }

        self.files = envelope.files;
        Some(&self.files)
    }

    /// Fetch the authoritative list and rewrite the cache.
    ///
    /// On transport failure the in-memory list is left as it was, but the
    /// persisted envelope is cleared: a cache written before an error
    /// boundary is never trusted afterwards. `force` only signals that the
    /// caller refreshes without showing its loading indicator; the fetch is
    /// the same either way.
    pub async fn refresh(
        &mut self,
        backend: &dyn FileBackend,
        force: bool,
    ) -> Result<&[FileInfo], FileStoreError> {
        debug!(force, "refreshing file list");
        match backend.list().await {
            Ok(files) => {
                self.files = files;
                self.persist();
                Ok(&self.files)
            }
            Err(e) => {
                self.store.delete(&cache_key());
                Err(e)
            }
        }
    }

    /// Clear the persisted envelope unconditionally, guaranteeing the next
    /// `load` misses. Call after any mutation (upload, delete).
    pub fn invalidate(&mut self) {
        self.store.delete(&cache_key());
    }

    /// Delete one file remotely, then drop it from the in-memory list and
    /// rewrite the envelope. Nothing is removed locally until the server
    /// confirms.
    pub async fn remove(
        &mut self,
        backend: &dyn FileBackend,
        filename: &str,
    ) -> Result<(), FileStoreError> {
        backend.delete(filename).await?;
        self.files.retain(|f| f.filename != filename);
        self.persist();
        Ok(())
    }

    /// The current in-memory list, in the order the backend returned it.
    pub fn files(&self) -> &[FileInfo] {
        &self.files
    }

    fn persist(&mut self) {
        if self.files.len() > MAX_CACHED_FILES {
            debug!(
                count = self.files.len(),
                "file list exceeds cache cap, skipping persistence"
            );
            self.store.delete(&cache_key());
            return;
        }

        let envelope = CacheEnvelope {
            version: CACHE_VERSION.to_string(),
            files: self.files.clone(),
            timestamp: Utc::now().timestamp(),
        };
        match serde_json::to_string(&envelope) {
            Ok(raw) => {
                if let Err(e) = self.store.put(&cache_key(), &raw) {
                    warn!(error = %e, "failed to persist file-list cache");
                    self.store.delete(&cache_key());
                }
            }
            Err(e) => {
                warn!(error = %e, "failed to serialize file-list cache");
                self.store.delete(&cache_key());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryKvStore;
    use async_trait::async_trait;

    struct ScriptedBackend {
        files: Vec<FileInfo>,
        list_fails: bool,
        delete_fails: bool,
    }

    impl ScriptedBackend {
        fn listing(files: Vec<FileInfo>) -> Self {
            Self {
                files,
                list_fails: false,
                delete_fails: false,
            }
        }
    }

    #[async_trait]
    impl FileBackend for ScriptedBackend {
        async fn list(&self) -> Result<Vec<FileInfo>, FileStoreError> {
            if self.list_fails {
                return Err(FileStoreError::Network("connection refused".into()));
            }
            Ok(self.files.clone())
        }

        async fn delete(&self, _filename: &str) -> Result<(), FileStoreError> {
            if self.delete_fails {
                return Err(FileStoreError::Api("HTTP 500 Internal Server Error: ".into()));
            }
            Ok(())
        }

        async fn upload(&self, _path: &std::path::Path) -> Result<crate::UploadReceipt, FileStoreError> {
            unimplemented!("not exercised by cache tests")
        }
    }

    fn file(name: &str) -> FileInfo {
        FileInfo {
            filename: name.to_string(),
            size: 1024,
            created_at: 1_700_000_000,
            last_modified: 1_700_000_000,
        }
    }

    fn write_envelope(store: &mut MemoryKvStore, version: &str, files: Vec<FileInfo>, age_secs: i64) {
        let envelope = CacheEnvelope {
            version: version.to_string(),
            files,
            timestamp: Utc::now().timestamp() - age_secs,
        };
        store
            .put(&cache_key(), &serde_json::to_string(&envelope).unwrap())
            .unwrap();
    }

    #[test]
    fn load_misses_on_empty_store() {
        let mut cache = FileListCache::new(MemoryKvStore::new());
        assert!(cache.load().is_none());
    }

    #[test]
    fn load_hits_on_fresh_current_version() {
        let mut store = MemoryKvStore::new();
        write_envelope(&mut store, CACHE_VERSION, vec![file("a.pdf")], 60);
        let mut cache = FileListCache::new(store);

        let files = cache.load().expect("fresh cache should hit");
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].filename, "a.pdf");
    }

    #[test]
    fn load_misses_on_version_mismatch() {
        let mut store = MemoryKvStore::new();
        write_envelope(&mut store, "0", vec![file("a.pdf")], 60);
        let mut cache = FileListCache::new(store);

        assert!(cache.load().is_none());
        // The stale envelope is discarded, not kept around.
        assert!(cache.store.get(&cache_key()).is_none());
    }

    #[test]
    fn load_hits_just_inside_freshness_window() {
        let mut store = MemoryKvStore::new();
        write_envelope(&mut store, CACHE_VERSION, vec![file("a.pdf")], 30 * 60 - 1);
        let mut cache = FileListCache::new(store);
        assert!(cache.load().is_some());
    }

    #[test]
    fn load_misses_just_past_freshness_window() {
        let mut store = MemoryKvStore::new();
        write_envelope(&mut store, CACHE_VERSION, vec![file("a.pdf")], 30 * 60 + 1);
        let mut cache = FileListCache::new(store);
        assert!(cache.load().is_none());
        assert!(cache.store.get(&cache_key()).is_none());
    }

    #[test]
    fn load_misses_on_corrupt_envelope() {
        let mut store = MemoryKvStore::new();
        store.put(&cache_key(), "{not json").unwrap();
        let mut cache = FileListCache::new(store);
        assert!(cache.load().is_none());
        assert!(cache.store.get(&cache_key()).is_none());
    }

    #[tokio::test]
    async fn refresh_replaces_list_and_persists() {
        let backend = ScriptedBackend::listing(vec![file("a.pdf"), file("b.pdf")]);
        let mut cache = FileListCache::new(MemoryKvStore::new());

        let files = cache.refresh(&backend, false).await.unwrap();
        assert_eq!(files.len(), 2);

        let raw = cache.store.get(&cache_key()).expect("envelope persisted");
        let envelope: CacheEnvelope = serde_json::from_str(&raw).unwrap();
        assert_eq!(envelope.version, CACHE_VERSION);
        assert_eq!(envelope.files.len(), 2);
    }

    #[tokio::test]
    async fn refresh_failure_clears_envelope_and_keeps_memory() {
        let mut store = MemoryKvStore::new();
        write_envelope(&mut store, CACHE_VERSION, vec![file("old.pdf")], 60);
        let mut cache = FileListCache::new(store);
        cache.load().unwrap();

        let backend = ScriptedBackend {
            files: vec![],
            list_fails: true,
            delete_fails: false,
        };
        let err = cache.refresh(&backend, false).await;
        assert!(matches!(err, Err(FileStoreError::Network(_))));

        assert_eq!(cache.files().len(), 1, "in-memory list untouched");
        assert!(
            cache.store.get(&cache_key()).is_none(),
            "persisted cache cleared past the error boundary"
        );
    }

    #[tokio::test]
    async fn oversized_list_is_returned_but_not_persisted() {
        let files: Vec<FileInfo> = (0..=MAX_CACHED_FILES)
            .map(|i| file(&format!("doc{i}.pdf")))
            .collect();
        let backend = ScriptedBackend::listing(files);
        let mut cache = FileListCache::new(MemoryKvStore::new());

        let listed = cache.refresh(&backend, false).await.unwrap();
        assert_eq!(listed.len(), MAX_CACHED_FILES + 1);
        assert!(cache.store.get(&cache_key()).is_none());

        // A subsequent load is a miss.
        assert!(cache.load().is_none());
    }

    #[tokio::test]
    async fn remove_updates_memory_and_envelope_on_success() {
        let backend = ScriptedBackend::listing(vec![file("a.pdf"), file("b.pdf")]);
        let mut cache = FileListCache::new(MemoryKvStore::new());
        cache.refresh(&backend, false).await.unwrap();

        cache.remove(&backend, "a.pdf").await.unwrap();

        let names: Vec<&str> = cache.files().iter().map(|f| f.filename.as_str()).collect();
        assert_eq!(names, vec!["b.pdf"]);

        let raw = cache.store.get(&cache_key()).unwrap();
        let envelope: CacheEnvelope = serde_json::from_str(&raw).unwrap();
        assert_eq!(envelope.files.len(), 1);
        assert_eq!(envelope.files[0].filename, "b.pdf");
    }

    #[tokio::test]
    async fn remove_failure_leaves_everything_unchanged() {
        let backend = ScriptedBackend::listing(vec![file("a.pdf"), file("b.pdf")]);
        let mut cache = FileListCache::new(MemoryKvStore::new());
        cache.refresh(&backend, false).await.unwrap();
        let envelope_before = cache.store.get(&cache_key()).unwrap();

        let failing = ScriptedBackend {
            files: vec![],
            list_fails: false,
            delete_fails: true,
        };
        let err = cache.remove(&failing, "a.pdf").await;
        assert!(matches!(err, Err(FileStoreError::Api(_))));

        assert_eq!(cache.files().len(), 2, "no optimistic removal");
        assert_eq!(cache.store.get(&cache_key()).unwrap(), envelope_before);
    }

    #[test]
    fn invalidate_forces_next_load_to_miss() {
        let mut store = MemoryKvStore::new();
        write_envelope(&mut store, CACHE_VERSION, vec![file("a.pdf")], 60);
        let mut cache = FileListCache::new(store);

        cache.invalidate();
        assert!(cache.load().is_none());
    }

    #[test]
    fn cache_key_embeds_schema_version() {
        assert_eq!(cache_key(), format!("pdfpal_file_list_v{CACHE_VERSION}"));
    }
}
