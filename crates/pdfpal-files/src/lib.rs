//! File-list cache for PDF Pal.
//!
//! Keeps the remote list of uploaded documents in memory, backed by a
//! versioned persisted envelope with a freshness window and a size cap, so
//! the client avoids redundant listing calls while staying eventually
//! consistent with the server.

pub mod cache;
pub mod client;
pub mod store;
pub mod types;

pub use cache::{FileListCache, CACHE_VERSION, MAX_CACHED_FILES};
pub use client::{FileBackend, HttpFileBackend, UploadReceipt};
pub use store::{DiskKvStore, KvStore, MemoryKvStore};
pub use types::{CacheEnvelope, FileInfo};

#[derive(Debug, thiserror::Error)]
pub enum FileStoreError {
    #[error("API error: {0}")]
    Api(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Store error: {0}")]
    Store(String),
}
