//! Wire and persistence types for the file list.

use serde::{Deserialize, Serialize};

/// Metadata for one uploaded document. `filename` is the primary key; the
/// server enforces uniqueness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    pub filename: String,
    /// Byte count.
    pub size: u64,
    /// Unix timestamp, seconds.
    pub created_at: i64,
    /// Unix timestamp, seconds.
    pub last_modified: i64,
}

/// Versioned wrapper around the persisted file list. The whole envelope is
/// discarded on a version mismatch, when it ages past the freshness window,
/// or when the list exceeds the cache cap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEnvelope {
    pub version: String,
    pub files: Vec<FileInfo>,
    /// Unix timestamp of the cache write, seconds.
    pub timestamp: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_info_round_trips() {
        let info = FileInfo {
            filename: "report.pdf".into(),
            size: 123_456,
            created_at: 1_700_000_000,
            last_modified: 1_700_000_100,
        };
        let json = serde_json::to_string(&info).unwrap();
        let back: FileInfo = serde_json::from_str(&json).unwrap();
        assert_eq!(info, back);
    }

    #[test]
    fn envelope_rejects_missing_fields() {
        let raw = r#"{"files": []}"#;
        assert!(serde_json::from_str::<CacheEnvelope>(raw).is_err());
    }
}
