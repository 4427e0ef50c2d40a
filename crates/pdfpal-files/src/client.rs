//! File backend client: list, delete, upload.

use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::types::FileInfo;
use crate::FileStoreError;

pub(crate) const FILES_PATH: &str = "/api/files";
pub(crate) const UPLOAD_PATH: &str = "/api/upload";

/// What the server reports after processing an upload.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadReceipt {
    pub filename: String,
    /// Auto-generated document summary, when the server produced one.
    #[serde(default)]
    pub summary: Option<String>,
}

/// Transport seam for the file endpoints; tests substitute a scripted
/// implementation.
#[async_trait]
pub trait FileBackend: Send + Sync {
    /// Fetch the authoritative file list.
    async fn list(&self) -> Result<Vec<FileInfo>, FileStoreError>;
    /// Delete one stored document. A missing filename is a server error,
    /// never silently ignored.
    async fn delete(&self, filename: &str) -> Result<(), FileStoreError>;
    /// Upload one PDF for processing.
    async fn upload(&self, path: &Path) -> Result<UploadReceipt, FileStoreError>;
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    files: Vec<FileInfo>,
}

/// Production backend speaking to the PDF Pal HTTP API.
pub struct HttpFileBackend {
    base_url: String,
    http: reqwest::Client,
}

impl HttpFileBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::builder()
                .connect_timeout(std::time::Duration::from_secs(10))
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .expect("failed to build HTTP client"),
        }
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, FileStoreError> {
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let text = text.chars().take(200).collect::<String>();
            return Err(FileStoreError::Api(format!("HTTP {status}: {text}")));
        }
        Ok(response)
    }
}

#[async_trait]
impl FileBackend for HttpFileBackend {
    async fn list(&self) -> Result<Vec<FileInfo>, FileStoreError> {
        debug!("fetching file list");
        let response = self
            .http
            .get(format!("{}{}", self.base_url, FILES_PATH))
            .send()
            .await
            .map_err(|e| FileStoreError::Network(e.to_string()))?;
        let response = Self::check_status(response).await?;

        let body: ListResponse = response
            .json()
            .await
            .map_err(|e| FileStoreError::Parse(e.to_string()))?;
        Ok(body.files)
    }

    async fn delete(&self, filename: &str) -> Result<(), FileStoreError> {
        debug!(filename, "deleting file");
        let response = self
            .http
            .delete(format!(
                "{}{}/{}",
                self.base_url,
                FILES_PATH,
                urlencoding::encode(filename)
            ))
            .send()
            .await
            .map_err(|e| FileStoreError::Network(e.to_string()))?;
        Self::check_status(response).await?;
        Ok(())
    }

    async fn upload(&self, path: &Path) -> Result<UploadReceipt, FileStoreError> {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| FileStoreError::Store(format!("invalid path: {}", path.display())))?
            .to_string();

        debug!(filename, "uploading file");
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| FileStoreError::Store(format!("failed to read {}: {e}", path.display())))?;

        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(filename)
            .mime_str("application/pdf")
            .map_err(|e| FileStoreError::Parse(e.to_string()))?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .http
            .post(format!("{}{}", self.base_url, UPLOAD_PATH))
            .multipart(form)
            .send()
            .await
            .map_err(|e| FileStoreError::Network(e.to_string()))?;
        let response = Self::check_status(response).await?;

        response
            .json()
            .await
            .map_err(|e| FileStoreError::Parse(e.to_string()))
    }
}
