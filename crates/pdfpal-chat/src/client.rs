//! Chat backend client.

use async_trait::async_trait;
use tracing::debug;

use crate::stream::{read_stream, StreamPayload};
use crate::ChatError;

pub(crate) const CHAT_PATH: &str = "/api/chat";

/// Transport seam for the chat endpoint. `ask` sends one question and calls
/// `on_payload` for every decoded record in arrival order; tests substitute a
/// scripted implementation.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn ask(
        &self,
        message: &str,
        filename: Option<&str>,
        on_payload: &mut (dyn FnMut(StreamPayload) + Send),
    ) -> Result<(), ChatError>;
}

/// Production backend speaking to the PDF Pal HTTP API.
pub struct HttpChatBackend {
    base_url: String,
    http: reqwest::Client,
}

impl HttpChatBackend {
    /// No overall request timeout: the response is an open-ended stream, so
    /// transport failure is the only termination signal besides the sentinel.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::builder()
                .connect_timeout(std::time::Duration::from_secs(10))
                .build()
                .expect("failed to build HTTP client"),
        }
    }
}

#[async_trait]
impl ChatBackend for HttpChatBackend {
    async fn ask(
        &self,
        message: &str,
        filename: Option<&str>,
        on_payload: &mut (dyn FnMut(StreamPayload) + Send),
    ) -> Result<(), ChatError> {
        let body = serde_json::json!({
            "message": message,
            "filename": filename,
        });

        debug!(document = ?filename, "chat request");

        let response = self
            .http
            .post(format!("{}{}", self.base_url, CHAT_PATH))
            .json(&body)
            .send()
            .await
            .map_err(|e| ChatError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let text = text.chars().take(200).collect::<String>();
            return Err(ChatError::Api(format!("HTTP {status}: {text}")));
        }

        read_stream(response, |payload| on_payload(payload)).await
    }
}
