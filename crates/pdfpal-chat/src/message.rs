//! Conversation log entries.

use chrono::Utc;
use pdfpal_common::MessageId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One entry in the conversation log. Entries are append-only; only a
/// streaming assistant message ever has its `content` mutated, and only by
/// appending.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: MessageId,
    pub role: Role,
    pub content: String,
    /// RFC 3339 creation time, fixed at construction.
    pub timestamp: String,
    /// True only for an assistant message whose content is still growing.
    pub is_streaming: bool,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: MessageId::new(),
            role: Role::User,
            content: content.into(),
            timestamp: Utc::now().to_rfc3339(),
            is_streaming: false,
        }
    }

    /// Empty assistant message appended before any response bytes arrive, so
    /// callers can render a thinking state immediately.
    pub fn assistant_placeholder() -> Self {
        Self {
            id: MessageId::new(),
            role: Role::Assistant,
            content: String::new(),
            timestamp: Utc::now().to_rfc3339(),
            is_streaming: true,
        }
    }
}
