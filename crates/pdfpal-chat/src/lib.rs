//! Chat core for PDF Pal.
//!
//! Owns the lifecycle of a chat turn: send a question (optionally scoped to an
//! uploaded document), consume the backend's streamed response incrementally,
//! and grow the assistant message in place until the turn completes or fails.

pub mod client;
pub mod message;
pub mod session;
pub mod stream;
pub mod turn;

pub use client::{ChatBackend, HttpChatBackend};
pub use message::{ChatMessage, Role};
pub use session::ChatSession;
pub use stream::StreamPayload;
pub use turn::{TurnEvent, TurnState};

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("API error: {0}")]
    Api(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("question is empty")]
    EmptyQuestion,
    #[error("a turn is already in flight")]
    Busy,
}
