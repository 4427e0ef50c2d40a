//! Turn state machine and placeholder mutation.
//!
//! A turn moves `Idle -> AwaitingFirstByte -> Streaming -> Completed | Failed`,
//! with `Streaming` self-looping on each chunk. `Abandoned` is reached only by
//! an explicit caller cancellation. Keeping the reducer separate from the
//! transport lets the content rules be tested without any I/O.

use crate::message::ChatMessage;
use crate::stream::StreamPayload;

/// Shown in place of an answer when the turn fails at the transport level.
pub const FAILED_ANSWER: &str =
    "Sorry, something went wrong while answering your question. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    Idle,
    AwaitingFirstByte,
    Streaming,
    Completed,
    Failed,
    Abandoned,
}

/// Caller-visible progress of a turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnEvent {
    /// A fragment of answer text was appended to the assistant message.
    Chunk(String),
    /// The turn finished; carries the full answer.
    Completed(String),
    /// The turn failed; carries the error text.
    Failed(String),
}

/// Apply one decoded stream payload to the assistant placeholder.
///
/// Chunks append to `content` in arrival order; an error payload freezes the
/// message with the server's error text; the sentinel freezes the message
/// with whatever was accumulated. Completion is reported by the session once
/// the stream is fully drained, not from here.
pub(crate) fn apply_payload(
    placeholder: &mut ChatMessage,
    state: &mut TurnState,
    payload: StreamPayload,
    on_event: &mut dyn FnMut(&TurnEvent),
) {
    match payload {
        StreamPayload::Chunk(chunk) => {
            if *state == TurnState::AwaitingFirstByte {
                *state = TurnState::Streaming;
            }
            placeholder.content.push_str(&chunk);
            on_event(&TurnEvent::Chunk(chunk));
        }
        StreamPayload::Error(text) => {
            placeholder.content = text.clone();
            placeholder.is_streaming = false;
            *state = TurnState::Failed;
            on_event(&TurnEvent::Failed(text));
        }
        StreamPayload::Done => {
            placeholder.is_streaming = false;
            *state = TurnState::Completed;
        }
    }
}
