//! Chat session: conversation log plus the single in-flight turn.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::debug;

use crate::client::ChatBackend;
use crate::message::ChatMessage;
use crate::turn::{self, TurnEvent, TurnState, FAILED_ANSWER};
use crate::ChatError;

/// Guard that clears the `busy` flag on drop, ensuring it is always released
/// even if the submit future is cancelled or an early return occurs.
struct BusyGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> BusyGuard<'a> {
    /// Attempt to acquire the busy lock. Returns `Err` if a turn is already
    /// in flight.
    fn acquire(flag: &'a AtomicBool) -> Result<Self, ChatError> {
        if flag
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            return Err(ChatError::Busy);
        }
        Ok(Self { flag })
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// A conversation with the assistant. Holds the append-only message log and
/// the state of the current turn.
pub struct ChatSession {
    messages: Vec<ChatMessage>,
    state: TurnState,
    busy: AtomicBool,
}

impl ChatSession {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            state: TurnState::Idle,
            busy: AtomicBool::new(false),
        }
    }

    /// Submit one question and stream the answer.
    ///
    /// Appends the user message and an empty streaming placeholder before any
    /// network I/O, then applies stream payloads to the placeholder strictly
    /// in arrival order, reporting progress through `on_event`. Returns the
    /// final answer text on completion.
    ///
    /// `document` scopes the question to one uploaded file; `None` means
    /// general chat. A second call while a turn is in flight fails with
    /// [`ChatError::Busy`] without touching the log.
    pub async fn submit<F>(
        &mut self,
        backend: &dyn ChatBackend,
        question: &str,
        document: Option<&str>,
        mut on_event: F,
    ) -> Result<String, ChatError>
    where
        F: FnMut(&TurnEvent) + Send,
    {
        let question = question.trim();
        if question.is_empty() {
            return Err(ChatError::EmptyQuestion);
        }
        let _guard = BusyGuard::acquire(&self.busy)?;

        self.messages.push(ChatMessage::user(question));
        self.messages.push(ChatMessage::assistant_placeholder());
        self.state = TurnState::AwaitingFirstByte;
        let idx = self.messages.len() - 1;

        let result = {
            let messages = &mut self.messages;
            let state = &mut self.state;
            backend
                .ask(question, document, &mut |payload| {
                    turn::apply_payload(&mut messages[idx], state, payload, &mut on_event)
                })
                .await
        };

        match result {
            Ok(()) => {
                if self.state == TurnState::Failed {
                    // {error} payload; the placeholder already carries the text.
                    return Err(ChatError::Api(self.messages[idx].content.clone()));
                }
                // Sentinel or clean end of stream: freeze the answer.
                let placeholder = &mut self.messages[idx];
                placeholder.is_streaming = false;
                self.state = TurnState::Completed;
                let answer = placeholder.content.clone();
                debug!(chars = answer.len(), "turn completed");
                on_event(&TurnEvent::Completed(answer.clone()));
                Ok(answer)
            }
            Err(e) => {
                let placeholder = &mut self.messages[idx];
                placeholder.content = FAILED_ANSWER.to_string();
                placeholder.is_streaming = false;
                self.state = TurnState::Failed;
                on_event(&TurnEvent::Failed(e.to_string()));
                Err(e)
            }
        }
    }

    /// Resolve a turn whose submit future was dropped mid-stream. The partial
    /// answer is kept as-is but no longer marked streaming.
    pub fn abandon_turn(&mut self) {
        if let Some(placeholder) = self.messages.last_mut() {
            if placeholder.is_streaming {
                placeholder.is_streaming = false;
                self.state = TurnState::Abandoned;
                debug!("turn abandoned");
            }
        }
    }

    /// Full conversation history, in arrival order.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    /// Clear conversation history.
    pub fn clear(&mut self) {
        self.messages.clear();
        self.state = TurnState::Idle;
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}
