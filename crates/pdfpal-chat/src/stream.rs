//! Decoding of the backend's streamed chat response.
//!
//! The chat endpoint answers with newline-delimited `data: <json>` records.
//! Each record carries either `{"chunk": "..."}` with the next fragment of
//! answer text or `{"error": "..."}` aborting the turn; the literal `[DONE]`
//! payload terminates the stream cleanly.

use futures_util::StreamExt;
use serde::Deserialize;
use tokio::io::AsyncBufReadExt;
use tokio_util::io::StreamReader;
use tracing::warn;

use crate::ChatError;

pub const DONE_SENTINEL: &str = "[DONE]";

/// One decoded record from the response stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamPayload {
    /// Next fragment of the answer, to be appended in arrival order.
    Chunk(String),
    /// Server-reported failure; aborts the turn with this text.
    Error(String),
    /// Termination sentinel; the answer is complete.
    Done,
}

#[derive(Deserialize)]
struct DataRecord {
    chunk: Option<String>,
    error: Option<String>,
}

/// Decode one line of the response body.
///
/// Returns `None` for lines without a `data:` prefix and for records that
/// fail to parse; a malformed record is logged and skipped rather than
/// aborting the turn.
pub fn decode_line(line: &str) -> Option<StreamPayload> {
    let payload = line.strip_prefix("data:")?.trim();
    if payload.is_empty() {
        return None;
    }
    if payload == DONE_SENTINEL {
        return Some(StreamPayload::Done);
    }
    match serde_json::from_str::<DataRecord>(payload) {
        Ok(DataRecord { error: Some(e), .. }) => Some(StreamPayload::Error(e)),
        Ok(DataRecord { chunk: Some(c), .. }) => Some(StreamPayload::Chunk(c)),
        Ok(_) => {
            warn!("data record carries neither chunk nor error, skipping");
            None
        }
        Err(e) => {
            warn!(error = %e, "skipping malformed stream record");
            None
        }
    }
}

/// Read a streamed chat response line by line, forwarding each decoded
/// payload in arrival order. Stops after an `Error` payload or the `[DONE]`
/// sentinel; a stream that simply closes is a clean end as well.
pub async fn read_stream(
    response: reqwest::Response,
    mut on_payload: impl FnMut(StreamPayload) + Send,
) -> Result<(), ChatError> {
    let byte_stream = response
        .bytes_stream()
        .map(|result| result.map_err(std::io::Error::other));
    let reader = tokio::io::BufReader::new(StreamReader::new(byte_stream));
    let mut lines = reader.lines();

    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|e| ChatError::Network(e.to_string()))?
    {
        match decode_line(&line) {
            Some(payload @ (StreamPayload::Done | StreamPayload::Error(_))) => {
                on_payload(payload);
                return Ok(());
            }
            Some(payload) => on_payload(payload),
            None => {}
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_chunk_record() {
        let payload = decode_line(r#"data: {"chunk": "The "}"#);
        assert_eq!(payload, Some(StreamPayload::Chunk("The ".into())));
    }

    #[test]
    fn decodes_error_record() {
        let payload = decode_line(r#"data: {"error": "model unavailable"}"#);
        assert_eq!(
            payload,
            Some(StreamPayload::Error("model unavailable".into()))
        );
    }

    #[test]
    fn decodes_done_sentinel() {
        assert_eq!(decode_line("data: [DONE]"), Some(StreamPayload::Done));
    }

    #[test]
    fn error_wins_over_chunk_in_one_record() {
        let payload = decode_line(r#"data: {"chunk": "x", "error": "boom"}"#);
        assert_eq!(payload, Some(StreamPayload::Error("boom".into())));
    }

    #[test]
    fn skips_malformed_json() {
        assert_eq!(decode_line("data: {not json"), None);
    }

    #[test]
    fn skips_records_without_known_fields() {
        assert_eq!(decode_line(r#"data: {"other": 1}"#), None);
    }

    #[test]
    fn ignores_non_data_lines() {
        assert_eq!(decode_line(""), None);
        assert_eq!(decode_line(": keepalive comment"), None);
        assert_eq!(decode_line("event: message"), None);
    }

    #[test]
    fn tolerates_missing_space_after_prefix() {
        let payload = decode_line(r#"data:{"chunk": "hi"}"#);
        assert_eq!(payload, Some(StreamPayload::Chunk("hi".into())));
    }
}
