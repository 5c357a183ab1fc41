//! Per-chunk decoding for `streamGenerateContent` responses.
//!
//! Each Server-Sent Event carries one complete response document. This module
//! splits SSE framing and decodes each event's data with the same contract as
//! a full response. It does not merge chunks.
//!
//! ## SSE Rules
//!
//! - Lines starting with `:` are comments (ignored)
//! - Fields: `event`, `data`, `id`, `retry`
//! - Multiple `data:` lines are joined with `\n`
//! - Empty line triggers event emission
//! - `id` persists across events

use crate::decode::ResponseDecoder;
use crate::error::Result;
use crate::types::Response;

/// Data marker some proxies send after the last chunk.
const DONE_MARKER: &str = "[DONE]";

/// A parsed Server-Sent Event.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ServerSentEvent {
    /// Event type (from `event:`).
    pub event: Option<String>,
    /// Event data (from `data:` lines, joined with newlines).
    pub data: String,
    /// Last event ID seen (from `id:`).
    pub id: Option<String>,
    /// Retry timeout in milliseconds (from `retry:`).
    pub retry: Option<u32>,
}

impl ServerSentEvent {
    /// Create an event with data only.
    pub fn with_data(data: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            ..Default::default()
        }
    }

    /// Check if this event has non-empty data.
    pub fn has_data(&self) -> bool {
        !self.data.trim().is_empty()
    }

    /// Check if this is the `[DONE]` marker.
    pub fn is_done(&self) -> bool {
        self.data.trim() == DONE_MARKER
    }
}

/// Line-oriented SSE decoder.
#[derive(Debug, Default)]
pub struct SseDecoder {
    event: Option<String>,
    data: Vec<String>,
    last_event_id: Option<String>,
    retry: Option<u32>,
    buffer: Vec<u8>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a single line (without its line ending).
    ///
    /// Returns an event when `line` is empty and an event is pending.
    pub fn decode_line(&mut self, line: &str) -> Option<ServerSentEvent> {
        if line.is_empty() {
            if self.event.is_none() && self.data.is_empty() && self.retry.is_none() {
                return None;
            }
            let event = ServerSentEvent {
                event: self.event.take(),
                data: self.data.join("\n"),
                id: self.last_event_id.clone(),
                retry: self.retry.take(),
            };
            self.data.clear();
            return Some(event);
        }

        if line.starts_with(':') {
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };

        match field {
            "event" => self.event = Some(value.to_string()),
            "data" => self.data.push(value.to_string()),
            "id" => {
                if !value.contains('\0') {
                    self.last_event_id = Some(value.to_string());
                }
            }
            "retry" => {
                if let Ok(ms) = value.parse::<u32>() {
                    self.retry = Some(ms);
                }
            }
            _ => {}
        }
        None
    }

    /// Feed raw bytes and return every event completed by them.
    ///
    /// Incomplete trailing lines are kept until the next call. Handles `\n`,
    /// `\r` and `\r\n` line endings; a `\r\n` split across calls counts once.
    pub fn decode_bytes(&mut self, chunk: &[u8]) -> Vec<ServerSentEvent> {
        self.buffer.extend_from_slice(chunk);
        let mut events = Vec::new();

        while let Some((end, ending_len)) = find_line_end(&self.buffer) {
            // A lone `\r` at the end may be the first half of `\r\n`.
            if ending_len == 1 && self.buffer[end] == b'\r' && end + 1 == self.buffer.len() {
                break;
            }
            let line_bytes: Vec<u8> = self.buffer.drain(..end).collect();
            self.buffer.drain(..ending_len);
            match std::str::from_utf8(&line_bytes) {
                Ok(line) => events.extend(self.decode_line(line)),
                Err(e) => tracing::warn!(error = %e, "Skipping non-UTF-8 SSE line"),
            }
        }
        events
    }

    /// Flush a trailing line without a line ending and emit any pending event.
    pub fn finish(&mut self) -> Option<ServerSentEvent> {
        let rest = std::mem::take(&mut self.buffer);
        let rest = String::from_utf8_lossy(&rest);
        let rest = rest.trim_end_matches('\r');
        if !rest.is_empty() {
            self.decode_line(rest);
        }
        self.decode_line("")
    }
}

/// Find the next line ending, returning `(line_end, ending_len)`.
fn find_line_end(buffer: &[u8]) -> Option<(usize, usize)> {
    let i = buffer.iter().position(|&b| b == b'\n' || b == b'\r')?;
    if buffer[i] == b'\r' && buffer.get(i + 1) == Some(&b'\n') {
        Some((i, 2))
    } else {
        Some((i, 1))
    }
}

/// Decode one event's data as a response.
///
/// Returns `Ok(None)` for the `[DONE]` marker and for events without data.
pub fn decode_event(
    decoder: &ResponseDecoder,
    event: &ServerSentEvent,
) -> Result<Option<Response>> {
    if !event.has_data() || event.is_done() {
        return Ok(None);
    }
    decoder.decode_str(&event.data).map(Some)
}

#[cfg(test)]
#[path = "chunk.test.rs"]
mod tests;
