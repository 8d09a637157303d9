//! SSE stream parsing logic
//!
//! Contains the stateful SseParser for accumulating lines and emitting
//! events, as well as the core parsing functions.

use serde::Deserialize;

use crate::sse::events::{ProgressEvent, SseLine, SseParseError};

#[derive(Debug, Deserialize)]
struct ProgressPayload {
    #[serde(alias = "progress")]
    percent: f32,
    #[serde(default, alias = "message")]
    stage: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CompletePayload {
    #[serde(alias = "id")]
    document_id: String,
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorPayload {
    #[serde(alias = "error")]
    message: String,
}

/// Parse a single SSE line into its component type
pub fn parse_sse_line(line: &str) -> SseLine {
    if line.is_empty() {
        return SseLine::Empty;
    }

    if let Some(stripped) = line.strip_prefix(':') {
        return SseLine::Comment(stripped.trim().to_string());
    }

    if let Some(rest) = line.strip_prefix("event:") {
        return SseLine::Event(rest.trim().to_string());
    }

    if let Some(rest) = line.strip_prefix("data:") {
        return SseLine::Data(rest.trim().to_string());
    }

    // Unknown line format - treat as comment
    SseLine::Comment(line.to_string())
}

fn decode<'a, T: Deserialize<'a>>(event_type: &str, data: &'a str) -> Result<T, SseParseError> {
    serde_json::from_str(data).map_err(|e| SseParseError::InvalidJson {
        event_type: event_type.to_string(),
        source: e.to_string(),
    })
}

/// Parse an event type and its data into a typed event.
///
/// Unknown event types yield `Ok(None)` so newer servers can add events
/// without breaking older clients.
pub fn parse_progress_event(
    event_type: &str,
    data: &str,
) -> Result<Option<ProgressEvent>, SseParseError> {
    let event = match event_type {
        "progress" => {
            let payload: ProgressPayload = decode(event_type, data)?;
            ProgressEvent::Progress {
                percent: payload.percent.clamp(0.0, 100.0),
                stage: payload.stage,
            }
        }
        "complete" => {
            let payload: CompletePayload = decode(event_type, data)?;
            ProgressEvent::Complete {
                document_id: payload.document_id,
                url: payload.url,
            }
        }
        "error" => {
            let payload: ErrorPayload = decode(event_type, data)?;
            ProgressEvent::Error {
                message: payload.message,
            }
        }
        "ping" => ProgressEvent::Ping,
        _ => return Ok(None),
    };
    Ok(Some(event))
}

/// Stateful SSE parser that accumulates lines and emits complete events
#[derive(Debug, Default)]
pub struct SseParser {
    /// Current event type being accumulated
    current_event_type: Option<String>,
    /// Accumulated data lines (SSE allows multiple data: lines)
    data_buffer: Vec<String>,
    /// Bytes of a line not yet terminated by `\n`
    pending: Vec<u8>,
}

impl SseParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a line to the parser, potentially returning a complete event
    ///
    /// Returns:
    /// - `Ok(Some(event))` - A complete event was parsed
    /// - `Ok(None)` - Line was consumed but no event is ready
    /// - `Err(error)` - Parse error occurred
    pub fn feed_line(&mut self, line: &str) -> Result<Option<ProgressEvent>, SseParseError> {
        match parse_sse_line(line) {
            SseLine::Event(event_type) => {
                self.current_event_type = Some(event_type);
                Ok(None)
            }
            SseLine::Data(data) => {
                self.data_buffer.push(data);
                Ok(None)
            }
            SseLine::Empty => self.try_emit_event(),
            SseLine::Comment(_) => Ok(None),
        }
    }

    /// Feed a raw network chunk. Chunks may split lines (and UTF-8
    /// sequences) anywhere; incomplete trailing bytes are kept for the next
    /// call.
    pub fn feed_bytes(&mut self, chunk: &[u8]) -> Vec<Result<ProgressEvent, SseParseError>> {
        self.pending.extend_from_slice(chunk);
        let mut out = Vec::new();

        while let Some(pos) = self.pending.iter().position(|b| *b == b'\n') {
            let raw: Vec<u8> = self.pending.drain(..=pos).collect();
            let mut end = raw.len() - 1;
            if end > 0 && raw[end - 1] == b'\r' {
                end -= 1;
            }
            let line = String::from_utf8_lossy(&raw[..end]).into_owned();

            match self.feed_line(&line) {
                Ok(Some(event)) => out.push(Ok(event)),
                Ok(None) => {}
                Err(e) => out.push(Err(e)),
            }
        }

        out
    }

    /// Try to emit a complete event from accumulated state
    fn try_emit_event(&mut self) -> Result<Option<ProgressEvent>, SseParseError> {
        if self.current_event_type.is_none() && self.data_buffer.is_empty() {
            return Ok(None);
        }

        let mut event_type = self.current_event_type.take();
        let data = self.data_buffer.join("\n");
        self.data_buffer.clear();

        // No explicit event line: fall back to a JSON "type" field
        if event_type.is_none() && !data.is_empty() {
            if let Ok(json) = serde_json::from_str::<serde_json::Value>(&data) {
                if let Some(t) = json.get("type").and_then(|v| v.as_str()) {
                    event_type = Some(t.to_string());
                }
            }
        }

        match event_type {
            Some(et) if et == "ping" => Ok(Some(ProgressEvent::Ping)),
            Some(et) if data.is_empty() => {
                if matches!(et.as_str(), "progress" | "complete" | "error") {
                    Err(SseParseError::MissingData { event_type: et })
                } else {
                    Ok(None)
                }
            }
            Some(et) => parse_progress_event(&et, &data),
            None => Ok(None),
        }
    }

    /// Reset the parser state
    pub fn reset(&mut self) {
        self.current_event_type = None;
        self.data_buffer.clear();
        self.pending.clear();
    }
}
