//! Progress event types.

use serde::{Deserialize, Serialize};

use crate::error::StreamError;

/// Typed events from the document-loading progress stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProgressEvent {
    /// Loading advanced
    Progress {
        percent: f32,
        #[serde(default)]
        stage: Option<String>,
    },
    /// Document is ready
    Complete {
        document_id: String,
        #[serde(default)]
        url: Option<String>,
    },
    /// Backend gave up
    Error { message: String },
    /// Heartbeat/keepalive
    Ping,
}

impl ProgressEvent {
    pub fn event_type_name(&self) -> &'static str {
        match self {
            ProgressEvent::Progress { .. } => "progress",
            ProgressEvent::Complete { .. } => "complete",
            ProgressEvent::Error { .. } => "error",
            ProgressEvent::Ping => "ping",
        }
    }

    /// `complete` and `error` end the stream.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ProgressEvent::Complete { .. } | ProgressEvent::Error { .. }
        )
    }
}

/// Represents a parsed SSE line
#[derive(Debug, Clone, PartialEq)]
pub enum SseLine {
    /// Event type declaration (e.g., "event: progress")
    Event(String),
    /// Data payload (e.g., "data: {\"percent\": 40}")
    Data(String),
    /// Empty line - signals end of event
    Empty,
    /// Comment line (starts with ':')
    Comment(String),
}

/// Errors that can occur during SSE parsing
#[derive(Debug, Clone, PartialEq)]
pub enum SseParseError {
    InvalidJson { event_type: String, source: String },
    MissingData { event_type: String },
}

impl std::fmt::Display for SseParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SseParseError::InvalidJson { event_type, source } => {
                write!(f, "Invalid JSON for event '{}': {}", event_type, source)
            }
            SseParseError::MissingData { event_type } => {
                write!(f, "Missing data for event type: {}", event_type)
            }
        }
    }
}

impl std::error::Error for SseParseError {}

impl From<SseParseError> for StreamError {
    fn from(err: SseParseError) -> Self {
        match err {
            SseParseError::InvalidJson { event_type, source } => StreamError::InvalidJson {
                event_type,
                message: source,
            },
            SseParseError::MissingData { event_type } => StreamError::MissingData { event_type },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_events() {
        assert!(ProgressEvent::Complete {
            document_id: "d".to_string(),
            url: None
        }
        .is_terminal());
        assert!(ProgressEvent::Error {
            message: "x".to_string()
        }
        .is_terminal());
        assert!(!ProgressEvent::Ping.is_terminal());
        assert!(!ProgressEvent::Progress {
            percent: 10.0,
            stage: None
        }
        .is_terminal());
    }

    #[test]
    fn test_parse_error_into_stream_error() {
        let err: StreamError = SseParseError::MissingData {
            event_type: "progress".to_string(),
        }
        .into();
        assert_eq!(
            err,
            StreamError::MissingData {
                event_type: "progress".to_string()
            }
        );
    }
}
