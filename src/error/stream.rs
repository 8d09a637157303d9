//! Event-stream error types.
//!
//! Errors raised while consuming the document-loading progress stream.

use std::fmt;

/// Stream-specific error variants.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamError {
    /// Stream connection was lost unexpectedly.
    ConnectionLost { message: String },

    /// Invalid JSON in an event payload.
    InvalidJson { event_type: String, message: String },

    /// An event arrived without its data line.
    MissingData { event_type: String },

    /// The server closed the stream before sending `complete`.
    ServerClosed { reason: Option<String> },

    /// The backend reported an error event.
    BackendError { message: String },
}

impl StreamError {
    /// Check if this error is likely transient and can be retried.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            StreamError::ConnectionLost { .. } | StreamError::ServerClosed { .. }
        )
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            StreamError::ConnectionLost { .. } => {
                "Connection to the server was lost while loading.".to_string()
            }
            StreamError::InvalidJson { event_type, .. } => format!(
                "Received invalid progress data ({}). Please try again.",
                event_type
            ),
            StreamError::MissingData { event_type } => {
                format!("Progress update '{}' was incomplete.", event_type)
            }
            StreamError::ServerClosed { reason } => match reason {
                Some(r) => format!("The server stopped loading: {}", r),
                None => "The server stopped loading before it finished.".to_string(),
            },
            StreamError::BackendError { message } => format!("Loading failed: {}", message),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            StreamError::ConnectionLost { .. } => "E_STREAM_CONN",
            StreamError::InvalidJson { .. } => "E_STREAM_JSON",
            StreamError::MissingData { .. } => "E_STREAM_DATA",
            StreamError::ServerClosed { .. } => "E_STREAM_CLOSED",
            StreamError::BackendError { .. } => "E_STREAM_BACKEND",
        }
    }
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamError::ConnectionLost { message } => {
                write!(f, "Stream connection lost: {}", message)
            }
            StreamError::InvalidJson { event_type, message } => {
                write!(f, "Invalid JSON for {} event: {}", event_type, message)
            }
            StreamError::MissingData { event_type } => {
                write!(f, "Missing data for {} event", event_type)
            }
            StreamError::ServerClosed { reason } => match reason {
                Some(r) => write!(f, "Server closed stream: {}", r),
                None => write!(f, "Server closed stream"),
            },
            StreamError::BackendError { message } => write!(f, "Backend error: {}", message),
        }
    }
}

impl std::error::Error for StreamError {}
