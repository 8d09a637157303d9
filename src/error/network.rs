//! Network-related error types.
//!
//! Errors raised while talking to the dashboard's HTTP APIs: connection
//! failures, timeouts, non-2xx statuses and undecodable bodies.

use std::fmt;

use crate::traits::HttpError;

/// Network-specific error variants.
#[derive(Debug, Clone, PartialEq)]
pub enum NetworkError {
    /// Connection to the server failed.
    ConnectionFailed { url: String, message: String },

    /// Request timed out.
    Timeout { operation: String, duration_secs: u64 },

    /// HTTP status error (non-2xx response).
    HttpStatus { status: u16, message: String },

    /// Rate limited by server.
    RateLimited { retry_after_secs: Option<u64> },

    /// Body could not be decoded into the expected shape.
    InvalidResponse { message: String },

    /// The connection sensor reports the device is offline.
    Offline,

    /// Request was cancelled.
    Cancelled,

    /// Generic network error.
    Other { message: String },
}

impl NetworkError {
    /// Check if this error is likely transient and can be retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            NetworkError::ConnectionFailed { .. } => true,
            NetworkError::Timeout { .. } => true,
            NetworkError::HttpStatus { status, .. } => {
                *status >= 500 || *status == 429 || *status == 408
            }
            NetworkError::RateLimited { .. } => true,
            NetworkError::InvalidResponse { .. } => false,
            // Nothing to gain until the connection comes back
            NetworkError::Offline => false,
            NetworkError::Cancelled => false,
            NetworkError::Other { .. } => true,
        }
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            NetworkError::ConnectionFailed { .. } => {
                "Unable to reach the data service. Please check your internet connection."
                    .to_string()
            }
            NetworkError::Timeout { operation, duration_secs } => format!(
                "Loading {} timed out after {} seconds. The service may be slow or unreachable.",
                operation, duration_secs
            ),
            NetworkError::HttpStatus { status, .. } => match *status {
                400 => "The request was invalid. Please try again.".to_string(),
                401 | 403 => "You don't have access to this data.".to_string(),
                404 => "The requested data was not found.".to_string(),
                429 => "Too many requests. Please wait a moment and try again.".to_string(),
                500..=599 => {
                    "The data service is experiencing issues. Please try again later.".to_string()
                }
                _ => format!(
                    "The data service returned an error (HTTP {}). Please try again.",
                    status
                ),
            },
            NetworkError::RateLimited { retry_after_secs } => match retry_after_secs {
                Some(secs) => format!(
                    "Too many requests. Please wait {} seconds before trying again.",
                    secs
                ),
                None => "Too many requests. Please wait a moment and try again.".to_string(),
            },
            NetworkError::InvalidResponse { .. } => {
                "Received unexpected data from the service. Please try again.".to_string()
            }
            NetworkError::Offline => {
                "You are offline. Content will load when your connection returns.".to_string()
            }
            NetworkError::Cancelled => "The request was cancelled.".to_string(),
            NetworkError::Other { message } => format!("A network error occurred: {}", message),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            NetworkError::ConnectionFailed { .. } => "E_NET_CONN",
            NetworkError::Timeout { .. } => "E_NET_TIMEOUT",
            NetworkError::HttpStatus { .. } => "E_NET_HTTP",
            NetworkError::RateLimited { .. } => "E_NET_RATE",
            NetworkError::InvalidResponse { .. } => "E_NET_INVALID",
            NetworkError::Offline => "E_NET_OFFLINE",
            NetworkError::Cancelled => "E_NET_CANCEL",
            NetworkError::Other { .. } => "E_NET_OTHER",
        }
    }
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkError::ConnectionFailed { url, message } => {
                write!(f, "Connection failed to '{}': {}", url, message)
            }
            NetworkError::Timeout { operation, duration_secs } => {
                write!(f, "{} timed out after {} seconds", operation, duration_secs)
            }
            NetworkError::HttpStatus { status, message } => {
                write!(f, "HTTP {} error: {}", status, message)
            }
            NetworkError::RateLimited { retry_after_secs } => match retry_after_secs {
                Some(secs) => write!(f, "Rate limited, retry after {} seconds", secs),
                None => write!(f, "Rate limited"),
            },
            NetworkError::InvalidResponse { message } => write!(f, "Invalid response: {}", message),
            NetworkError::Offline => write!(f, "Device is offline"),
            NetworkError::Cancelled => write!(f, "Request cancelled"),
            NetworkError::Other { message } => write!(f, "Network error: {}", message),
        }
    }
}

impl std::error::Error for NetworkError {}

impl From<HttpError> for NetworkError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::ConnectionFailed(message) => NetworkError::ConnectionFailed {
                url: "unknown".to_string(),
                message,
            },
            HttpError::Timeout(operation) => NetworkError::Timeout {
                operation,
                duration_secs: 0,
            },
            HttpError::ServerError { status: 429, .. } => NetworkError::RateLimited {
                retry_after_secs: None,
            },
            HttpError::ServerError { status, message } => {
                NetworkError::HttpStatus { status, message }
            }
            HttpError::Cancelled => NetworkError::Cancelled,
            HttpError::InvalidUrl(message) => NetworkError::InvalidResponse {
                message: format!("invalid url: {}", message),
            },
            HttpError::Io(message) | HttpError::Other(message) => NetworkError::Other { message },
        }
    }
}
