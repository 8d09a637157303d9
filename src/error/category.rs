//! Error category classification.
//!
//! Categories drive the retry controller and the error affordance shown to
//! the user: transient categories are retried with backoff, the rest surface
//! immediately.

use std::fmt;

/// High-level categorization of delivery errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Connectivity problems (connection refused, DNS, timeout, offline).
    /// Generally transient and retryable.
    Network,

    /// Backend errors (HTTP 5xx, stream closed by server).
    /// Retryable after a delay.
    Server,

    /// Malformed payloads or programming errors. Not retryable.
    Client,

    /// The user cancelled or must act (navigated away, bad query).
    User,

    /// Local filesystem or OS errors.
    System,

    /// Invalid or missing configuration.
    Configuration,
}

impl ErrorCategory {
    /// Returns true if errors in this category are generally transient.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorCategory::Network | ErrorCategory::Server)
    }

    /// Short label suitable for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "network",
            ErrorCategory::Server => "server",
            ErrorCategory::Client => "client",
            ErrorCategory::User => "user",
            ErrorCategory::System => "system",
            ErrorCategory::Configuration => "configuration",
        }
    }

    /// Suggested recovery action shown next to the retry affordance.
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "Check your internet connection and try again",
            ErrorCategory::Server => {
                "The data service may be experiencing issues. Please try again later"
            }
            ErrorCategory::Client => "This may be a bug. Please report this issue if it persists",
            ErrorCategory::User => "Please check your input and try again",
            ErrorCategory::System => "Check file permissions and available disk space",
            ErrorCategory::Configuration => "Check your configuration settings",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
