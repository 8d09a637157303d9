//! Unified error type for adaptive delivery.
//!
//! `DeliveryError` is `Clone`: the response cache hands the same failure to
//! every caller waiting on a shared in-flight fetch.

use std::fmt;

use super::category::ErrorCategory;
use super::context::ErrorContext;
use super::network::NetworkError;
use super::storage::StorageError;
use super::stream::StreamError;

/// Unified error type for delivery operations.
#[derive(Debug, Clone, PartialEq)]
pub enum DeliveryError {
    /// HTTP and connectivity errors, including offline.
    Network(NetworkError),

    /// Progress event-stream errors.
    Stream(StreamError),

    /// Recent-searches storage errors.
    Storage(StorageError),

    /// The owning consumer went away (unmount) before the operation settled.
    Cancelled,

    /// Wrapped error with additional context.
    WithContext {
        error: Box<DeliveryError>,
        context: ErrorContext,
    },
}

impl DeliveryError {
    /// Shorthand for the offline error raised by the retry controller.
    pub fn offline() -> Self {
        DeliveryError::Network(NetworkError::Offline)
    }

    /// Get the category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            DeliveryError::Network(err) => match err {
                NetworkError::HttpStatus { status, .. } if *status >= 500 => ErrorCategory::Server,
                NetworkError::HttpStatus { .. } | NetworkError::InvalidResponse { .. } => {
                    ErrorCategory::Client
                }
                NetworkError::Cancelled => ErrorCategory::User,
                _ => ErrorCategory::Network,
            },
            DeliveryError::Stream(err) => match err {
                StreamError::ConnectionLost { .. } => ErrorCategory::Network,
                StreamError::ServerClosed { .. } | StreamError::BackendError { .. } => {
                    ErrorCategory::Server
                }
                StreamError::InvalidJson { .. } | StreamError::MissingData { .. } => {
                    ErrorCategory::Client
                }
            },
            DeliveryError::Storage(StorageError::NoHomeDirectory) => ErrorCategory::Configuration,
            DeliveryError::Storage(_) => ErrorCategory::System,
            DeliveryError::Cancelled => ErrorCategory::User,
            DeliveryError::WithContext { error, .. } => error.category(),
        }
    }

    /// Check if this error is worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            DeliveryError::Network(err) => err.is_retryable(),
            DeliveryError::Stream(err) => err.is_retryable(),
            DeliveryError::Storage(_) => false,
            DeliveryError::Cancelled => false,
            DeliveryError::WithContext { error, .. } => error.is_retryable(),
        }
    }

    /// True when the failure is the device being offline.
    pub fn is_offline(&self) -> bool {
        matches!(self.inner(), DeliveryError::Network(NetworkError::Offline))
    }

    /// True when the owning consumer cancelled the operation.
    pub fn is_cancelled(&self) -> bool {
        matches!(
            self.inner(),
            DeliveryError::Cancelled | DeliveryError::Network(NetworkError::Cancelled)
        )
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            DeliveryError::Network(err) => err.user_message(),
            DeliveryError::Stream(err) => err.user_message(),
            DeliveryError::Storage(err) => err.user_message(),
            DeliveryError::Cancelled => "Loading was cancelled.".to_string(),
            DeliveryError::WithContext { error, .. } => error.user_message(),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            DeliveryError::Network(err) => err.error_code(),
            DeliveryError::Stream(err) => err.error_code(),
            DeliveryError::Storage(err) => err.error_code(),
            DeliveryError::Cancelled => "E_CANCELLED",
            DeliveryError::WithContext { error, .. } => error.error_code(),
        }
    }

    /// Attach context to this error.
    pub fn with_context(self, ctx: ErrorContext) -> Self {
        DeliveryError::WithContext {
            error: Box::new(self),
            context: ctx,
        }
    }

    /// Get the context if this error has one attached.
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            DeliveryError::WithContext { context, .. } => Some(context),
            _ => None,
        }
    }

    /// Get the inner error without context.
    pub fn inner(&self) -> &DeliveryError {
        match self {
            DeliveryError::WithContext { error, .. } => error.inner(),
            _ => self,
        }
    }

    /// Recovery hint for the error affordance.
    pub fn recovery_hint(&self) -> &'static str {
        self.category().recovery_hint()
    }
}

impl fmt::Display for DeliveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryError::Network(err) => write!(f, "{}", err),
            DeliveryError::Stream(err) => write!(f, "{}", err),
            DeliveryError::Storage(err) => write!(f, "{}", err),
            DeliveryError::Cancelled => write!(f, "Operation cancelled"),
            DeliveryError::WithContext { error, context } => write!(f, "{} ({})", error, context),
        }
    }
}

impl std::error::Error for DeliveryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DeliveryError::Network(err) => Some(err),
            DeliveryError::Stream(err) => Some(err),
            DeliveryError::Storage(err) => Some(err),
            DeliveryError::Cancelled => None,
            DeliveryError::WithContext { error, .. } => error.source(),
        }
    }
}

// ============================================================================
// From implementations
// ============================================================================

impl From<NetworkError> for DeliveryError {
    fn from(err: NetworkError) -> Self {
        DeliveryError::Network(err)
    }
}

impl From<StreamError> for DeliveryError {
    fn from(err: StreamError) -> Self {
        DeliveryError::Stream(err)
    }
}

impl From<StorageError> for DeliveryError {
    fn from(err: StorageError) -> Self {
        DeliveryError::Storage(err)
    }
}

impl From<crate::traits::HttpError> for DeliveryError {
    fn from(err: crate::traits::HttpError) -> Self {
        DeliveryError::Network(err.into())
    }
}

impl From<std::io::Error> for DeliveryError {
    fn from(err: std::io::Error) -> Self {
        DeliveryError::Storage(super::storage::classify_io_error(err, None, "I/O operation"))
    }
}

impl From<serde_json::Error> for DeliveryError {
    fn from(err: serde_json::Error) -> Self {
        DeliveryError::Network(NetworkError::InvalidResponse {
            message: err.to_string(),
        })
    }
}
