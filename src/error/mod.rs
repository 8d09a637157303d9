//! Unified error handling for adaptive delivery.
//!
//! Failures never cross a consumer boundary as panics. Every async boundary
//! converts them into a [`DeliveryError`], which the rendering layer turns
//! into a "failed, retry" affordance.
//!
//! | Category | Description | Retryable |
//! |----------|-------------|-----------|
//! | Network | Connection refused, timeout, offline | Yes (offline: no) |
//! | Server | Backend errors (5xx), stream closed | Yes |
//! | Client | Undecodable payloads, 4xx | No |
//! | User | Cancelled by the consumer | No |
//! | System | Recent-searches file errors | No |
//!
//! Absent platform capabilities are not errors at all; the sensor degrades
//! to conservative defaults instead.

mod category;
mod context;
mod delivery_error;
mod network;
mod result;
mod storage;
mod stream;

pub use category::ErrorCategory;
pub use context::ErrorContext;
pub use delivery_error::DeliveryError;
pub use network::NetworkError;
pub use result::{DeliveryResult, ResultExt};
pub use storage::{classify_io_error, StorageError};
pub use stream::StreamError;

#[cfg(test)]
mod integration_tests {
    use super::*;

    #[test]
    fn test_error_unification() {
        let net_err: DeliveryError = NetworkError::Timeout {
            operation: "news".to_string(),
            duration_secs: 15,
        }
        .into();
        let stream_err: DeliveryError = StreamError::ConnectionLost {
            message: "reset".to_string(),
        }
        .into();
        let storage_err: DeliveryError = StorageError::NoHomeDirectory.into();

        assert_eq!(net_err.category(), ErrorCategory::Network);
        assert_eq!(stream_err.category(), ErrorCategory::Network);
        assert_eq!(storage_err.category(), ErrorCategory::System);

        for err in [&net_err, &stream_err, &storage_err] {
            assert!(!err.error_code().is_empty());
            assert!(!err.user_message().is_empty());
            assert!(!err.recovery_hint().is_empty());
        }
    }

    #[test]
    fn test_retry_logic() {
        let retryable: Vec<DeliveryError> = vec![
            NetworkError::Timeout {
                operation: "test".to_string(),
                duration_secs: 30,
            }
            .into(),
            NetworkError::HttpStatus {
                status: 503,
                message: "unavailable".to_string(),
            }
            .into(),
            StreamError::ServerClosed { reason: None }.into(),
        ];
        for err in retryable {
            assert!(err.is_retryable(), "Expected {:?} to be retryable", err);
        }

        let not_retryable: Vec<DeliveryError> = vec![
            NetworkError::Offline.into(),
            NetworkError::HttpStatus {
                status: 404,
                message: "missing".to_string(),
            }
            .into(),
            StorageError::NoHomeDirectory.into(),
            DeliveryError::Cancelled,
        ];
        for err in not_retryable {
            assert!(!err.is_retryable(), "Expected {:?} to not be retryable", err);
        }
    }
}
