//! Result type alias for delivery operations.

use super::context::ErrorContext;
use super::delivery_error::DeliveryError;

/// Type alias for Results using DeliveryError.
pub type DeliveryResult<T> = Result<T, DeliveryError>;

/// Extension trait for Result types to add context to errors.
pub trait ResultExt<T> {
    /// Add context to an error if the result is Err.
    fn context(self, ctx: ErrorContext) -> DeliveryResult<T>;

    /// Add context using a closure (only called on error).
    fn with_context<F>(self, f: F) -> DeliveryResult<T>
    where
        F: FnOnce() -> ErrorContext;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Into<DeliveryError>,
{
    fn context(self, ctx: ErrorContext) -> DeliveryResult<T> {
        self.map_err(|e| e.into().with_context(ctx))
    }

    fn with_context<F>(self, f: F) -> DeliveryResult<T>
    where
        F: FnOnce() -> ErrorContext,
    {
        self.map_err(|e| e.into().with_context(f()))
    }
}
