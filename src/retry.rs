//! Bounded retry with capped exponential backoff.
//!
//! Delays double from `base_delay` on each attempt and are capped at
//! `max_delay`: with the defaults 500ms, 1s, 2s, then give up. A rate-limit
//! response's `Retry-After` stretches the delay, up to the same cap.
//!
//! Before a scheduled retry fires, the current connection type is checked.
//! An offline device ends the run with [`DeliveryError::offline`] instead of
//! burning the remaining attempts.

use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::domain::ConnectionSnapshot;
use crate::error::{DeliveryError, DeliveryResult, ErrorContext, NetworkError};

/// Retry limits for a single operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt. Total calls is `max_retries + 1`.
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(8),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
            max_delay,
        }
    }

    /// Fail on the first error.
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Delay before retry number `attempt` (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let shift = attempt.saturating_sub(1).min(31);
        self.base_delay
            .saturating_mul(1u32 << shift)
            .min(self.max_delay)
    }

    /// Delay before retry number `attempt`, stretched to a server's
    /// `Retry-After` hint. Still capped at `max_delay`.
    pub fn delay_after(&self, attempt: u32, server_hint: Option<Duration>) -> Duration {
        let delay = self.delay_for(attempt);
        match server_hint {
            Some(hint) => delay.max(hint).min(self.max_delay),
            None => delay,
        }
    }
}

fn retry_after_hint(err: &DeliveryError) -> Option<Duration> {
    match err.inner() {
        DeliveryError::Network(NetworkError::RateLimited {
            retry_after_secs: Some(secs),
        }) => Some(Duration::from_secs(*secs)),
        _ => None,
    }
}

/// Failure bookkeeping for one operation. Starts fresh on every run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RetryState {
    pub attempt_count: u32,
    pub last_error: Option<DeliveryError>,
}

impl RetryState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_failure(&mut self, error: DeliveryError) {
        self.last_error = Some(error);
    }

    pub fn reset(&mut self) {
        self.attempt_count = 0;
        self.last_error = None;
    }

    pub fn exhausted(&self, policy: &RetryPolicy) -> bool {
        self.attempt_count >= policy.max_retries
    }
}

/// Run `op` until it succeeds, fails permanently, or runs out of retries.
///
/// `op` receives the zero-based attempt number. Non-retryable errors are
/// returned immediately; the last error of an exhausted run carries the
/// retry count in its context. Cancelling `cancel` abandons both an in-flight
/// attempt and a pending backoff sleep and yields [`DeliveryError::Cancelled`].
pub async fn retry_with_backoff<T, F, Fut>(
    policy: &RetryPolicy,
    connection: Option<&watch::Receiver<ConnectionSnapshot>>,
    cancel: &CancellationToken,
    mut op: F,
) -> DeliveryResult<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = DeliveryResult<T>>,
{
    let mut state = RetryState::new();

    loop {
        if cancel.is_cancelled() {
            return Err(DeliveryError::Cancelled);
        }

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(DeliveryError::Cancelled),
            result = op(state.attempt_count) => result,
        };

        let err = match result {
            Ok(value) => {
                if state.attempt_count > 0 {
                    info!("Succeeded after {} retries", state.attempt_count);
                }
                return Ok(value);
            }
            Err(err) => err,
        };

        if err.is_cancelled() {
            return Err(err);
        }
        if !err.is_retryable() {
            debug!(code = err.error_code(), "Not retrying: {}", err);
            return Err(err);
        }
        if state.exhausted(policy) {
            error!(
                "Giving up after {} attempts: {}",
                state.attempt_count + 1,
                err
            );
            let context =
                ErrorContext::new("retry_with_backoff").with_retry_count(state.attempt_count);
            return Err(err.with_context(context));
        }

        state.attempt_count += 1;
        let delay = policy.delay_after(state.attempt_count, retry_after_hint(&err));
        warn!(
            "Attempt {} failed ({}), retry {} of {} in {}ms",
            state.attempt_count,
            err,
            state.attempt_count,
            policy.max_retries,
            delay.as_millis()
        );
        state.record_failure(err);

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("Cancelled during backoff");
                return Err(DeliveryError::Cancelled);
            }
            _ = tokio::time::sleep(delay) => {}
        }

        if connection.is_some_and(|rx| rx.borrow().is_offline()) {
            warn!("Connection went offline, dropping scheduled retry");
            return Err(DeliveryError::offline());
        }
    }
}
