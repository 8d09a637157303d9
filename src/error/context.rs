//! Error context attached to delivery failures.

use chrono::{DateTime, Utc};

/// Context describing where and when a delivery operation failed.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorContext {
    /// Operation that failed, e.g. `market_news` or `fetch_page`.
    pub operation: String,

    /// Response cache key involved, if any.
    pub cache_key: Option<String>,

    /// Timestamp when the error occurred.
    pub timestamp: DateTime<Utc>,

    /// Number of retry attempts made before this error.
    pub retry_count: u32,

    /// Component that issued the request (news panel, search bar, ...).
    pub component: Option<String>,
}

impl ErrorContext {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            cache_key: None,
            timestamp: Utc::now(),
            retry_count: 0,
            component: None,
        }
    }

    pub fn with_cache_key(mut self, key: impl Into<String>) -> Self {
        self.cache_key = Some(key.into());
        self
    }

    pub fn with_retry_count(mut self, count: u32) -> Self {
        self.retry_count = count;
        self
    }

    pub fn with_component(mut self, component: impl Into<String>) -> Self {
        self.component = Some(component.into());
        self
    }

    /// Formatted context string for structured log fields.
    pub fn to_log_string(&self) -> String {
        let mut parts = vec![format!("operation={}", self.operation)];

        if let Some(ref component) = self.component {
            parts.push(format!("component={}", component));
        }

        if let Some(ref key) = self.cache_key {
            parts.push(format!("cache_key={}", key));
        }

        if self.retry_count > 0 {
            parts.push(format!("retry_count={}", self.retry_count));
        }

        parts.push(format!("timestamp={}", self.timestamp.to_rfc3339()));

        parts.join(" ")
    }
}

impl std::fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.operation)?;

        if let Some(ref key) = self.cache_key {
            write!(f, " key={}", key)?;
        }

        if self.retry_count > 0 {
            write!(f, " retry={}", self.retry_count)?;
        }

        Ok(())
    }
}
