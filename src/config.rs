//! Client configuration.
//!
//! Built with the `with_*` builder methods or read from `ADAPTIVE_*`
//! environment variables. A malformed variable logs a warning and falls
//! back to its default rather than failing startup.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use tracing::warn;

use crate::api::DEFAULT_BASE_URL;
use crate::cache::DEFAULT_TTL;
use crate::recent_searches::RecentSearches;
use crate::retry::RetryPolicy;

pub const ENV_API_URL: &str = "ADAPTIVE_API_URL";
pub const ENV_PAGE_SIZE: &str = "ADAPTIVE_PAGE_SIZE";
pub const ENV_CACHE_TTL_SECS: &str = "ADAPTIVE_CACHE_TTL_SECS";
pub const ENV_MAX_RETRIES: &str = "ADAPTIVE_MAX_RETRIES";
pub const ENV_RETRY_BASE_MS: &str = "ADAPTIVE_RETRY_BASE_MS";
pub const ENV_RETRY_MAX_MS: &str = "ADAPTIVE_RETRY_MAX_MS";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "ADAPTIVE_REQUEST_TIMEOUT_SECS";
pub const ENV_RECENT_SEARCHES: &str = "ADAPTIVE_RECENT_SEARCHES";

pub const DEFAULT_PAGE_SIZE: usize = 30;
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("API URL must start with http:// or https://, got '{0}'")]
    InvalidApiUrl(String),
    #[error("page size must be at least 1")]
    ZeroPageSize,
    #[error("retry base delay ({base_ms}ms) exceeds the cap ({max_ms}ms)")]
    RetryDelayOrder { base_ms: u128, max_ms: u128 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryConfig {
    pub api_url: String,
    /// Page size requested before the strategy caps it.
    pub page_size: usize,
    pub cache_ttl: Duration,
    pub retry: RetryPolicy,
    pub request_timeout: Duration,
    /// `None` means the default under the home directory.
    pub recent_searches_path: Option<PathBuf>,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_BASE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            cache_ttl: DEFAULT_TTL,
            retry: RetryPolicy::default(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            recent_searches_path: None,
        }
    }
}

impl DeliveryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_recent_searches_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.recent_searches_path = Some(path.into());
        self
    }

    /// Read `ADAPTIVE_*` variables from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source. Unset variables keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let api_url = lookup(ENV_API_URL)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.api_url);

        let page_size = parse_var(&lookup, ENV_PAGE_SIZE, defaults.page_size);
        let cache_ttl = Duration::from_secs(parse_var(
            &lookup,
            ENV_CACHE_TTL_SECS,
            defaults.cache_ttl.as_secs(),
        ));
        let retry = RetryPolicy::new(
            parse_var(&lookup, ENV_MAX_RETRIES, defaults.retry.max_retries),
            Duration::from_millis(parse_var(
                &lookup,
                ENV_RETRY_BASE_MS,
                defaults.retry.base_delay.as_millis() as u64,
            )),
            Duration::from_millis(parse_var(
                &lookup,
                ENV_RETRY_MAX_MS,
                defaults.retry.max_delay.as_millis() as u64,
            )),
        );
        let request_timeout = Duration::from_secs(parse_var(
            &lookup,
            ENV_REQUEST_TIMEOUT_SECS,
            defaults.request_timeout.as_secs(),
        ));
        let recent_searches_path = lookup(ENV_RECENT_SEARCHES)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        Self {
            api_url,
            page_size,
            cache_ttl,
            retry,
            request_timeout,
            recent_searches_path,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(ConfigError::InvalidApiUrl(self.api_url.clone()));
        }
        if self.page_size == 0 {
            return Err(ConfigError::ZeroPageSize);
        }
        if self.retry.base_delay > self.retry.max_delay {
            return Err(ConfigError::RetryDelayOrder {
                base_ms: self.retry.base_delay.as_millis(),
                max_ms: self.retry.max_delay.as_millis(),
            });
        }
        Ok(())
    }

    /// Configured recent-searches path, or the default one.
    pub fn recent_searches_path(&self) -> crate::error::DeliveryResult<PathBuf> {
        match &self.recent_searches_path {
            Some(path) => Ok(path.clone()),
            None => RecentSearches::default_path(),
        }
    }
}

fn parse_var<T, F>(lookup: &F, name: &str, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(name) else {
        return default;
    };
    match raw.trim().parse() {
        Ok(value) => value,
        Err(_) => {
            warn!("Invalid {}='{}', using default {}", name, raw, default);
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = DeliveryConfig::default();
        assert_eq!(config.api_url, "http://localhost:8000");
        assert_eq!(config.page_size, 30);
        assert_eq!(config.cache_ttl, Duration::from_secs(300));
        assert_eq!(config.retry, RetryPolicy::default());
        assert_eq!(config.request_timeout, Duration::from_secs(15));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_lookup_reads_values() {
        let config = DeliveryConfig::from_lookup(lookup_from(&[
            (ENV_API_URL, "https://markets.example.com"),
            (ENV_PAGE_SIZE, "50"),
            (ENV_MAX_RETRIES, "5"),
            (ENV_RETRY_BASE_MS, "250"),
            (ENV_RECENT_SEARCHES, "/tmp/recent.json"),
        ]));

        assert_eq!(config.api_url, "https://markets.example.com");
        assert_eq!(config.page_size, 50);
        assert_eq!(config.retry.max_retries, 5);
        assert_eq!(config.retry.base_delay, Duration::from_millis(250));
        assert_eq!(config.retry.max_delay, Duration::from_secs(8));
        assert_eq!(
            config.recent_searches_path,
            Some(PathBuf::from("/tmp/recent.json"))
        );
    }

    #[test]
    fn test_invalid_number_falls_back() {
        let config = DeliveryConfig::from_lookup(lookup_from(&[
            (ENV_PAGE_SIZE, "lots"),
            (ENV_CACHE_TTL_SECS, "-1"),
        ]));
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(config.cache_ttl, DEFAULT_TTL);
    }

    #[test]
    fn test_validate() {
        let bad_url = DeliveryConfig::new().with_api_url("localhost:8000");
        assert!(matches!(
            bad_url.validate(),
            Err(ConfigError::InvalidApiUrl(_))
        ));

        let zero = DeliveryConfig::new().with_page_size(0);
        assert_eq!(zero.validate(), Err(ConfigError::ZeroPageSize));

        let inverted = DeliveryConfig::new().with_retry(RetryPolicy::new(
            3,
            Duration::from_secs(10),
            Duration::from_secs(1),
        ));
        assert!(inverted.validate().is_err());
    }

    #[test]
    fn test_config_error_messages() {
        assert_eq!(
            ConfigError::ZeroPageSize.to_string(),
            "page size must be at least 1"
        );
    }

    #[test]
    fn test_explicit_recent_path() {
        let config = DeliveryConfig::new().with_recent_searches_path("/tmp/r.json");
        assert_eq!(
            config.recent_searches_path().unwrap(),
            PathBuf::from("/tmp/r.json")
        );
    }
}
