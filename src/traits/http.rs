//! HTTP seam for the dashboard APIs.
//!
//! Only GET is needed: JSON lookups and the server-push progress stream.
//! API clients are generic over [`HttpClient`] and never see reqwest.

use std::collections::HashMap;
use std::fmt;
use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use serde::de::DeserializeOwned;

/// Header name to value. Names from reqwest arrive lowercased.
pub type Headers = HashMap<String, String>;

/// Body of a streaming GET, chunked as it arrives off the socket.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, HttpError>> + Send>>;

/// A fully buffered response.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    pub headers: Headers,
    pub body: Bytes,
}

impl Response {
    pub fn new(status: u16, body: Bytes) -> Self {
        Self::with_headers(status, Headers::new(), body)
    }

    pub fn with_headers(status: u16, headers: Headers, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// 2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// `Retry-After` in whole seconds. The HTTP-date form is not supported.
    pub fn retry_after_secs(&self) -> Option<u64> {
        self.header("retry-after")
            .and_then(|value| value.trim().parse().ok())
    }

    pub fn text(&self) -> Result<String, std::string::FromUtf8Error> {
        String::from_utf8(self.body.to_vec())
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// Transport-level failure, before any API semantics are applied.
#[derive(Debug, Clone, PartialEq)]
pub enum HttpError {
    ConnectionFailed(String),
    Timeout(String),
    /// Non-2xx status on a streaming request.
    ServerError { status: u16, message: String },
    Cancelled,
    /// The body broke off mid-read.
    Io(String),
    InvalidUrl(String),
    Other(String),
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpError::ConnectionFailed(msg) => write!(f, "could not connect: {}", msg),
            HttpError::Timeout(msg) => write!(f, "timed out: {}", msg),
            HttpError::ServerError { status, message } => {
                write!(f, "HTTP {}: {}", status, message)
            }
            HttpError::Cancelled => f.write_str("request cancelled"),
            HttpError::Io(msg) => write!(f, "body read failed: {}", msg),
            HttpError::InvalidUrl(msg) => write!(f, "bad URL: {}", msg),
            HttpError::Other(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for HttpError {}

/// GET-only HTTP client.
///
/// ```ignore
/// let response = http.get("http://localhost:8000/api/market-news", &Headers::new()).await?;
/// let items: Vec<NewsItem> = response.json()?;
/// ```
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Buffered GET. Any status is returned as a [`Response`]; only
    /// transport failures are errors.
    async fn get(&self, url: &str, headers: &Headers) -> Result<Response, HttpError>;

    /// Streaming GET for the progress event stream. A non-2xx status is
    /// [`HttpError::ServerError`] since there is no body worth streaming.
    async fn get_stream(&self, url: &str, headers: &Headers) -> Result<ByteStream, HttpError>;
}
