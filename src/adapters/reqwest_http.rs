//! [`HttpClient`] over reqwest.

use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::header::{HeaderMap, ACCEPT};
use reqwest::{Client, RequestBuilder};

use crate::traits::{ByteStream, Headers, HttpClient, HttpError, Response};

const EVENT_STREAM: &str = "text/event-stream";

/// Production HTTP client. Cheap to clone; clones share one connection pool.
///
/// ```ignore
/// let http = Arc::new(ReqwestHttpClient::with_timeout(Duration::from_secs(15)));
/// let market = MarketClient::new(http, "http://localhost:8000");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ReqwestHttpClient {
    client: Client,
    request_timeout: Option<Duration>,
}

impl ReqwestHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// `timeout` bounds connecting and every buffered GET. Progress streams
    /// are only bounded while connecting; they stay open as long as the
    /// server keeps them open.
    pub fn with_timeout(timeout: Duration) -> Self {
        let client = match Client::builder().connect_timeout(timeout).build() {
            Ok(client) => client,
            Err(e) => {
                tracing::warn!("Could not apply connect timeout, using defaults: {}", e);
                Client::new()
            }
        };
        Self {
            client,
            request_timeout: Some(timeout),
        }
    }

    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            request_timeout: None,
        }
    }

    pub fn inner(&self) -> &Client {
        &self.client
    }

    fn request(&self, url: &str, headers: &Headers) -> RequestBuilder {
        headers
            .iter()
            .fold(self.client.get(url), |builder, (name, value)| {
                builder.header(name.as_str(), value.as_str())
            })
    }
}

fn transport_error(err: reqwest::Error) -> HttpError {
    let message = err.to_string();
    if err.is_timeout() {
        HttpError::Timeout(message)
    } else if err.is_connect() {
        HttpError::ConnectionFailed(message)
    } else if err.is_builder() {
        HttpError::InvalidUrl(message)
    } else if err.is_body() || err.is_decode() {
        HttpError::Io(message)
    } else {
        HttpError::Other(message)
    }
}

fn to_headers(map: &HeaderMap) -> Headers {
    map.iter()
        .filter_map(|(name, value)| Some((name.to_string(), value.to_str().ok()?.to_string())))
        .collect()
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn get(&self, url: &str, headers: &Headers) -> Result<Response, HttpError> {
        let mut request = self.request(url, headers);
        if let Some(timeout) = self.request_timeout {
            request = request.timeout(timeout);
        }
        let response = request.send().await.map_err(transport_error)?;

        let status = response.status().as_u16();
        let headers = to_headers(response.headers());
        let body = response.bytes().await.map_err(transport_error)?;

        Ok(Response::with_headers(status, headers, body))
    }

    async fn get_stream(&self, url: &str, headers: &Headers) -> Result<ByteStream, HttpError> {
        let response = self
            .request(url, headers)
            .header(ACCEPT, EVENT_STREAM)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(HttpError::ServerError {
                status: status.as_u16(),
                message,
            });
        }

        let chunks = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(transport_error));
        Ok(Box::pin(chunks))
    }
}
