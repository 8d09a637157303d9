//! Dashboard API clients.
//!
//! Thin typed wrappers over the backend's JSON endpoints. Every request goes
//! through [`retry_with_backoff`](crate::retry::retry_with_backoff) and,
//! where the data is shared between panels, the response cache.

mod market;
mod models;
mod simulation;

pub use market::{MarketClient, NewsPages};
pub use models::{CompanyMatch, DocumentInfo, NewsItem};
pub use simulation::{CompletedDocument, ProgressStream, SimulationClient};

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{DeliveryError, DeliveryResult, NetworkError};
use crate::traits::{Headers, HttpClient};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

fn json_headers() -> Headers {
    let mut headers = Headers::new();
    headers.insert("Accept".to_string(), "application/json".to_string());
    headers
}

/// GET `url` and decode a JSON body.
async fn get_json<T: DeserializeOwned>(http: &dyn HttpClient, url: &str) -> DeliveryResult<T> {
    debug!(url, "GET");
    let response = http.get(url, &json_headers()).await?;

    if !response.is_success() {
        let message = response
            .text()
            .unwrap_or_else(|_| "Unknown error".to_string());
        let err = match response.status {
            429 => NetworkError::RateLimited {
                retry_after_secs: response.retry_after_secs(),
            },
            status => NetworkError::HttpStatus { status, message },
        };
        return Err(err.into());
    }

    response.json().map_err(|e| {
        DeliveryError::from(NetworkError::InvalidResponse {
            message: e.to_string(),
        })
    })
}

fn join_url(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}
