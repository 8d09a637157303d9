//! Wire types for the dashboard APIs.
//!
//! Schemas are owned by the backend. Fields the client does not need are
//! ignored and optional ones default, so additive server changes are safe.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::image::ImageVariants;

/// One company search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyMatch {
    #[serde(alias = "ticker")]
    pub symbol: String,
    pub name: String,
    #[serde(default)]
    pub exchange: Option<String>,
    #[serde(default)]
    pub sector: Option<String>,
}

/// One market-news article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub id: String,
    #[serde(alias = "title")]
    pub headline: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub images: Option<ImageVariants>,
}

/// Metadata of a simulation document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentInfo {
    #[serde(alias = "id")]
    pub document_id: String,
    #[serde(default)]
    pub title: Option<String>,
    /// e.g. `"processing"` or `"ready"`
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl DocumentInfo {
    pub fn is_ready(&self) -> bool {
        self.status.as_deref() == Some("ready")
    }
}

/// Search responses come back either bare or wrapped.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum Listing<T> {
    Bare(Vec<T>),
    Wrapped {
        #[serde(alias = "items", alias = "articles")]
        results: Vec<T>,
    },
}

impl<T> Listing<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Listing::Bare(items) | Listing::Wrapped { results: items } => items,
        }
    }
}
