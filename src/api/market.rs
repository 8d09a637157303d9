//! Company search and market news.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::models::{CompanyMatch, Listing, NewsItem};
use super::{get_json, join_url};
use crate::cache::ResponseCache;
use crate::domain::ConnectionSnapshot;
use crate::error::{DeliveryError, DeliveryResult, ErrorContext, ResultExt};
use crate::progressive::PageFetcher;
use crate::retry::{retry_with_backoff, RetryPolicy};
use crate::traits::HttpClient;

const DEFAULT_CATEGORY: &str = "general";

/// Client for the market data endpoints.
///
/// News lists are shared between panels through the response cache under
/// `market-news:<category>`, so concurrent panels cost one request.
pub struct MarketClient<C> {
    http: Arc<C>,
    base_url: String,
    retry: RetryPolicy,
    connection: Option<watch::Receiver<ConnectionSnapshot>>,
    cancel: CancellationToken,
    news_cache: Arc<ResponseCache<Vec<NewsItem>>>,
}

impl<C: HttpClient + 'static> MarketClient<C> {
    pub fn new(http: Arc<C>, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            retry: RetryPolicy::default(),
            connection: None,
            cancel: CancellationToken::new(),
            news_cache: Arc::new(ResponseCache::new()),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_connection(mut self, connection: watch::Receiver<ConnectionSnapshot>) -> Self {
        self.connection = Some(connection);
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Share a news cache with other clients.
    pub fn with_news_cache(mut self, cache: Arc<ResponseCache<Vec<NewsItem>>>) -> Self {
        self.news_cache = cache;
        self
    }

    pub fn news_cache(&self) -> &Arc<ResponseCache<Vec<NewsItem>>> {
        &self.news_cache
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Search companies by name or ticker. A blank query returns nothing
    /// without touching the network.
    pub async fn search_companies(&self, query: &str) -> DeliveryResult<Vec<CompanyMatch>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let url = join_url(
            &self.base_url,
            &format!("/api/companies/search?q={}", urlencoding::encode(query)),
        );
        let http: &dyn HttpClient = self.http.as_ref();

        let listing: Listing<CompanyMatch> =
            retry_with_backoff(&self.retry, self.connection.as_ref(), &self.cancel, |_| {
                get_json(http, &url)
            })
            .await
            .with_context(|| ErrorContext::new("search_companies").with_component("market"))?;

        let matches = listing.into_vec();
        debug!(query, count = matches.len(), "company search");
        Ok(matches)
    }

    /// Latest news for `category`, served from the shared cache when fresh.
    pub async fn market_news(&self, category: &str) -> DeliveryResult<Vec<NewsItem>> {
        let category = normalize_category(category);
        let key = format!("market-news:{}", category);
        let url = join_url(
            &self.base_url,
            &format!("/api/market-news?category={}", urlencoding::encode(&category)),
        );

        let http = Arc::clone(&self.http);
        let retry = self.retry;
        let connection = self.connection.clone();

        // Other clients may be waiting on this fetch; only our wait is cancellable.
        let fetch = self.news_cache.get_or_fetch(&key, move || async move {
            let http: &dyn HttpClient = http.as_ref();
            let listing: Listing<NewsItem> =
                retry_with_backoff(&retry, connection.as_ref(), &CancellationToken::new(), |_| {
                    get_json(http, &url)
                })
                .await?;
            Ok(listing.into_vec())
        });

        let result = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(DeliveryError::Cancelled),
            result = fetch => result,
        };

        result.with_context(|| {
            ErrorContext::new("market_news")
                .with_component("market")
                .with_cache_key(key.clone())
        })
    }

    /// One page of news. A single attempt: the progressive loader driving
    /// [`NewsPages`] owns the retries.
    pub async fn news_page(
        &self,
        category: &str,
        offset: usize,
        limit: usize,
    ) -> DeliveryResult<Vec<NewsItem>> {
        let category = normalize_category(category);
        let url = join_url(
            &self.base_url,
            &format!(
                "/api/market-news?category={}&offset={}&limit={}",
                urlencoding::encode(&category),
                offset,
                limit
            ),
        );
        let listing: Listing<NewsItem> = get_json(self.http.as_ref(), &url).await?;
        Ok(listing.into_vec())
    }

    /// Paged view over one news category.
    pub fn news_pages(&self, category: &str) -> NewsPages<'_, C> {
        NewsPages {
            client: self,
            category: normalize_category(category),
        }
    }
}

/// [`PageFetcher`] over a news category.
pub struct NewsPages<'a, C> {
    client: &'a MarketClient<C>,
    category: String,
}

#[async_trait]
impl<C: HttpClient + 'static> PageFetcher<NewsItem> for NewsPages<'_, C> {
    async fn fetch_page(&self, offset: usize, page_size: usize) -> DeliveryResult<Vec<NewsItem>> {
        self.client
            .news_page(&self.category, offset, page_size)
            .await
    }
}

fn normalize_category(category: &str) -> String {
    let category = category.trim().to_ascii_lowercase();
    if category.is_empty() {
        DEFAULT_CATEGORY.to_string()
    } else {
        category
    }
}
