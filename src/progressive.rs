//! Progressive paged fetching.
//!
//! [`ProgressiveLoader`] pulls a paged source to completion one page at a
//! time, publishing the accumulated items after every page. Pages are
//! fetched strictly in sequence so partial results can only grow, in page
//! order. Each page gets its own retry budget; a page that still fails
//! halts the run.

use async_trait::async_trait;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::domain::ConnectionSnapshot;
use crate::error::{DeliveryError, DeliveryResult};
use crate::policy::LoadingStrategy;
use crate::retry::{retry_with_backoff, RetryPolicy};

/// A paged data source.
#[async_trait]
pub trait PageFetcher<T>: Send + Sync {
    /// Fetch up to `page_size` items starting at `offset`. Fewer than
    /// `page_size` items means the source is exhausted.
    async fn fetch_page(&self, offset: usize, page_size: usize) -> DeliveryResult<Vec<T>>;
}

/// What a consumer renders for a progressive load.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Loading { partial: Vec<T> },
    Failed { error: DeliveryError, partial: Vec<T> },
    Ready(Vec<T>),
}

impl<T> LoadState<T> {
    pub fn items(&self) -> &[T] {
        match self {
            LoadState::Loading { partial } | LoadState::Failed { partial, .. } => partial,
            LoadState::Ready(items) => items,
        }
    }

    pub fn error(&self) -> Option<&DeliveryError> {
        match self {
            LoadState::Failed { error, .. } => Some(error),
            _ => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, LoadState::Ready(_))
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading { .. })
    }
}

impl<T> Default for LoadState<T> {
    fn default() -> Self {
        LoadState::Loading {
            partial: Vec::new(),
        }
    }
}

/// Drives a [`PageFetcher`] to completion.
#[derive(Debug, Clone)]
pub struct ProgressiveLoader {
    policy: RetryPolicy,
    connection: Option<watch::Receiver<ConnectionSnapshot>>,
    cancel: CancellationToken,
}

impl ProgressiveLoader {
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            connection: None,
            cancel: CancellationToken::new(),
        }
    }

    /// Check the connection before each scheduled retry.
    pub fn with_connection(mut self, connection: watch::Receiver<ConnectionSnapshot>) -> Self {
        self.connection = Some(connection);
        self
    }

    /// Token whose cancellation means the consumer is gone.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Fetch pages of `strategy.chunk_size` items until a short page, or
    /// until `total_items_hint` worth of pages have arrived.
    ///
    /// `on_partial` receives the accumulated items once per page, in page
    /// order. It is never called after cancellation.
    pub async fn run<T, P, F>(
        &self,
        fetcher: &P,
        total_items_hint: Option<usize>,
        strategy: &LoadingStrategy,
        mut on_partial: F,
    ) -> DeliveryResult<Vec<T>>
    where
        P: PageFetcher<T> + ?Sized,
        F: FnMut(&[T]),
    {
        let page_size = strategy.chunk_size.max(1);
        let max_pages = total_items_hint.map(|hint| hint.div_ceil(page_size));
        let mut items: Vec<T> = Vec::new();
        let mut page = 0usize;

        debug!(page_size, ?max_pages, "progressive load started");

        loop {
            if max_pages.is_some_and(|max| page >= max) {
                break;
            }

            let offset = page * page_size;
            let batch = retry_with_backoff(
                &self.policy,
                self.connection.as_ref(),
                &self.cancel,
                |_| fetcher.fetch_page(offset, page_size),
            )
            .await?;

            if self.cancel.is_cancelled() {
                return Err(DeliveryError::Cancelled);
            }

            let short_page = batch.len() < page_size;
            items.extend(batch);
            page += 1;
            on_partial(&items);

            if short_page {
                break;
            }
        }

        info!("Progressive load finished: {} items in {} pages", items.len(), page);
        Ok(items)
    }

    /// Like [`run`](Self::run), but reports every transition as a
    /// [`LoadState`] and returns the final one.
    pub async fn load<T, P, F>(
        &self,
        fetcher: &P,
        total_items_hint: Option<usize>,
        strategy: &LoadingStrategy,
        mut on_state: F,
    ) -> LoadState<T>
    where
        T: Clone,
        P: PageFetcher<T> + ?Sized,
        F: FnMut(&LoadState<T>),
    {
        let mut partial: Vec<T> = Vec::new();
        on_state(&LoadState::default());

        let result = self
            .run(fetcher, total_items_hint, strategy, |items| {
                partial = items.to_vec();
                on_state(&LoadState::Loading {
                    partial: partial.clone(),
                });
            })
            .await;

        let state = match result {
            Ok(items) => LoadState::Ready(items),
            Err(error) => LoadState::Failed { error, partial },
        };
        if !self.cancel.is_cancelled() {
            on_state(&state);
        }
        state
    }
}
