//! Simulation document loading and its progress stream.

use std::collections::VecDeque;
use std::pin::Pin;
use std::sync::Arc;

use futures::{stream, Stream, StreamExt};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::models::DocumentInfo;
use super::{get_json, join_url};
use crate::domain::ConnectionSnapshot;
use crate::error::{DeliveryError, DeliveryResult, ErrorContext, ResultExt, StreamError};
use crate::retry::{retry_with_backoff, RetryPolicy};
use crate::sse::{ProgressEvent, SseParseError, SseParser};
use crate::traits::{ByteStream, Headers, HttpClient};

/// Progress events for one document. Pings are filtered out; the stream
/// ends after `complete` or `error`, or with a [`StreamError`] when the
/// connection drops first.
pub type ProgressStream = Pin<Box<dyn Stream<Item = DeliveryResult<ProgressEvent>> + Send>>;

/// Final outcome of a document load.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedDocument {
    pub document_id: String,
    pub url: Option<String>,
}

pub struct SimulationClient<C> {
    http: Arc<C>,
    base_url: String,
    retry: RetryPolicy,
    connection: Option<watch::Receiver<ConnectionSnapshot>>,
    cancel: CancellationToken,
}

impl<C: HttpClient + 'static> SimulationClient<C> {
    pub fn new(http: Arc<C>, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            retry: RetryPolicy::default(),
            connection: None,
            cancel: CancellationToken::new(),
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

    /// Fetch document metadata.
    pub async fn load_document(&self, document_id: &str) -> DeliveryResult<DocumentInfo> {
        let url = self.document_url(document_id, "");
        let http: &dyn HttpClient = self.http.as_ref();

        retry_with_backoff(&self.retry, self.connection.as_ref(), &self.cancel, |_| {
            get_json(http, &url)
        })
        .await
        .with_context(|| ErrorContext::new("load_document").with_component("simulation"))
    }

    /// Subscribe to the document's progress events.
    pub async fn progress_stream(&self, document_id: &str) -> DeliveryResult<ProgressStream> {
        let url = self.document_url(document_id, "/progress");
        let bytes = self
            .http
            .get_stream(&url, &Headers::new())
            .await
            .with_context(|| ErrorContext::new("progress_stream").with_component("simulation"))?;

        debug!(document_id, "progress stream opened");
        Ok(progress_events(bytes))
    }

    /// Follow the progress stream until the document is ready.
    ///
    /// `on_progress` sees every progress update. A backend `error` event
    /// becomes [`StreamError::BackendError`]; a stream that ends without a
    /// terminal event becomes [`StreamError::ServerClosed`].
    pub async fn wait_for_document<F>(
        &self,
        document_id: &str,
        mut on_progress: F,
    ) -> DeliveryResult<CompletedDocument>
    where
        F: FnMut(f32, Option<&str>),
    {
        let mut events = self.progress_stream(document_id).await?;

        loop {
            let next = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return Err(DeliveryError::Cancelled),
                next = events.next() => next,
            };

            match next {
                Some(Ok(ProgressEvent::Progress { percent, stage })) => {
                    on_progress(percent, stage.as_deref());
                }
                Some(Ok(ProgressEvent::Complete { document_id, url })) => {
                    info!(document_id = %document_id, "document ready");
                    return Ok(CompletedDocument { document_id, url });
                }
                Some(Ok(ProgressEvent::Error { message })) => {
                    warn!(document_id, "document load failed: {}", message);
                    return Err(StreamError::BackendError { message }.into());
                }
                Some(Ok(ProgressEvent::Ping)) => {}
                Some(Err(err)) => return Err(err),
                None => return Err(StreamError::ServerClosed { reason: None }.into()),
            }
        }
    }

    fn document_url(&self, document_id: &str, suffix: &str) -> String {
        join_url(
            &self.base_url,
            &format!(
                "/api/simulation/documents/{}{}",
                urlencoding::encode(document_id),
                suffix
            ),
        )
    }
}

struct StreamState {
    bytes: ByteStream,
    parser: SseParser,
    queued: VecDeque<Result<ProgressEvent, SseParseError>>,
    eof: bool,
    finished: bool,
}

/// Turn a raw SSE byte stream into progress events.
fn progress_events(bytes: ByteStream) -> ProgressStream {
    let state = StreamState {
        bytes,
        parser: SseParser::new(),
        queued: VecDeque::new(),
        eof: false,
        finished: false,
    };

    let events = stream::unfold(state, |mut state| async move {
        loop {
            if state.finished {
                return None;
            }

            if let Some(item) = state.queued.pop_front() {
                match item {
                    Ok(ProgressEvent::Ping) => continue,
                    Ok(event) => {
                        state.finished = event.is_terminal();
                        return Some((Ok(event), state));
                    }
                    Err(e) => {
                        let err = DeliveryError::from(StreamError::from(e));
                        return Some((Err(err), state));
                    }
                }
            }

            if state.eof {
                state.finished = true;
                let err = DeliveryError::from(StreamError::ServerClosed { reason: None });
                return Some((Err(err), state));
            }

            match state.bytes.next().await {
                Some(Ok(chunk)) => {
                    let parsed = state.parser.feed_bytes(&chunk);
                    state.queued.extend(parsed);
                }
                Some(Err(e)) => {
                    state.finished = true;
                    let err = DeliveryError::from(StreamError::ConnectionLost {
                        message: e.to_string(),
                    });
                    return Some((Err(err), state));
                }
                None => {
                    // Flush a final event the server did not blank-line terminate
                    state.eof = true;
                    let parsed = state.parser.feed_bytes(b"\n\n");
                    state.queued.extend(parsed);
                }
            }
        }
    });

    Box::pin(events)
}
