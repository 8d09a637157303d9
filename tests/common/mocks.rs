//! Scripted paged source for progressive-loading tests.

use std::sync::Mutex;
use std::time::Duration;

use adaptive_delivery::error::DeliveryResult;
use adaptive_delivery::progressive::PageFetcher;
use async_trait::async_trait;
use tokio::time::Instant;

use super::transient_error;

/// One recorded `fetch_page` call.
#[derive(Debug, Clone, Copy)]
pub struct PageCall {
    pub offset: usize,
    pub page_size: usize,
    pub at: Instant,
}

type CallPredicate = Box<dyn Fn(usize) -> bool + Send + Sync>;
type CallHook = Box<dyn Fn(usize) + Send + Sync>;

/// Serves `0..total` as `u32` items. Calls are numbered from zero across
/// the whole run, retries included.
pub struct ScriptedPages {
    total: usize,
    fail_when: CallPredicate,
    on_call: Option<CallHook>,
    latency: Option<Duration>,
    calls: Mutex<Vec<PageCall>>,
}

impl ScriptedPages {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            fail_when: Box::new(|_| false),
            on_call: None,
            latency: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// The first `n` calls fail with a transient error.
    pub fn with_failures(mut self, n: usize) -> Self {
        self.fail_when = Box::new(move |call| call < n);
        self
    }

    /// Every call fails.
    pub fn always_failing(mut self) -> Self {
        self.fail_when = Box::new(|_| true);
        self
    }

    /// Calls from number `n` onwards fail.
    pub fn failing_from(mut self, n: usize) -> Self {
        self.fail_when = Box::new(move |call| call >= n);
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Run `hook` with the call number before each call resolves.
    pub fn with_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(usize) + Send + Sync + 'static,
    {
        self.on_call = Some(Box::new(hook));
        self
    }

    pub fn calls(&self) -> Vec<PageCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Time between consecutive calls.
    pub fn gaps(&self) -> Vec<Duration> {
        self.calls()
            .windows(2)
            .map(|pair| pair[1].at - pair[0].at)
            .collect()
    }
}

#[async_trait]
impl PageFetcher<u32> for ScriptedPages {
    async fn fetch_page(&self, offset: usize, page_size: usize) -> DeliveryResult<Vec<u32>> {
        let call = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(PageCall {
                offset,
                page_size,
                at: Instant::now(),
            });
            calls.len() - 1
        };

        if let Some(hook) = &self.on_call {
            hook(call);
        }
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if (self.fail_when)(call) {
            return Err(transient_error());
        }

        let end = (offset + page_size).min(self.total);
        Ok((offset.min(end)..end).map(|i| i as u32).collect())
    }
}
