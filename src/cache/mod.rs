//! Shared response cache.
//!
//! An explicitly owned store: construct one per app (or per test), share it
//! through an `Arc`, and [`clear`](ResponseCache::clear) it on logout.
//!
//! ## Concurrency
//!
//! At most one fetch is in flight per key. A request that finds a fetch
//! already running awaits that same shared future instead of starting a
//! second network call. The map lock is a `std::sync::Mutex` and is never
//! held across an await.

mod entry;

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt, Shared};
use tracing::debug;

use crate::error::DeliveryResult;
use entry::CacheEntry;

/// Default entry lifetime.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

type SharedFetch<V> = Shared<BoxFuture<'static, DeliveryResult<V>>>;

struct CacheState<V> {
    entries: HashMap<String, CacheEntry<V>>,
    in_flight: HashMap<String, SharedFetch<V>>,
    /// Bumped by `clear` so fetches started before it do not repopulate.
    generation: u64,
}

/// Keyed TTL cache with per-key in-flight de-duplication.
pub struct ResponseCache<V> {
    state: Arc<Mutex<CacheState<V>>>,
    ttl: Duration,
}

impl<V> ResponseCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(CacheState {
                entries: HashMap::new(),
                in_flight: HashMap::new(),
                generation: 0,
            })),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Fresh cached value for `key`, if any. A stale entry is dropped.
    pub fn get(&self, key: &str) -> Option<V> {
        let mut state = self.lock();
        let entry = state.entries.get(key)?;
        if entry.is_fresh(self.ttl) {
            return Some(entry.value.clone());
        }
        state.entries.remove(key);
        None
    }

    /// Return the cached value, join the fetch already in flight, or start
    /// `fetch`.
    ///
    /// `fetch` is only invoked on a miss with nothing in flight. Its success
    /// is stored for the TTL; its failure is handed to every waiter and not
    /// stored. A miss also sweeps every expired entry out of the map.
    pub async fn get_or_fetch<F, Fut>(&self, key: &str, fetch: F) -> DeliveryResult<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = DeliveryResult<V>> + Send + 'static,
    {
        let shared = {
            let mut state = self.lock();

            if let Some(entry) = state.entries.get(key) {
                if entry.is_fresh(self.ttl) {
                    debug!(key, "cache hit");
                    return Ok(entry.value.clone());
                }
            }

            if let Some(in_flight) = state.in_flight.get(key) {
                debug!(key, "joining in-flight fetch");
                in_flight.clone()
            } else {
                debug!(key, "cache miss, fetching");
                let ttl = self.ttl;
                state.entries.retain(|_, entry| entry.is_fresh(ttl));
                let shared = self.spawn_fetch(key, state.generation, fetch());
                state.in_flight.insert(key.to_string(), shared.clone());
                shared
            }
        };

        shared.await
    }

    /// Drop every stored value. Fetches already running still resolve for
    /// their waiters but are not stored.
    pub fn clear(&self) {
        let mut state = self.lock();
        state.entries.clear();
        state.in_flight.clear();
        state.generation += 1;
        debug!("response cache cleared");
    }

    /// Number of stored entries, fresh or not.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn in_flight_count(&self) -> usize {
        self.lock().in_flight.len()
    }

    fn spawn_fetch<Fut>(&self, key: &str, generation: u64, fetch: Fut) -> SharedFetch<V>
    where
        Fut: Future<Output = DeliveryResult<V>> + Send + 'static,
    {
        let state = Arc::clone(&self.state);
        let key = key.to_string();

        async move {
            let result = fetch.await;

            let mut state = state.lock().unwrap_or_else(|e| e.into_inner());
            if state.generation == generation {
                state.in_flight.remove(&key);
                match &result {
                    Ok(value) => {
                        state
                            .entries
                            .insert(key, CacheEntry::new(value.clone()));
                    }
                    Err(err) => debug!(key = %key, "fetch failed, not caching: {}", err),
                }
            }
            result
        }
        .boxed()
        .shared()
    }

    fn lock(&self) -> MutexGuard<'_, CacheState<V>> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl<V> Default for ResponseCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<V> std::fmt::Debug for ResponseCache<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseCache")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}
