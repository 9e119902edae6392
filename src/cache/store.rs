//! Keyed query cache
//!
//! Holds the last value of every query, shares in-flight requests between
//! callers asking for the same key, and lets mutations mark keys stale.

use super::key::QueryKey;
use futures_util::future::{BoxFuture, FutureExt, Shared};
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::Mutex;

/// Default freshness window
pub const DEFAULT_STALE_TIME: Duration = Duration::from_secs(30);

type CachedValue = Arc<dyn Any + Send + Sync>;
type SharedFetch = Shared<BoxFuture<'static, Result<CachedValue, String>>>;

/// Errors surfaced by [`QueryCache::fetch`]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CacheError {
    /// The fetcher failed; `message` is its rendered error
    #[error("{message}")]
    Fetch { key: QueryKey, message: String },

    /// A key was read back as a different type than it was stored with
    #[error("Cached value for {0} has a different type")]
    TypeMismatch(QueryKey),
}

#[derive(Default)]
struct Entry {
    value: Option<(CachedValue, Instant)>,
    stale: bool,
    in_flight: Option<(u64, SharedFetch)>,
}

impl Entry {
    fn fresh_value(&self, stale_time: Duration) -> Option<CachedValue> {
        match &self.value {
            Some((value, at)) if !self.stale && at.elapsed() < stale_time => Some(value.clone()),
            _ => None,
        }
    }
}

/// Query cache shared by every data hook of an application
pub struct QueryCache {
    entries: Mutex<HashMap<QueryKey, Entry>>,
    invalidations: Mutex<HashMap<QueryKey, u32>>,
    stale_time: Duration,
    next_request: AtomicU64,
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new(DEFAULT_STALE_TIME)
    }
}

impl fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryCache")
            .field("stale_time", &self.stale_time)
            .finish_non_exhaustive()
    }
}

impl QueryCache {
    /// Create a cache whose entries stay fresh for `stale_time`
    pub fn new(stale_time: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            invalidations: Mutex::new(HashMap::new()),
            stale_time,
            next_request: AtomicU64::new(1),
        }
    }

    /// Read `key` through the cache.
    ///
    /// A fresh value is returned without calling `fetcher`. While a fetch for
    /// the key is in flight every caller awaits that same fetch. Failures are
    /// returned to all waiters and are not cached.
    pub async fn fetch<T, E, F, Fut>(&self, key: &QueryKey, fetcher: F) -> Result<Arc<T>, CacheError>
    where
        T: Send + Sync + 'static,
        E: fmt::Display + Send + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        let (request_id, fetch) = {
            let mut entries = self.entries.lock().await;
            let entry = entries.entry(key.clone()).or_default();

            if let Some(value) = entry.fresh_value(self.stale_time) {
                tracing::trace!(key = %key, "Query cache hit");
                return downcast(key, value);
            }

            let joined = entry
                .in_flight
                .as_ref()
                .map(|(id, fetch)| (*id, fetch.clone()));

            match joined {
                Some((id, fetch)) => {
                    tracing::trace!(key = %key, request = id, "Joining in-flight query");
                    (id, fetch)
                }
                None => {
                    let id = self.next_request.fetch_add(1, Ordering::Relaxed);
                    tracing::debug!(key = %key, request = id, "Issuing query");

                    let pending = fetcher();
                    let fetch = async move {
                        pending
                            .await
                            .map(|value| Arc::new(value) as CachedValue)
                            .map_err(|e| e.to_string())
                    }
                    .boxed()
                    .shared();

                    entry.in_flight = Some((id, fetch.clone()));
                    (id, fetch)
                }
            }
        };

        let result = fetch.await;

        {
            let mut entries = self.entries.lock().await;
            if let Some(entry) = entries.get_mut(key) {
                let current = matches!(&entry.in_flight, Some((id, _)) if *id == request_id);
                if current {
                    entry.in_flight = None;
                    if let Ok(value) = &result {
                        entry.value = Some((value.clone(), Instant::now()));
                        entry.stale = false;
                    }
                }
            }
        }

        match result {
            Ok(value) => downcast(key, value),
            Err(message) => Err(CacheError::Fetch {
                key: key.clone(),
                message,
            }),
        }
    }

    /// Cached value for `key`, fresh or not, without fetching
    pub async fn peek<T: Send + Sync + 'static>(&self, key: &QueryKey) -> Option<Arc<T>> {
        let entries = self.entries.lock().await;
        let (value, _) = entries.get(key)?.value.as_ref()?;
        value.clone().downcast::<T>().ok()
    }

    /// Mark every key starting with `prefix` stale so the next read refetches.
    ///
    /// Fetches already in flight for those keys are detached: their results
    /// still reach their callers but are not stored.
    pub async fn invalidate(&self, prefix: &QueryKey) {
        let mut affected = 0usize;
        {
            let mut entries = self.entries.lock().await;
            for (key, entry) in entries.iter_mut() {
                if key.starts_with(prefix) {
                    entry.stale = true;
                    entry.in_flight = None;
                    affected += 1;
                }
            }
        }

        *self
            .invalidations
            .lock()
            .await
            .entry(prefix.clone())
            .or_insert(0) += 1;

        tracing::debug!(prefix = %prefix, affected, "Invalidated queries");
    }

    /// How many times `prefix` has been passed to [`QueryCache::invalidate`]
    pub async fn invalidation_count(&self, prefix: &QueryKey) -> u32 {
        self.invalidations
            .lock()
            .await
            .get(prefix)
            .copied()
            .unwrap_or(0)
    }

    /// True when `key` holds no value or its value must be refetched
    pub async fn is_stale(&self, key: &QueryKey) -> bool {
        let entries = self.entries.lock().await;
        entries
            .get(key)
            .map(|entry| entry.fresh_value(self.stale_time).is_none())
            .unwrap_or(true)
    }
}

fn downcast<T: Send + Sync + 'static>(key: &QueryKey, value: CachedValue) -> Result<Arc<T>, CacheError> {
    value
        .downcast::<T>()
        .map_err(|_| CacheError::TypeMismatch(key.clone()))
}
