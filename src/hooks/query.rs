//! Query handle
//!
//! One consumer's view of a cached query: issues reads through the shared
//! cache and publishes the resulting [`Remote`] state to subscribers.

use crate::cache::{QueryCache, QueryKey};
use crate::remote::Remote;
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

/// Publishes the state of one query key
pub struct QueryHandle<T> {
    cache: Arc<QueryCache>,
    key: QueryKey,
    state: watch::Sender<Remote<T>>,
    latest: AtomicU64,
}

impl<T> QueryHandle<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Handle starting in `Loading`
    pub fn new(cache: Arc<QueryCache>, key: QueryKey) -> Self {
        Self::with_state(cache, key, Remote::Loading)
    }

    /// Handle starting in an explicit state
    pub fn with_state(cache: Arc<QueryCache>, key: QueryKey, initial: Remote<T>) -> Self {
        let (state, _) = watch::channel(initial);
        Self {
            cache,
            key,
            state,
            latest: AtomicU64::new(0),
        }
    }

    /// Latest published state
    pub fn current(&self) -> Remote<T> {
        self.state.borrow().clone()
    }

    /// Receive every state change from now on
    pub fn subscribe(&self) -> watch::Receiver<Remote<T>> {
        self.state.subscribe()
    }

    /// Read the key through the cache and publish the outcome.
    ///
    /// Only the most recently issued refresh may publish; an older one that
    /// resolves later still returns its own outcome to its caller.
    pub async fn refresh<E, F, Fut>(&self, fetcher: F) -> Remote<T>
    where
        E: fmt::Display + Send + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        let seq = self.latest.fetch_add(1, Ordering::SeqCst) + 1;

        // keep showing ready data while it is being refreshed
        if !self.state.borrow().is_ready() {
            self.state.send_replace(Remote::Loading);
        }

        let outcome = match self.cache.fetch(&self.key, fetcher).await {
            Ok(value) => Remote::Ready(value.as_ref().clone()),
            Err(e) => Remote::failed(e.to_string()),
        };

        if self.latest.load(Ordering::SeqCst) == seq {
            self.state.send_replace(outcome.clone());
        } else {
            tracing::debug!(key = %self.key, request = seq, "Dropping superseded query result");
        }

        outcome
    }
}
