//! NFT returns
//!
//! A user's NFT return transactions plus the procedure that pays out due
//! returns.

use super::query::QueryHandle;
use super::{NFT_INVESTMENTS_KEY, NFT_RETURNS_KEY, USER_BALANCE_KEY};
use crate::backend::{BackendResult, DataService, Transaction, TransactionKind};
use crate::cache::{QueryCache, QueryKey};
use crate::remote::Remote;
use std::sync::Arc;
use tokio::sync::watch;

/// Shown when the service fails without a message of its own
pub const NFT_RETURNS_FALLBACK_ERROR: &str = "Failed to load NFT returns";

/// Keys whose data changes when returns are processed
pub const INVALIDATED_BY_PROCESSING: [&str; 3] =
    [NFT_INVESTMENTS_KEY, NFT_RETURNS_KEY, USER_BALANCE_KEY];

/// NFT return transactions of the acting user, newest first
pub struct NftReturns {
    cache: Arc<QueryCache>,
    backend: Arc<dyn DataService>,
    user_id: Option<String>,
    handle: QueryHandle<Vec<Transaction>>,
}

impl NftReturns {
    /// Without a user the read is disabled and the state is an empty list.
    pub fn new(
        cache: Arc<QueryCache>,
        backend: Arc<dyn DataService>,
        user_id: Option<String>,
    ) -> Self {
        let mut key = QueryKey::resource(NFT_RETURNS_KEY);
        let initial = match &user_id {
            Some(id) => {
                key = key.with(id.clone());
                Remote::Loading
            }
            None => Remote::Ready(Vec::new()),
        };

        Self {
            handle: QueryHandle::with_state(cache.clone(), key, initial),
            cache,
            backend,
            user_id,
        }
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// Whether reads are issued at all
    pub fn is_enabled(&self) -> bool {
        self.user_id.is_some()
    }

    /// Fetch (or reuse) the user's returns and publish them
    pub async fn load(&self) -> Remote<Vec<Transaction>> {
        let Some(user_id) = self.user_id.clone() else {
            tracing::debug!("No acting user, NFT returns query disabled");
            return self.handle.current();
        };

        let backend = self.backend.clone();
        self.handle
            .refresh(move || async move {
                backend
                    .query_user_transactions(&user_id, TransactionKind::NftReturn)
                    .await
                    .map_err(|e| {
                        tracing::error!(user_id = %user_id, error = %e, "Failed to fetch NFT returns");
                        e.message_or(NFT_RETURNS_FALLBACK_ERROR)
                    })
            })
            .await
    }

    pub fn state(&self) -> Remote<Vec<Transaction>> {
        self.handle.current()
    }

    pub fn subscribe(&self) -> watch::Receiver<Remote<Vec<Transaction>>> {
        self.handle.subscribe()
    }

    /// Run the payout procedure.
    ///
    /// On success the investment, return and balance queries of every user
    /// are invalidated and the procedure's result is returned. Failures are
    /// logged and handed back to the caller.
    pub async fn process_returns(&self) -> BackendResult<serde_json::Value> {
        match self.backend.invoke_process_nft_returns().await {
            Ok(result) => {
                for name in INVALIDATED_BY_PROCESSING {
                    self.cache.invalidate(&QueryKey::resource(name)).await;
                }
                tracing::info!("Processed NFT returns");
                Ok(result)
            }
            Err(e) => {
                tracing::error!(error = %e, "Error processing NFT returns");
                Err(e)
            }
        }
    }
}
