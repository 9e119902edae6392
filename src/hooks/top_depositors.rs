//! Top depositors ranking

use super::query::QueryHandle;
use super::TOP_DEPOSITORS_KEY;
use crate::backend::{DataService, DepositUser, TOP_DEPOSITORS_LIMIT};
use crate::cache::{QueryCache, QueryKey};
use crate::remote::Remote;
use std::sync::Arc;
use tokio::sync::watch;

/// Shown when the service fails without a message of its own
pub const TOP_DEPOSITORS_FALLBACK_ERROR: &str = "Failed to load top depositors";

/// The highest-depositing users, in the order the service ranks them
pub struct TopDepositors {
    backend: Arc<dyn DataService>,
    handle: QueryHandle<Vec<DepositUser>>,
}

impl TopDepositors {
    pub fn new(cache: Arc<QueryCache>, backend: Arc<dyn DataService>) -> Self {
        Self {
            backend,
            handle: QueryHandle::new(cache, QueryKey::resource(TOP_DEPOSITORS_KEY)),
        }
    }

    /// Fetch (or reuse) the ranking and publish it
    pub async fn load(&self) -> Remote<Vec<DepositUser>> {
        let backend = self.backend.clone();
        self.handle
            .refresh(move || async move {
                match backend.query_top_depositors().await {
                    Ok(mut users) => {
                        users.truncate(TOP_DEPOSITORS_LIMIT);
                        Ok(users)
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to fetch top depositors");
                        Err(e.message_or(TOP_DEPOSITORS_FALLBACK_ERROR))
                    }
                }
            })
            .await
    }

    pub fn state(&self) -> Remote<Vec<DepositUser>> {
        self.handle.current()
    }

    pub fn subscribe(&self) -> watch::Receiver<Remote<Vec<DepositUser>>> {
        self.handle.subscribe()
    }
}
