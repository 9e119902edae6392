//! Data Service
//!
//! Everything the client needs from the hosted backend, behind one trait so
//! the concrete service can be swapped or mocked.
//!
//! ## Architecture
//!
//! - **DataService**: the four capabilities the client relies on
//! - **SupabaseClient**: implementation over Supabase's REST surface
//! - **models**: rows the service returns

mod error;
mod models;
mod supabase;

pub use error::{BackendError, BackendResult};
pub use models::{DepositUser, Transaction, TransactionKind};
pub use supabase::{
    SupabaseClient, PROCESS_NFT_RETURNS_RPC, SITE_SETTINGS_TABLE, TOP_DEPOSITORS_LIMIT,
    TRANSACTIONS_TABLE, USERS_TABLE,
};

use async_trait::async_trait;

/// Capabilities of the hosted data service
#[async_trait]
pub trait DataService: Send + Sync {
    /// Users ranked by total deposits, highest first
    async fn query_top_depositors(&self) -> BackendResult<Vec<DepositUser>>;

    /// A user's transactions of one kind, newest first
    async fn query_user_transactions(
        &self,
        user_id: &str,
        kind: TransactionKind,
    ) -> BackendResult<Vec<Transaction>>;

    /// Run the NFT return payout procedure and hand back its result
    async fn invoke_process_nft_returns(&self) -> BackendResult<serde_json::Value>;

    /// The image host API key from the settings row; `None` when the field is unset
    async fn get_upload_api_key(&self) -> BackendResult<Option<String>>;
}
