//! Data Hooks
//!
//! Per-feature wrappers around the query cache. Each one owns a
//! [`QueryHandle`] publishing `Remote<T>` for its views.

mod nft_returns;
mod query;
mod top_depositors;

pub use nft_returns::{NftReturns, INVALIDATED_BY_PROCESSING, NFT_RETURNS_FALLBACK_ERROR};
pub use query::QueryHandle;
pub use top_depositors::{TopDepositors, TOP_DEPOSITORS_FALLBACK_ERROR};

/// Cache key of the deposit ranking
pub const TOP_DEPOSITORS_KEY: &str = "top-depositors";
/// Cache key prefix of a user's NFT returns
pub const NFT_RETURNS_KEY: &str = "nft-returns";
/// Cache key prefix of a user's NFT investments
pub const NFT_INVESTMENTS_KEY: &str = "nft-investments";
/// Cache key prefix of a user's balance
pub const USER_BALANCE_KEY: &str = "user-balance";
