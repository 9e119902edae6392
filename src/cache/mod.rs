//! Query Cache
//!
//! Keyed cache in front of the data service. Reads within the freshness
//! window are served from memory, concurrent reads of a key share one
//! request, and mutations invalidate keys by prefix.

mod key;
mod store;

pub use key::QueryKey;
pub use store::{CacheError, QueryCache, DEFAULT_STALE_TIME};
