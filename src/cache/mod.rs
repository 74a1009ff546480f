//! Cache Module
//!
//! Memoizes API responses keyed by method, URL and parameters, bounded in size
//! and evicting the least recently accessed entry when full.

mod clock;
mod entry;
mod key;
mod lru;
mod response_cache;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::{CacheEntry, Recency};
pub use key::{canonical_params, canonicalize, CacheKey};
pub use lru::RecencyIndex;
pub use response_cache::ResponseCache;
pub use stats::CacheStats;
pub use store::{CacheStore, StoreResult};

// == Public Constants ==
/// Number of responses kept when no other bound is configured
pub const DEFAULT_MAX_CACHED_REQUESTS: usize = 100;
