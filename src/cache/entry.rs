//! Cache Entry Module
//!
//! Defines a stored response together with its access recency.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;

// == Recency ==
/// When an entry was last accessed.
///
/// Ordered by timestamp first. `seq` is a store-wide monotonic counter that
/// only orders accesses sharing the same timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Recency {
    pub at: DateTime<Utc>,
    pub seq: u64,
}

impl Recency {
    pub fn new(at: DateTime<Utc>, seq: u64) -> Self {
        Self { at, seq }
    }
}

// == Cache Entry ==
/// A response memoized by the cache.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The decoded response exactly as the transport returned it
    pub response: Arc<Value>,
    /// Last read or write of this entry
    pub last_accessed: Recency,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates an entry stamped with the write recency.
    pub fn new(response: Arc<Value>, recency: Recency) -> Self {
        Self {
            response,
            last_accessed: recency,
        }
    }

    // == Touch ==
    /// Records a new access and returns the previous recency.
    pub fn touch(&mut self, recency: Recency) -> Recency {
        std::mem::replace(&mut self.last_accessed, recency)
    }
}
