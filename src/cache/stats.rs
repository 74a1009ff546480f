//! Cache Statistics Module
//!
//! Counts how often the API was spared a request.

use serde::Serialize;

/// Snapshot of cache effectiveness.
///
/// Every lookup is either a hit (answered from memory) or a miss (the
/// transport was called). Failed transport calls still count as misses.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Responses dropped to stay within the bound
    pub evictions: u64,
    /// Responses held when the snapshot was taken
    pub total_entries: usize,
}

impl CacheStats {
    pub fn lookups(&self) -> u64 {
        self.hits + self.misses
    }

    /// Share of lookups served without a request, `None` before the first lookup.
    pub fn hit_rate(&self) -> Option<f64> {
        match self.lookups() {
            0 => None,
            lookups => Some(self.hits as f64 / lookups as f64),
        }
    }

    pub(crate) fn record_lookup(&mut self, hit: bool) {
        if hit {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
    }

    pub(crate) fn record_eviction(&mut self) {
        self.evictions += 1;
    }
}
