//! Cache Store Module
//!
//! Bounded response store combining HashMap lookup with recency-ordered eviction.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::warn;

use crate::cache::{CacheEntry, CacheKey, CacheStats, Recency, RecencyIndex};
use crate::error::CacheError;

/// Result type for store bookkeeping.
pub type StoreResult<T> = std::result::Result<T, CacheError>;

// == Cache Store ==
/// Response storage bounded by `max_entries`.
///
/// Not synchronized; `ResponseCache` wraps it in a lock.
#[derive(Debug)]
pub struct CacheStore {
    /// Key to stored response
    entries: HashMap<CacheKey, CacheEntry>,
    /// Same keys, ordered by last access
    recency: RecencyIndex<CacheKey>,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries kept after an insertion
    max_entries: usize,
    /// Next access sequence number
    next_seq: u64,
}

impl CacheStore {
    // == Constructor ==
    /// Creates an empty store holding at most `max_entries` responses.
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: HashMap::new(),
            recency: RecencyIndex::new(),
            stats: CacheStats::default(),
            max_entries,
            next_seq: 0,
        }
    }

    fn next_recency(&mut self, now: DateTime<Utc>) -> Recency {
        let recency = Recency::new(now, self.next_seq);
        self.next_seq += 1;
        recency
    }

    // == Get ==
    /// Looks up a response and refreshes its recency on a hit.
    ///
    /// Presence is decided by the key alone, so `null`, `0` or empty
    /// responses are hits like any other.
    ///
    /// Returns `Err` if the recency index had lost track of the entry. The
    /// index is repaired before returning.
    pub fn get(&mut self, key: &CacheKey, now: DateTime<Utc>) -> StoreResult<Option<Arc<Value>>> {
        let recency = self.next_recency(now);

        let Some(entry) = self.entries.get_mut(key) else {
            self.stats.record_lookup(false);
            return Ok(None);
        };

        let previous = entry.touch(recency);
        let response = Arc::clone(&entry.response);

        if !self.recency.touch(previous, recency, key.clone()) {
            self.stats.record_lookup(false);
            return Err(CacheError::Internal(format!(
                "recency index lost track of {} {}",
                key.method(),
                key.url()
            )));
        }

        self.stats.record_lookup(true);
        Ok(Some(response))
    }

    // == Insert ==
    /// Stores a response, replacing any entry under the same key, then
    /// enforces the size bound.
    ///
    /// Returns the evicted key, if any. On `Err` the new response is not
    /// kept.
    pub fn insert(
        &mut self,
        key: CacheKey,
        response: Arc<Value>,
        now: DateTime<Utc>,
    ) -> StoreResult<Option<CacheKey>> {
        let recency = self.next_recency(now);

        if let Some(replaced) = self
            .entries
            .insert(key.clone(), CacheEntry::new(response, recency))
        {
            self.recency.remove(&replaced.last_accessed);
        }
        self.recency.insert(recency, key);

        self.evict_if_needed()
    }

    // == Evict ==
    /// Removes least recently accessed entries until the store is within its bound.
    ///
    /// Returns the last key removed. Stale index slots are skipped and do not
    /// count as removals. An `Err` means the index ran dry first; every
    /// indexed key, the newest included, has been removed by then.
    fn evict_if_needed(&mut self) -> StoreResult<Option<CacheKey>> {
        let mut evicted = None;

        while self.entries.len() > self.max_entries {
            let Some((_, key)) = self.recency.pop_oldest() else {
                return Err(CacheError::Internal(format!(
                    "store holds {} entries over a bound of {} but nothing is left to evict",
                    self.entries.len(),
                    self.max_entries
                )));
            };

            if self.entries.remove(&key).is_some() {
                self.stats.record_eviction();
                evicted = Some(key);
            } else {
                warn!(
                    method = %key.method(),
                    url = key.url(),
                    "Skipping stale recency slot during eviction"
                );
            }
        }

        Ok(evicted)
    }

    // == Clear ==
    /// Removes every entry and recency record.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.recency.clear();
    }

    /// Checks for a key without touching its recency.
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Least recently accessed key, if any.
    pub fn oldest(&self) -> Option<&CacheKey> {
        self.recency.peek_oldest().map(|(_, key)| key)
    }

    // == Stats ==
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            total_entries: self.entries.len(),
            ..self.stats.clone()
        }
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
