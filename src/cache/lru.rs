//! Recency Index Module
//!
//! Orders cached keys by their last access for least-recently-accessed eviction.

use std::collections::BTreeMap;

use super::entry::Recency;

// == Recency Index ==
/// Keys ordered by access recency.
///
/// The first entry is the least recently accessed key. Each `Recency` is unique
/// because its sequence number is, so every key occupies exactly one slot.
#[derive(Debug)]
pub struct RecencyIndex<K> {
    order: BTreeMap<Recency, K>,
}

impl<K> Default for RecencyIndex<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> RecencyIndex<K> {
    // == Constructor ==
    pub fn new() -> Self {
        Self {
            order: BTreeMap::new(),
        }
    }

    // == Insert ==
    /// Places a key at the given recency.
    pub fn insert(&mut self, recency: Recency, key: K) {
        self.order.insert(recency, key);
    }

    // == Touch ==
    /// Moves a key from its previous recency to a newer one.
    ///
    /// Returns false when nothing was recorded at `previous`, which means the
    /// index had drifted from the store. The key is placed at `current` anyway.
    pub fn touch(&mut self, previous: Recency, current: Recency, key: K) -> bool {
        let found = self.order.remove(&previous).is_some();
        self.order.insert(current, key);
        found
    }

    // == Remove ==
    pub fn remove(&mut self, recency: &Recency) -> Option<K> {
        self.order.remove(recency)
    }

    // == Pop Oldest ==
    /// Removes and returns the least recently accessed key.
    pub fn pop_oldest(&mut self) -> Option<(Recency, K)> {
        self.order.pop_first()
    }

    // == Peek Oldest ==
    pub fn peek_oldest(&self) -> Option<(&Recency, &K)> {
        self.order.first_key_value()
    }

    pub fn clear(&mut self) {
        self.order.clear();
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
