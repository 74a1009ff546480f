//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check key derivation, the size bound and recency eviction
//! against a simple reference model.

use proptest::prelude::*;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde_json::{json, Map, Value};

use crate::cache::{CacheKey, CacheStore, ResponseCache};
use crate::error::TransportError;
use crate::transport::{Encoding, Transport};

const URL: &str = "http://erp/api/index.php/thirdparties";

// == Test Transport ==
#[derive(Debug, Default)]
struct CountingTransport {
    calls: AtomicUsize,
}

#[async_trait]
impl Transport for CountingTransport {
    async fn send(
        &self,
        _method: &Method,
        url: &str,
        params: &Value,
        _encoding: Encoding,
    ) -> Result<Value, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(json!({ "url": url, "params": params }))
    }
}

// == Strategies ==
fn param_map_strategy() -> impl Strategy<Value = BTreeMap<String, i64>> {
    prop::collection::btree_map("[a-z_]{1,12}", any::<i64>(), 0..10)
}

fn method_strategy() -> impl Strategy<Value = Method> {
    prop_oneof![
        Just(Method::GET),
        Just(Method::POST),
        Just(Method::PUT),
        Just(Method::DELETE),
    ]
}

/// Store operations over a small key space so hits and evictions are frequent.
#[derive(Debug, Clone)]
enum StoreOp {
    Insert(u8),
    Get(u8),
}

fn store_op_strategy() -> impl Strategy<Value = StoreOp> {
    prop_oneof![
        (0u8..12).prop_map(StoreOp::Insert),
        (0u8..12).prop_map(StoreOp::Get),
    ]
}

fn key_for(id: u8) -> CacheKey {
    CacheKey::from_value(&Method::GET, URL, &json!({ "id": id }))
}

fn tick(n: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(n, 0).unwrap_or_default()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Same pairs in any insertion order give the same key.
    #[test]
    fn prop_key_ignores_insertion_order(
        method in method_strategy(),
        pairs in param_map_strategy()
    ) {
        let hashed: HashMap<String, i64> = pairs.clone().into_iter().collect();

        let mut reversed = Map::new();
        for (k, v) in pairs.iter().rev() {
            reversed.insert(k.clone(), json!(v));
        }

        let k1 = CacheKey::new(&method, URL, &pairs).unwrap();
        let k2 = CacheKey::new(&method, URL, &hashed).unwrap();
        let k3 = CacheKey::new(&method, URL, &reversed).unwrap();
        prop_assert_eq!(&k1, &k2);
        prop_assert_eq!(&k1, &k3);
    }

    // Changing any single parameter value changes the key.
    #[test]
    fn prop_key_distinct_on_value_change(
        pairs in param_map_strategy().prop_filter("needs a parameter", |m| !m.is_empty()),
        pick in any::<prop::sample::Index>()
    ) {
        let name = pairs.keys().nth(pick.index(pairs.len())).cloned().unwrap();
        let mut changed = pairs.clone();
        changed.entry(name).and_modify(|v| *v = v.wrapping_add(1));

        let k1 = CacheKey::new(&Method::GET, URL, &pairs).unwrap();
        let k2 = CacheKey::new(&Method::GET, URL, &changed).unwrap();
        prop_assert_ne!(k1, k2);
    }

    // Method and URL both take part in the key.
    #[test]
    fn prop_key_distinct_on_method_or_url(
        pairs in param_map_strategy(),
        path in "[a-z]{1,10}"
    ) {
        let get = CacheKey::new(&Method::GET, URL, &pairs).unwrap();
        let post = CacheKey::new(&Method::POST, URL, &pairs).unwrap();
        let other = CacheKey::new(&Method::GET, &format!("{}/{}", URL, path), &pairs).unwrap();
        prop_assert_ne!(&get, &post);
        prop_assert_ne!(&get, &other);
    }

    // Inserting max + k distinct keys leaves exactly max entries.
    #[test]
    fn prop_bound_invariant(max in 1usize..20, extra in 1usize..30) {
        let mut store = CacheStore::new(max);
        for i in 0..(max + extra) {
            let key = CacheKey::from_value(&Method::GET, URL, &json!({ "page": i }));
            let _ = store.insert(key, Arc::new(json!(i)), tick(i as i64));
            prop_assert!(store.len() <= max);
        }
        prop_assert_eq!(store.len(), max);
        prop_assert_eq!(store.stats().evictions as usize, extra);
    }

    // The store keeps the same keys as a vector ordered by last access.
    #[test]
    fn prop_matches_recency_model(
        max in 1usize..6,
        ops in prop::collection::vec(store_op_strategy(), 1..80)
    ) {
        let mut store = CacheStore::new(max);
        // Least recently accessed first
        let mut model: Vec<u8> = Vec::new();

        for (t, op) in ops.into_iter().enumerate() {
            let now = tick(t as i64);
            match op {
                StoreOp::Insert(id) => {
                    let _ = store.insert(key_for(id), Arc::new(json!(id)), now);
                    model.retain(|k| *k != id);
                    model.push(id);
                    if model.len() > max {
                        model.remove(0);
                    }
                }
                StoreOp::Get(id) => {
                    let hit = store.get(&key_for(id), now).unwrap();
                    let expected = model.contains(&id);
                    prop_assert_eq!(hit.is_some(), expected);
                    if expected {
                        model.retain(|k| *k != id);
                        model.push(id);
                    }
                }
            }

            prop_assert_eq!(store.len(), model.len());
            for id in &model {
                prop_assert!(store.contains(&key_for(*id)));
            }
            let expected_oldest = model.first().map(|id| key_for(*id));
            prop_assert_eq!(store.oldest(), expected_oldest.as_ref());
        }
    }

    // With room for every key, the transport sees each distinct request once.
    #[test]
    fn prop_repeats_served_from_cache(
        requests in prop::collection::vec(0u8..10, 1..40)
    ) {
        let transport = Arc::new(CountingTransport::default());
        let cache = ResponseCache::new(Arc::clone(&transport), 100);

        tokio_test::block_on(async {
            for id in &requests {
                let response = cache
                    .call(Method::GET, URL, &json!({ "id": id }))
                    .await
                    .unwrap();
                assert_eq!(response["params"]["id"], json!(id));
            }
        });

        let mut distinct = requests.clone();
        distinct.sort_unstable();
        distinct.dedup();
        prop_assert_eq!(transport.calls.load(Ordering::SeqCst), distinct.len());
        prop_assert_eq!(tokio_test::block_on(cache.cached_entry_count()), distinct.len());
    }

    // Clearing forgets everything: the next identical call misses.
    #[test]
    fn prop_clear_forgets_everything(ids in prop::collection::vec(0u8..20, 1..20)) {
        let transport = Arc::new(CountingTransport::default());
        let cache = ResponseCache::new(Arc::clone(&transport), 100);

        tokio_test::block_on(async {
            for id in &ids {
                cache.call(Method::GET, URL, &json!({ "id": id })).await.unwrap();
            }
            cache.clear_cache().await;
            assert_eq!(cache.cached_entry_count().await, 0);

            let before = transport.calls.load(Ordering::SeqCst);
            cache.call(Method::GET, URL, &json!({ "id": ids[0] })).await.unwrap();
            assert_eq!(transport.calls.load(Ordering::SeqCst), before + 1);
        });
    }
}
