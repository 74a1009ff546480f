//! Memoizing layer between the record operations and the transport.

use std::sync::Arc;

use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, error, info};

use crate::cache::{CacheKey, CacheStats, CacheStore, Clock, SystemClock};
use crate::config::Config;
use crate::error::{ClientError, Result};
use crate::transport::{Encoding, Transport};

/// Bounded cache of transport responses, evicting the least recently accessed.
///
/// One lock guards the store. It is never held while the transport is
/// awaited, so a slow request never blocks lookups for other keys. Two
/// concurrent misses on one key both reach the transport and the later
/// insertion replaces the earlier one.
#[derive(Debug)]
pub struct ResponseCache<T> {
    transport: T,
    store: RwLock<CacheStore>,
    clock: Arc<dyn Clock>,
    max_cached_requests: usize,
}

impl<T: Transport> ResponseCache<T> {
    /// Creates a cache over `transport` holding at most `max_cached_requests` responses.
    pub fn new(transport: T, max_cached_requests: usize) -> Self {
        Self::with_clock(transport, max_cached_requests, Arc::new(SystemClock))
    }

    /// Same as `new`, stamping accesses with the given clock.
    pub fn with_clock(transport: T, max_cached_requests: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            transport,
            store: RwLock::new(CacheStore::new(max_cached_requests)),
            clock,
            max_cached_requests,
        }
    }

    pub fn from_config(transport: T, config: &Config) -> Self {
        Self::new(transport, config.max_cached_requests)
    }

    /// Calls the API with parameters in the query string, serving repeats from the cache.
    pub async fn call<P>(&self, method: Method, url: &str, params: &P) -> Result<Arc<Value>>
    where
        P: Serialize + ?Sized,
    {
        self.fetch(Encoding::Query, method, url, params).await
    }

    /// Calls the API with parameters as a JSON body, serving repeats from the cache.
    ///
    /// Shares keys with `call`: only the transport encoding on a miss differs.
    pub async fn call_json<P>(&self, method: Method, url: &str, params: &P) -> Result<Arc<Value>>
    where
        P: Serialize + ?Sized,
    {
        self.fetch(Encoding::Json, method, url, params).await
    }

    async fn fetch<P>(
        &self,
        encoding: Encoding,
        method: Method,
        url: &str,
        params: &P,
    ) -> Result<Arc<Value>>
    where
        P: Serialize + ?Sized,
    {
        let params = serde_json::to_value(params).map_err(ClientError::KeySerialization)?;
        let key = CacheKey::from_value(&method, url, &params);

        if let Some(cached) = self.lookup(&key).await {
            debug!(%method, url, "Cache hit");
            return Ok(cached);
        }

        debug!(%method, url, ?encoding, "Cache miss, calling transport");
        let response = Arc::new(self.transport.send(&method, url, &params, encoding).await?);
        self.remember(key, Arc::clone(&response)).await;

        Ok(response)
    }

    async fn lookup(&self, key: &CacheKey) -> Option<Arc<Value>> {
        let now = self.clock.now();
        let mut store = self.store.write().await;

        store.get(key, now).unwrap_or_else(|e| {
            error!(error = %e, "Cache lookup failed, treating as miss");
            None
        })
    }

    async fn remember(&self, key: CacheKey, response: Arc<Value>) {
        let now = self.clock.now();
        let mut store = self.store.write().await;

        match store.insert(key, response, now) {
            Ok(Some(evicted)) => debug!(
                method = %evicted.method(),
                url = evicted.url(),
                "Evicted least recently accessed response"
            ),
            Ok(None) => {}
            Err(e) => error!(error = %e, "Cache insert failed, response returned without caching"),
        }
    }

    // == Introspection ==

    /// Drops every cached response.
    pub async fn clear_cache(&self) {
        let mut store = self.store.write().await;
        let dropped = store.len();
        store.clear();
        info!(dropped, "Cache cleared");
    }

    pub async fn cached_entry_count(&self) -> usize {
        self.store.read().await.len()
    }

    pub async fn stats(&self) -> CacheStats {
        self.store.read().await.stats()
    }

    pub fn max_cached_requests(&self) -> usize {
        self.max_cached_requests
    }
}
