//! Session-lifetime response cache with request de-duplication.
//!
//! Entries never expire; they live as long as the store. Concurrent lookups
//! of the same key share a single in-flight fetch. Failed fetches are not
//! cached, so the next lookup tries again.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::{Mutex, OnceCell};

/// Keyed cache of fetched values.
#[derive(Debug)]
pub struct CacheStore<V> {
    inner: Arc<Mutex<HashMap<String, Arc<OnceCell<V>>>>>,
}

impl<V> Clone for CacheStore<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V> Default for CacheStore<V> {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl<V: Clone> CacheStore<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached value for `key`, if a fetch for it has completed successfully.
    pub async fn get(&self, key: &str) -> Option<V> {
        let store = self.inner.lock().await;
        store.get(key).and_then(|cell| cell.get().cloned())
    }

    /// Return the cached value for `key`, running `fetch` only when no
    /// successful value exists and no other fetch for `key` is in flight.
    pub async fn get_or_try_fetch<F, Fut, E>(&self, key: &str, fetch: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let cell = {
            let mut store = self.inner.lock().await;
            Arc::clone(store.entry(key.to_owned()).or_default())
        };

        if let Some(value) = cell.get() {
            log::debug!("cache hit for '{key}'");
            return Ok(value.clone());
        }

        cell.get_or_try_init(fetch).await.cloned()
    }

    /// Number of keys holding a completed value.
    pub async fn len(&self) -> usize {
        let store = self.inner.lock().await;
        store.values().filter(|cell| cell.initialized()).count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn clear(&self) {
        let mut store = self.inner.lock().await;
        store.clear();
    }
}
