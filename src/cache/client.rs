//! Cached wrapper for airport data clients
//!
//! Provides transparent server-side caching of upstream responses, with at
//! most one upstream call per key while that key is being fetched.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::cache::{ServerCache, server_cache, server_key};
use crate::client::{AirportResponse, AirportsApi};
use crate::error::Result;

/// Cached wrapper for any [`AirportsApi`] implementation.
///
/// The cache lives as long as this value; share it (e.g. behind an `Arc`)
/// across requests of one process. Instances do not coordinate with each
/// other.
pub struct CachedAirportsClient<C: AirportsApi> {
    inner: Arc<C>,
    cache: Option<Mutex<ServerCache>>,
    in_flight: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl<C: AirportsApi> CachedAirportsClient<C> {
    /// Create a new cached client wrapper.
    ///
    /// # Arguments
    /// * `inner` - The underlying API client to wrap
    /// * `enabled` - Whether caching is enabled (false for --no-cache)
    pub fn new(inner: C, enabled: bool) -> Self {
        let cache = enabled.then(server_cache);
        Self::with_cache(inner, cache)
    }

    /// Wrap `inner` with a preconfigured cache
    pub fn with_cache(inner: C, cache: Option<ServerCache>) -> Self {
        Self {
            inner: Arc::new(inner),
            cache: cache.map(Mutex::new),
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// Get the inner client
    #[cfg(test)]
    pub fn inner(&self) -> &C {
        &self.inner
    }

    fn get_cached(&self, key: &str) -> Option<AirportResponse> {
        let cache = self.cache.as_ref()?;
        let mut guard = cache.lock().ok()?;
        guard.get(key)
    }

    fn set_cached(&self, key: &str, data: AirportResponse) {
        if let Some(ref cache) = self.cache
            && let Ok(mut guard) = cache.lock()
        {
            guard.put(key, data);
        }
    }

    fn key_lock(&self, key: &str) -> Option<Arc<tokio::sync::Mutex<()>>> {
        let mut in_flight = self.in_flight.lock().ok()?;
        Some(in_flight.entry(key.to_string()).or_default().clone())
    }

    fn release_key_lock(&self, key: &str, lock: Arc<tokio::sync::Mutex<()>>) {
        if let Ok(mut in_flight) = self.in_flight.lock() {
            // Only the map and this caller hold it: nobody else is waiting
            if Arc::strong_count(&lock) == 2 {
                in_flight.remove(key);
            }
        }
    }
}

#[async_trait]
impl<C: AirportsApi + 'static> AirportsApi for CachedAirportsClient<C> {
    async fn fetch_airports(&self, query: Option<&str>) -> Result<AirportResponse> {
        let key = server_key(query);

        if let Some(cached) = self.get_cached(&key) {
            log::debug!("Cache hit: {}", key);
            return Ok(cached);
        }

        let lock = match self.cache.as_ref().and_then(|_| self.key_lock(&key)) {
            Some(lock) => lock,
            None => return self.inner.fetch_airports(query).await,
        };

        let result = {
            let _guard = lock.lock().await;

            // A concurrent caller may have filled the entry while we waited
            if let Some(cached) = self.get_cached(&key) {
                log::debug!("Cache hit after wait: {}", key);
                Ok(cached)
            } else {
                log::debug!("Cache miss: {}", key);
                let result = self.inner.fetch_airports(query).await;
                if let Ok(ref data) = result {
                    self.set_cached(&key, data.clone());
                }
                result
            }
        };

        self.release_key_lock(&key, lock);
        result
    }
}
