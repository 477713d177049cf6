//! Bounded key/value cache with TTL
//!
//! One policy implementation shared by the in-process server cache and the
//! persisted client cache. Backends only store and enumerate entries; TTL
//! checks, lazy purging and eviction all live in [`TtlCache`].

use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::clock::{Clock, SystemClock};
use crate::error::CacheError;

type Result<T> = std::result::Result<T, CacheError>;

/// A cached payload with its creation time (ms since epoch).
///
/// Serialized as `{ "data": ..., "timestamp": ... }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    pub data: T,
    pub timestamp: i64,
}

impl<T> CacheEntry<T> {
    /// Valid while `now - timestamp < ttl`
    pub fn is_fresh(&self, now: i64, ttl: Duration) -> bool {
        is_fresh(self.timestamp, now, ttl)
    }
}

fn is_fresh(stored_at: i64, now: i64, ttl: Duration) -> bool {
    let ttl_ms = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
    now.saturating_sub(stored_at) < ttl_ms
}

/// Key and creation time of a stored entry.
///
/// `stored_at` is `None` when the entry cannot be read back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub key: String,
    pub stored_at: Option<i64>,
}

/// Storage behind a [`TtlCache`]
pub trait CacheBackend<T> {
    fn read(&self, key: &str) -> Result<Option<CacheEntry<T>>>;

    fn write(&mut self, key: &str, entry: CacheEntry<T>) -> Result<()>;

    fn remove(&mut self, key: &str) -> Result<()>;

    /// Every entry of this cache, oldest insertion first.
    fn index(&self) -> Result<Vec<IndexEntry>>;

    /// Remove every entry of this cache, returning how many were removed.
    fn clear(&mut self) -> Result<usize>;
}

/// How a cache stays within its bound
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eviction {
    /// After a write, drop the single oldest-inserted entry when the count
    /// exceeds `max_entries`. Overwriting a key keeps its insertion slot.
    /// Reads do not refresh the slot (this is not LRU).
    OldestInserted { max_entries: usize },

    /// Before a write, purge expired entries; if `capacity` or more remain,
    /// delete the oldest by timestamp until `capacity - headroom` are left.
    PurgeThenTrim { capacity: usize, headroom: usize },
}

/// Bounded TTL cache over a pluggable backend.
///
/// A failed backend write clears the whole cache and is otherwise swallowed:
/// the caller proceeds uncached rather than with a half-written store.
pub struct TtlCache<T, B> {
    backend: B,
    ttl: Duration,
    eviction: Eviction,
    clock: Arc<dyn Clock>,
    _data: PhantomData<fn() -> T>,
}

impl<T, B: CacheBackend<T>> TtlCache<T, B> {
    pub fn new(backend: B, ttl: Duration, eviction: Eviction) -> Self {
        Self {
            backend,
            ttl,
            eviction,
            clock: Arc::new(SystemClock),
            _data: PhantomData,
        }
    }

    /// Replace the time source
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    #[cfg(test)]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Fresh payload for `key`. Expired or unreadable entries are purged.
    pub fn get(&mut self, key: &str) -> Option<T> {
        let now = self.clock.now_millis();
        match self.backend.read(key) {
            Ok(Some(entry)) if entry.is_fresh(now, self.ttl) => Some(entry.data),
            Ok(Some(_)) => {
                log::debug!("Cache entry expired: {}", key);
                self.discard(key);
                None
            }
            Ok(None) => None,
            Err(e) => {
                log::warn!("Dropping unreadable cache entry {}: {}", key, e);
                self.discard(key);
                None
            }
        }
    }

    /// Store `data` under `key` stamped with the current time.
    pub fn put(&mut self, key: &str, data: T) {
        if let Eviction::PurgeThenTrim { capacity, headroom } = self.eviction
            && let Err(e) = self.purge_then_trim(capacity, headroom)
        {
            self.reset(&e);
            return;
        }

        let entry = CacheEntry {
            data,
            timestamp: self.clock.now_millis(),
        };
        if let Err(e) = self.backend.write(key, entry) {
            self.reset(&e);
            return;
        }

        if let Eviction::OldestInserted { max_entries } = self.eviction
            && let Err(e) = self.evict_oldest_inserted(max_entries)
        {
            log::warn!("Cache eviction failed: {}", e);
        }
    }

    /// Number of stored entries, fresh or not
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.backend.index().map(|i| i.len()).unwrap_or(0)
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn discard(&mut self, key: &str) {
        if let Err(e) = self.backend.remove(key) {
            log::warn!("Failed to remove cache entry {}: {}", key, e);
        }
    }

    fn reset(&mut self, cause: &CacheError) {
        log::warn!("Cache write failed ({}), clearing cache", cause);
        if let Err(e) = self.backend.clear() {
            log::warn!("Failed to clear cache: {}", e);
        }
    }

    fn evict_oldest_inserted(&mut self, max_entries: usize) -> Result<()> {
        let index = self.backend.index()?;
        if index.len() > max_entries
            && let Some(oldest) = index.first()
        {
            log::debug!("Evicting oldest cache entry: {}", oldest.key);
            self.backend.remove(&oldest.key)?;
        }
        Ok(())
    }

    fn purge_then_trim(&mut self, capacity: usize, headroom: usize) -> Result<()> {
        let now = self.clock.now_millis();
        let mut remaining = Vec::new();

        for entry in self.backend.index()? {
            match entry.stored_at {
                Some(ts) if is_fresh(ts, now, self.ttl) => remaining.push((entry.key, ts)),
                _ => self.backend.remove(&entry.key)?,
            }
        }

        if remaining.len() >= capacity {
            // Trim below capacity so the next writes don't each evict again
            let excess = remaining.len() + headroom - capacity;
            remaining.sort_by_key(|(_, ts)| *ts);
            for (key, _) in remaining.into_iter().take(excess) {
                log::debug!("Trimming cache entry: {}", key);
                self.backend.remove(&key)?;
            }
        }

        Ok(())
    }
}
