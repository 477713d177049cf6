//! Response caches
//!
//! Two tiers share one bounded TTL policy ([`TtlCache`]):
//! - server side, in-process ([`MemoryBackend`]), in front of the upstream API
//! - client side, persisted in [`LocalStorage`] ([`PersistentBackend`]), in
//!   front of the network entirely

pub mod client;
pub mod clock;
pub mod key;
pub mod memory;
pub mod storage;
pub mod ttl;

use std::sync::Arc;
use std::time::Duration;

use crate::client::AirportResponse;

/// Cache limits
pub struct CacheLimits;

impl CacheLimits {
    /// Both tiers keep responses for one hour
    pub const TTL: Duration = Duration::from_secs(60 * 60);

    /// Server cache bound, evicting the oldest insertion beyond it
    pub const SERVER_MAX_ENTRIES: usize = 50;

    /// Persisted cache bound and the extra room freed when it is reached
    pub const CLIENT_CAPACITY: usize = 30;
    pub const CLIENT_HEADROOM: usize = 10;
}

// Re-export main types
pub use client::CachedAirportsClient;
pub use clock::{Clock, SystemClock};
pub use key::{CLIENT_CACHE_PREFIX, client_key, server_key};
pub use memory::MemoryBackend;
pub use storage::{LocalStorage, PersistentBackend, StorageStats};
pub use ttl::{Eviction, TtlCache};

/// In-process response cache used by the server
pub type ServerCache = TtlCache<AirportResponse, MemoryBackend<AirportResponse>>;

/// Persisted response cache used by the client store
pub type PersistedCache = TtlCache<AirportResponse, PersistentBackend<AirportResponse>>;

/// Server cache with the standard limits
pub fn server_cache() -> ServerCache {
    TtlCache::new(
        MemoryBackend::new(),
        CacheLimits::TTL,
        Eviction::OldestInserted {
            max_entries: CacheLimits::SERVER_MAX_ENTRIES,
        },
    )
}

/// Persisted client cache with the standard limits
pub fn persisted_cache(storage: Arc<LocalStorage>) -> PersistedCache {
    TtlCache::new(
        PersistentBackend::new(storage, CLIENT_CACHE_PREFIX),
        CacheLimits::TTL,
        Eviction::PurgeThenTrim {
            capacity: CacheLimits::CLIENT_CAPACITY,
            headroom: CacheLimits::CLIENT_HEADROOM,
        },
    )
}
