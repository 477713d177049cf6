//! Client-side airport store
//!
//! [`AirportStore`] owns the loaded dataset, the applied filter and the
//! current page, and keeps the paginated view derived from them. Each action
//! computes every derived field before publishing, then notifies the
//! subscribers of the fields that changed.

pub mod debounce;
pub mod history;
pub mod observer;
pub mod pagination;
pub mod state;

use std::sync::{Arc, Mutex, MutexGuard};

use crate::cache::{Clock, LocalStorage, PersistedCache, SystemClock, client_key, persisted_cache};
use crate::client::{Airport, AirportResponse, AirportsApi};

pub use debounce::{Debouncer, SEARCH_DEBOUNCE};
pub use history::SearchHistory;
pub use observer::{SubscriptionId, Subscribers};
pub use state::{StoreField, StoreState};

/// Explicitly constructed state container for the airport list and detail
/// views.
///
/// Share it behind an `Arc`; every action takes `&self`. Fetches are not
/// deduplicated or cancelled: when two overlap, the one that resolves last
/// wins.
pub struct AirportStore {
    state: Mutex<StoreState>,
    source: Arc<dyn AirportsApi>,
    cache: Option<Mutex<PersistedCache>>,
    history: Mutex<SearchHistory>,
    subscribers: Mutex<Subscribers>,
    clock: Arc<dyn Clock>,
}

impl AirportStore {
    /// Store without durable storage: no persisted cache, history kept in
    /// memory only.
    pub fn new(source: Arc<dyn AirportsApi>, page_size: usize) -> Self {
        Self {
            state: Mutex::new(StoreState::new(page_size)),
            source,
            cache: None,
            history: Mutex::new(SearchHistory::in_memory()),
            subscribers: Mutex::new(Subscribers::default()),
            clock: Arc::new(SystemClock),
        }
    }

    /// Attach durable storage: loads the saved search history and, when
    /// `cache_enabled`, puts the persisted response cache in front of the
    /// source.
    pub fn with_storage(mut self, storage: Arc<LocalStorage>, cache_enabled: bool) -> Self {
        let history = SearchHistory::load(storage.clone());
        self.lock_state().search_history = history.items().to_vec();
        self.history = Mutex::new(history);
        self.cache = cache_enabled
            .then(|| Mutex::new(persisted_cache(storage).with_clock(self.clock.clone())));
        self
    }

    /// Use `clock` for cache freshness and history timestamps.
    ///
    /// Call before [`with_storage`](Self::with_storage) so the persisted
    /// cache picks it up.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Consistent copy of the whole state
    pub fn snapshot(&self) -> StoreState {
        self.lock_state().clone()
    }

    /// Register `callback` for changes to `field`
    pub fn subscribe<F>(&self, field: StoreField, callback: F) -> SubscriptionId
    where
        F: Fn(&StoreState) + Send + Sync + 'static,
    {
        self.lock_subscribers().subscribe(field, Arc::new(callback))
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.lock_subscribers().unsubscribe(id)
    }

    /// Load the full dataset, from the persisted cache when fresh, otherwise
    /// from the source. Failures land in `error` with an empty dataset.
    pub async fn fetch_airports(&self) {
        let key = client_key(None, 0);

        if let Some(cached) = self.cached_response(&key) {
            log::debug!("Persisted cache hit: {}", key);
            self.update(|s| s.install(Arc::new(cached.data)));
            return;
        }

        self.update(|s| {
            s.is_loading = true;
            s.error = None;
        });

        log::debug!("Fetching airports");
        match self.source.fetch_airports(None).await {
            Ok(response) => {
                let airports = Arc::new(response.data.clone());
                self.store_response(&key, response);
                self.update(|s| s.install(airports));
            }
            Err(e) => {
                log::debug!("Airport fetch failed: {}", e);
                self.update(|s| {
                    s.all_airports = Arc::new(Vec::new());
                    s.is_loading = false;
                    s.error = Some(e.to_string());
                    s.rederive(1);
                });
            }
        }
    }

    /// Hydrate from server-provided data without fetching.
    pub fn set_initial_data(&self, response: AirportResponse) {
        self.update(|s| s.install(Arc::new(response.data)));
    }

    /// Apply a filter and return to page 1. With no dataset loaded yet the
    /// query is recorded and a fetch is awaited; it is applied on arrival.
    ///
    /// The input echo follows the applied query.
    pub async fn set_search_query(&self, query: &str) {
        let needs_fetch = self.update(|s| {
            s.search_query = query.to_string();
            s.search_value = query.to_string();
            s.rederive(1);
            s.all_airports.is_empty()
        });

        if needs_fetch {
            self.fetch_airports().await;
        }
    }

    /// Echo raw input. Does not filter.
    pub fn set_search_value(&self, value: &str) {
        self.update(|s| s.search_value = value.to_string());
    }

    /// Case-insensitive exact IATA lookup in the loaded dataset
    pub fn find_airport_by_iata(&self, code: &str) -> Option<Airport> {
        let all = self.lock_state().all_airports.clone();
        all.iter()
            .find(|a| a.has_iata(code.trim()))
            .cloned()
    }

    /// Returns false (state untouched) at the last page.
    pub fn next_page(&self) -> bool {
        let page = self.lock_state().current_page + 1;
        self.go_to_page(page)
    }

    /// Returns false (state untouched) at page 1.
    pub fn prev_page(&self) -> bool {
        let page = self.lock_state().current_page.saturating_sub(1);
        self.go_to_page(page)
    }

    /// Show `page` when `1 <= page <= total_pages`; otherwise a no-op
    /// returning false.
    pub fn go_to_page(&self, page: usize) -> bool {
        self.update(|s| {
            if page == 0 || page > s.total_pages {
                return false;
            }
            s.rederive(page);
            true
        })
    }

    /// Record `airport` at the front of the recency list and persist it.
    pub fn add_to_search_history(&self, airport: &Airport) {
        let items = {
            let mut history = self.lock_history();
            history.add(airport, self.clock.now_millis());
            history.items().to_vec()
        };
        self.update(|s| s.search_history = items);
    }

    /// Back to the initial state. Persisted data is left alone.
    pub fn reset_store(&self) {
        self.lock_history().reset();
        self.update(|s| *s = StoreState::new(s.limit));
    }

    fn update<R>(&self, action: impl FnOnce(&mut StoreState) -> R) -> R {
        let (result, changed, snapshot) = {
            let mut state = self.lock_state();
            let before = state.clone();
            let result = action(&mut state);
            let changed = before.changed_fields(&state);
            (result, changed, state.clone())
        };

        if !changed.is_empty() {
            let callbacks = self.lock_subscribers().affected(&changed);
            for callback in callbacks {
                callback(&snapshot);
            }
        }

        result
    }

    fn cached_response(&self, key: &str) -> Option<AirportResponse> {
        let cache = self.cache.as_ref()?;
        let mut guard = cache.lock().ok()?;
        guard.get(key)
    }

    fn store_response(&self, key: &str, response: AirportResponse) {
        if let Some(ref cache) = self.cache
            && let Ok(mut guard) = cache.lock()
        {
            guard.put(key, response);
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_history(&self) -> MutexGuard<'_, SearchHistory> {
        self.history
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_subscribers(&self) -> MutexGuard<'_, Subscribers> {
        self.subscribers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::history::{HISTORY_KEY, MAX_HISTORY_ITEMS};
    use super::pagination::{filter_airports, paginate, total_pages};
    use super::*;
    use crate::cache::clock::ManualClock;
    use crate::cache::{CLIENT_CACHE_PREFIX, CacheLimits};
    use crate::client::MockAirportsClient;
    use crate::client::fixtures::{AirportBuilder, bog, jfk, numbered_airports, response};
    use crate::error::ApiError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn store_with(mock: MockAirportsClient) -> (Arc<MockAirportsClient>, AirportStore) {
        let mock = Arc::new(mock);
        let store = AirportStore::new(mock.clone(), 6);
        (mock, store)
    }

    fn loaded_store(airports: Vec<Airport>) -> AirportStore {
        let (_, store) = store_with(MockAirportsClient::new());
        store.set_initial_data(response(airports));
        store
    }

    fn assert_invariant(store: &AirportStore) {
        let s = store.snapshot();
        let filtered = filter_airports(&s.all_airports, &s.search_query);
        let expected: Vec<Airport> = paginate(&filtered, s.current_page, s.limit)
            .into_iter()
            .cloned()
            .collect();
        assert_eq!(s.airports, expected);
        assert_eq!(s.total_pages, total_pages(filtered.len(), s.limit));
    }

    fn codes(airports: &[Airport]) -> Vec<&str> {
        airports.iter().map(|a| a.iata_code.as_str()).collect()
    }

    #[tokio::test]
    async fn test_scenario_filter_by_code() {
        let store = loaded_store(vec![bog(), jfk()]);

        store.set_search_query("bog").await;

        let s = store.snapshot();
        assert_eq!(codes(&s.airports), vec!["BOG"]);
        assert_eq!(s.total_pages, 1);
        assert_eq!(s.current_page, 1);
        assert_eq!(s.search_value, "bog");
        assert_invariant(&store);
    }

    #[test]
    fn test_scenario_thirteen_airports() {
        let store = loaded_store(numbered_airports(13));
        assert_eq!(store.snapshot().total_pages, 3);

        assert!(store.go_to_page(3));
        let s = store.snapshot();
        assert_eq!(s.airports.len(), 1);
        assert_eq!(s.current_page, 3);
        assert_invariant(&store);
    }

    #[test]
    fn test_scenario_find_by_iata_case_insensitive() {
        let store = loaded_store(vec![bog(), jfk()]);

        let found = store.find_airport_by_iata("bog").unwrap();
        assert_eq!(found.iata_code, "BOG");
        assert!(store.find_airport_by_iata("XXX").is_none());
    }

    #[tokio::test]
    async fn test_scenario_upstream_failure() {
        let mock = MockAirportsClient::new().with_error(ApiError::Upstream {
            status: 503,
            reason: "Service Unavailable".to_string(),
        });
        let (_, store) = store_with(mock);
        store.set_initial_data(response(vec![bog()]));

        store.fetch_airports().await;

        let s = store.snapshot();
        assert_eq!(s.error.as_deref(), Some("Error: 503 Service Unavailable"));
        assert!(s.all_airports.is_empty());
        assert!(!s.is_loading);
        assert_invariant(&store);
    }

    #[test]
    fn test_out_of_range_pages_are_noops() {
        let store = loaded_store(numbered_airports(13));
        let before = store.snapshot();

        assert!(!store.go_to_page(0));
        assert!(!store.go_to_page(4));

        let after = store.snapshot();
        assert!(before.changed_fields(&after).is_empty());
    }

    #[test]
    fn test_next_and_prev_are_clamped() {
        let store = loaded_store(numbered_airports(13));

        assert!(!store.prev_page());
        assert!(store.next_page());
        assert!(store.next_page());
        assert!(!store.next_page());
        assert_eq!(store.snapshot().current_page, 3);
        assert_invariant(&store);

        assert!(store.prev_page());
        assert_eq!(store.snapshot().current_page, 2);
        assert_invariant(&store);
    }

    #[tokio::test]
    async fn test_empty_query_restores_first_page() {
        let store = loaded_store(numbered_airports(13));
        store.set_search_query("A1").await;
        store.go_to_page(1);

        store.set_search_query("").await;

        let s = store.snapshot();
        assert_eq!(s.airports, paginate(&s.all_airports, 1, 6));
        assert_eq!(s.total_pages, 3);

        store.set_search_query("").await;
        assert!(s.changed_fields(&store.snapshot()).is_empty());
    }

    #[tokio::test]
    async fn test_query_resets_to_first_page() {
        let store = loaded_store(numbered_airports(40));
        store.go_to_page(5);

        store.set_search_query("A").await;

        assert_eq!(store.snapshot().current_page, 1);
        assert_invariant(&store);
    }

    #[tokio::test]
    async fn test_query_on_empty_store_fetches_then_filters() {
        let mock = MockAirportsClient::new().with_response(response(vec![bog(), jfk()]));
        let (mock, store) = store_with(mock);

        store.set_search_query("kennedy").await;

        assert_eq!(mock.call_count().await, 1);
        let s = store.snapshot();
        assert_eq!(s.search_query, "kennedy");
        assert_eq!(s.search_value, "kennedy");
        assert_eq!(codes(&s.airports), vec!["JFK"]);
        assert_eq!(s.all_airports.len(), 2);
        assert_invariant(&store);
    }

    #[tokio::test]
    async fn test_query_overwrites_typed_value() {
        let store = loaded_store(vec![bog(), jfk()]);
        store.set_search_value("bo");

        store.set_search_query("jfk").await;

        let s = store.snapshot();
        assert_eq!(s.search_value, "jfk");
        assert_eq!(codes(&s.airports), vec!["JFK"]);
    }

    #[test]
    fn test_search_value_does_not_filter() {
        let store = loaded_store(vec![bog(), jfk()]);

        store.set_search_value("bo");

        let s = store.snapshot();
        assert_eq!(s.search_value, "bo");
        assert_eq!(s.search_query, "");
        assert_eq!(s.airports.len(), 2);
    }

    #[test]
    fn test_history_dedup_and_cap() {
        let clock = Arc::new(ManualClock::at(1_000));
        let store = AirportStore::new(Arc::new(MockAirportsClient::new()), 6)
            .with_clock(clock.clone());

        store.add_to_search_history(&bog());
        clock.advance(Duration::from_secs(1));
        store.add_to_search_history(&jfk());
        clock.advance(Duration::from_secs(1));
        store.add_to_search_history(&bog());

        let history = store.snapshot().search_history;
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].iata_code, "BOG");
        assert_eq!(history[0].timestamp, 3_000);

        for code in ["AAA", "BBB", "CCC", "DDD", "EEE"] {
            store.add_to_search_history(&AirportBuilder::new(code).build());
        }
        assert_eq!(store.snapshot().search_history.len(), MAX_HISTORY_ITEMS);
    }

    #[test]
    fn test_history_loaded_from_storage() {
        let storage = Arc::new(LocalStorage::in_memory().unwrap());
        let first = AirportStore::new(Arc::new(MockAirportsClient::new()), 6)
            .with_storage(storage.clone(), true);
        first.add_to_search_history(&jfk());

        let second = AirportStore::new(Arc::new(MockAirportsClient::new()), 6)
            .with_storage(storage, true);
        let history = second.snapshot().search_history;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].iata_code, "JFK");
    }

    #[tokio::test]
    async fn test_reset_keeps_persisted_data() {
        let storage = Arc::new(LocalStorage::in_memory().unwrap());
        let mock = Arc::new(MockAirportsClient::new().with_response(response(vec![bog()])));
        let store = AirportStore::new(mock.clone(), 6).with_storage(storage.clone(), true);
        store.fetch_airports().await;
        store.add_to_search_history(&bog());
        store.go_to_page(1);

        store.reset_store();

        let s = store.snapshot();
        assert!(s.all_airports.is_empty());
        assert!(s.search_history.is_empty());
        assert_eq!(s.limit, 6);
        assert!(storage.get_item(HISTORY_KEY).unwrap().is_some());
        assert_eq!(storage.keys(CLIENT_CACHE_PREFIX).unwrap().len(), 1);

        store.fetch_airports().await;
        assert_eq!(mock.call_count().await, 1);
    }

    #[tokio::test]
    async fn test_persisted_cache_hit_skips_source() {
        let storage = Arc::new(LocalStorage::in_memory().unwrap());
        let mock = Arc::new(MockAirportsClient::new().with_response(response(vec![bog(), jfk()])));

        let first = AirportStore::new(mock.clone(), 6).with_storage(storage.clone(), true);
        first.fetch_airports().await;
        assert!(storage.get_item("airports_all_page0").unwrap().is_some());

        let second = AirportStore::new(mock.clone(), 6).with_storage(storage, true);
        second.fetch_airports().await;

        assert_eq!(mock.call_count().await, 1);
        assert_eq!(second.snapshot().all_airports.len(), 2);
        assert!(!second.snapshot().is_loading);
    }

    #[tokio::test]
    async fn test_expired_persisted_entry_refetches() {
        let clock = Arc::new(ManualClock::at(0));
        let storage = Arc::new(LocalStorage::in_memory().unwrap());
        let mock = Arc::new(MockAirportsClient::new().with_response(response(vec![bog()])));
        let store = AirportStore::new(mock.clone(), 6)
            .with_clock(clock.clone())
            .with_storage(storage, true);

        store.fetch_airports().await;
        clock.advance(CacheLimits::TTL + Duration::from_millis(1));
        store.fetch_airports().await;

        assert_eq!(mock.call_count().await, 2);
    }

    #[tokio::test]
    async fn test_cache_disabled_always_fetches() {
        let storage = Arc::new(LocalStorage::in_memory().unwrap());
        let mock = Arc::new(MockAirportsClient::new().with_response(response(vec![bog()])));
        let store = AirportStore::new(mock.clone(), 6).with_storage(storage.clone(), false);

        store.fetch_airports().await;
        store.fetch_airports().await;

        assert_eq!(mock.call_count().await, 2);
        assert!(storage.keys(CLIENT_CACHE_PREFIX).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_quota_failure_clears_cache_and_still_installs() {
        let storage = Arc::new(LocalStorage::in_memory().unwrap().with_quota(64));
        storage.set_item("airports_stale_page0", "{}").unwrap();
        let mock = Arc::new(MockAirportsClient::new().with_response(response(numbered_airports(20))));
        let store = AirportStore::new(mock, 6).with_storage(storage.clone(), true);

        store.fetch_airports().await;

        assert!(storage.keys(CLIENT_CACHE_PREFIX).unwrap().is_empty());
        let s = store.snapshot();
        assert_eq!(s.all_airports.len(), 20);
        assert!(s.error.is_none());
    }

    #[tokio::test]
    async fn test_loading_flag_visible_while_fetching() {
        let (mock, store) = store_with(MockAirportsClient::new());
        let release = mock.push_gated(response(vec![bog()])).await;
        let store = Arc::new(store);

        let fetching = {
            let store = store.clone();
            tokio::spawn(async move { store.fetch_airports().await })
        };
        while !store.snapshot().is_loading {
            tokio::task::yield_now().await;
        }

        let _ = release.send(());
        fetching.await.unwrap();
        assert!(!store.snapshot().is_loading);
        assert_eq!(store.snapshot().all_airports.len(), 1);
    }

    #[test]
    fn test_subscribers_notified_only_for_changed_fields() {
        let store = loaded_store(numbered_airports(13));
        let page_hits = Arc::new(AtomicUsize::new(0));
        let error_hits = Arc::new(AtomicUsize::new(0));

        let captured = page_hits.clone();
        store.subscribe(StoreField::CurrentPage, move |s| {
            assert_eq!(s.current_page, 2);
            captured.fetch_add(1, Ordering::SeqCst);
        });
        let captured = error_hits.clone();
        store.subscribe(StoreField::Error, move |_| {
            captured.fetch_add(1, Ordering::SeqCst);
        });

        store.go_to_page(2);
        store.go_to_page(99);

        assert_eq!(page_hits.load(Ordering::SeqCst), 1);
        assert_eq!(error_hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_callbacks_may_read_the_store() {
        let store = Arc::new(loaded_store(numbered_airports(13)));
        let seen = Arc::new(Mutex::new(Vec::new()));

        let (inner, sink) = (store.clone(), seen.clone());
        let id = store.subscribe(StoreField::Airports, move |_| {
            sink.lock().unwrap().push(inner.snapshot().current_page);
        });

        store.next_page();
        assert!(store.unsubscribe(id));
        store.next_page();

        assert_eq!(*seen.lock().unwrap(), vec![2]);
    }

    #[test]
    fn test_page_window_follows_state() {
        let store = loaded_store(numbered_airports(60));
        assert_eq!(store.snapshot().page_window(), vec![1, 2, 3, 4, 5]);

        store.go_to_page(7);
        assert_eq!(store.snapshot().page_window(), vec![5, 6, 7, 8, 9]);

        store.go_to_page(10);
        assert_eq!(store.snapshot().page_window(), vec![6, 7, 8, 9, 10]);
    }

    #[tokio::test]
    async fn test_stale_fetch_overwrites_newer_result() {
        // Overlapping fetches are neither cancelled nor ordered: whichever
        // resolves last is installed, even if it was issued first.
        let (mock, store) = store_with(MockAirportsClient::new());
        let release_old = mock.push_gated(response(vec![bog()])).await;
        let release_new = mock.push_gated(response(vec![bog(), jfk()])).await;

        tokio::join!(store.fetch_airports(), store.fetch_airports(), async {
            while mock.call_count().await < 2 {
                tokio::task::yield_now().await;
            }
            let _ = release_new.send(());
            while store.snapshot().all_airports.len() != 2 {
                tokio::task::yield_now().await;
            }
            let _ = release_old.send(());
        });

        let s = store.snapshot();
        assert_eq!(codes(&s.all_airports), vec!["BOG"]);
        assert!(!s.is_loading);
        assert_eq!(mock.call_count().await, 2);
    }
}
