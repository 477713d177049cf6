//! Recently viewed airports

use std::sync::Arc;

use crate::cache::LocalStorage;
use crate::client::{Airport, SearchHistoryItem};

/// Storage key of the recency list
pub const HISTORY_KEY: &str = "airport-search-history";

/// Maximum number of remembered airports
pub const MAX_HISTORY_ITEMS: usize = 5;

/// Bounded most-recent-first list, deduplicated by IATA code and written
/// through to storage on every change.
pub struct SearchHistory {
    items: Vec<SearchHistoryItem>,
    storage: Option<Arc<LocalStorage>>,
}

impl SearchHistory {
    /// History that is never persisted
    pub fn in_memory() -> Self {
        Self {
            items: Vec::new(),
            storage: None,
        }
    }

    /// Load the stored list. Missing or unreadable data yields an empty list.
    pub fn load(storage: Arc<LocalStorage>) -> Self {
        let items = match storage.get_item(HISTORY_KEY) {
            Ok(Some(json)) => serde_json::from_str::<Vec<SearchHistoryItem>>(&json)
                .unwrap_or_else(|e| {
                    log::warn!("Ignoring unreadable search history: {}", e);
                    Vec::new()
                }),
            Ok(None) => Vec::new(),
            Err(e) => {
                log::warn!("Failed to read search history: {}", e);
                Vec::new()
            }
        };

        Self {
            items,
            storage: Some(storage),
        }
    }

    pub fn items(&self) -> &[SearchHistoryItem] {
        &self.items
    }

    /// Move `airport` to the front (or insert it there), keeping at most
    /// [`MAX_HISTORY_ITEMS`] entries.
    pub fn add(&mut self, airport: &Airport, timestamp: i64) {
        self.items
            .retain(|item| !item.iata_code.eq_ignore_ascii_case(&airport.iata_code));
        self.items.insert(
            0,
            SearchHistoryItem {
                iata_code: airport.iata_code.clone(),
                airport_name: airport.airport_name.clone(),
                timestamp,
            },
        );
        self.items.truncate(MAX_HISTORY_ITEMS);
        self.persist();
    }

    /// Forget the in-memory list. Storage keeps its copy until the next add.
    pub fn reset(&mut self) {
        self.items.clear();
    }

    fn persist(&self) {
        let Some(ref storage) = self.storage else {
            return;
        };

        let result = serde_json::to_string(&self.items)
            .map_err(crate::error::CacheError::from)
            .and_then(|json| storage.set_item(HISTORY_KEY, &json));
        if let Err(e) = result {
            log::warn!("Failed to save search history: {}", e);
        }
    }
}
