//! Airport store state and its derived fields

use std::sync::Arc;

use super::pagination::{filter_airports, page_window, paginate, total_pages};
use crate::client::{Airport, SearchHistoryItem};
use crate::config::DEFAULT_PAGE_SIZE;

/// Observable fields of [`StoreState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreField {
    AllAirports,
    Airports,
    IsLoading,
    Error,
    CurrentPage,
    TotalPages,
    SearchQuery,
    SearchValue,
    SearchHistory,
}

impl StoreField {
    pub const ALL: [StoreField; 9] = [
        StoreField::AllAirports,
        StoreField::Airports,
        StoreField::IsLoading,
        StoreField::Error,
        StoreField::CurrentPage,
        StoreField::TotalPages,
        StoreField::SearchQuery,
        StoreField::SearchValue,
        StoreField::SearchHistory,
    ];
}

/// Canonical client state.
///
/// `airports` and `total_pages` are derived: they always equal
/// `paginate(filter(all_airports, search_query), current_page, limit)` and
/// `max(1, ceil(filtered / limit))`. Only [`StoreState::rederive`] and
/// [`StoreState::install`] write them.
#[derive(Debug, Clone)]
pub struct StoreState {
    /// Full unfiltered dataset, replaced wholesale
    pub all_airports: Arc<Vec<Airport>>,
    /// Current page of the filtered list
    pub airports: Vec<Airport>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub current_page: usize,
    /// Page size, fixed for the store's lifetime
    pub limit: usize,
    pub total_pages: usize,
    /// Applied (debounced) filter
    pub search_query: String,
    /// Raw input echo
    pub search_value: String,
    pub search_history: Vec<SearchHistoryItem>,
}

impl StoreState {
    pub fn new(limit: usize) -> Self {
        Self {
            all_airports: Arc::new(Vec::new()),
            airports: Vec::new(),
            is_loading: false,
            error: None,
            current_page: 1,
            limit: limit.max(1),
            total_pages: 1,
            search_query: String::new(),
            search_value: String::new(),
            search_history: Vec::new(),
        }
    }

    /// Number of airports matching the current query
    pub fn filtered_count(&self) -> usize {
        filter_airports(&self.all_airports, &self.search_query).len()
    }

    /// Page buttons around the current page
    pub fn page_window(&self) -> Vec<usize> {
        page_window(self.current_page, self.total_pages)
    }

    /// Recompute `airports` and `total_pages` for `page`.
    pub fn rederive(&mut self, page: usize) {
        let filtered = filter_airports(&self.all_airports, &self.search_query);
        self.total_pages = total_pages(filtered.len(), self.limit);
        self.current_page = page;
        self.airports = paginate(&filtered, page, self.limit)
            .into_iter()
            .cloned()
            .collect();
    }

    /// Replace the dataset and show page 1 of it under the current query.
    pub fn install(&mut self, airports: Arc<Vec<Airport>>) {
        self.all_airports = airports;
        self.is_loading = false;
        self.error = None;
        self.rederive(1);
    }

    /// Fields whose values differ between `self` and `newer`
    pub fn changed_fields(&self, newer: &StoreState) -> Vec<StoreField> {
        StoreField::ALL
            .into_iter()
            .filter(|field| match field {
                StoreField::AllAirports => {
                    !Arc::ptr_eq(&self.all_airports, &newer.all_airports)
                        && self.all_airports != newer.all_airports
                }
                StoreField::Airports => self.airports != newer.airports,
                StoreField::IsLoading => self.is_loading != newer.is_loading,
                StoreField::Error => self.error != newer.error,
                StoreField::CurrentPage => self.current_page != newer.current_page,
                StoreField::TotalPages => self.total_pages != newer.total_pages,
                StoreField::SearchQuery => self.search_query != newer.search_query,
                StoreField::SearchValue => self.search_value != newer.search_value,
                StoreField::SearchHistory => self.search_history != newer.search_history,
            })
            .collect()
    }
}

impl Default for StoreState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}
