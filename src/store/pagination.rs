//! Filtering and local pagination of the airport list

use crate::client::Airport;

/// Maximum number of page buttons shown at once
pub const PAGE_WINDOW: usize = 5;

/// Airports whose IATA code or name contains `query` (case-insensitive).
///
/// A blank query matches everything.
pub fn filter_airports<'a>(airports: &'a [Airport], query: &str) -> Vec<&'a Airport> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return airports.iter().collect();
    }

    airports
        .iter()
        .filter(|a| {
            a.iata_code.to_lowercase().contains(&needle)
                || a.airport_name.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Items of 1-based `page`: `items[(page-1)*limit .. (page-1)*limit + limit]`
pub fn paginate<T: Clone>(items: &[T], page: usize, limit: usize) -> Vec<T> {
    let start = page.saturating_sub(1).saturating_mul(limit);
    items.iter().skip(start).take(limit).cloned().collect()
}

/// Page count for `count` items. An empty list still has one (empty) page.
pub fn total_pages(count: usize, limit: usize) -> usize {
    count.div_ceil(limit.max(1)).max(1)
}

/// Page numbers to show as buttons: at most five, centred on `current`
/// where possible, pinned to `[1, 5]` near the start and to the last five
/// pages near the end.
pub fn page_window(current: usize, total: usize) -> Vec<usize> {
    if total <= PAGE_WINDOW {
        return (1..=total).collect();
    }

    let first = if current <= 3 {
        1
    } else if current >= total - 2 {
        total - (PAGE_WINDOW - 1)
    } else {
        current - 2
    };

    (first..first + PAGE_WINDOW).collect()
}
