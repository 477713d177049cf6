//! Cache key generation

/// Namespace of the persisted airport response cache
pub const CLIENT_CACHE_PREFIX: &str = "airports_";

/// Server-side key: `all`, or `query:<value>` for a narrowed request.
pub fn server_key(query: Option<&str>) -> String {
    match query.filter(|q| !q.is_empty()) {
        Some(q) => format!("query:{}", q),
        None => "all".to_string(),
    }
}

/// Persisted client key: `airports_<query|all>_page<n>`.
pub fn client_key(query: Option<&str>, page: usize) -> String {
    let query = query.filter(|q| !q.is_empty()).unwrap_or("all");
    format!("{}{}_page{}", CLIENT_CACHE_PREFIX, query, page)
}
