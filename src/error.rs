//! Error types for the airport search service

use thiserror::Error;

/// Result type alias for airport search operations
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for the application
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The store finished loading with its `error` field set
    #[error("Failed to load airports: {0}")]
    Load(String),

    #[error("Operation failed: {0}")]
    Other(String),
}

impl Error {
    /// Command error for a store load that ended with `message`.
    ///
    /// Upstream failures read `Error: <status> <reason>`; the prefix is dropped
    /// since the top-level report adds its own.
    pub fn load(message: &str) -> Self {
        Error::Load(message.strip_prefix("Error: ").unwrap_or(message).to_string())
    }
}

/// Errors raised while talking to the upstream API or the inbound endpoint
#[derive(Debug, Error)]
pub enum ApiError {
    /// Upstream answered with a non-success status. Never retried.
    #[error("Error: {status} {reason}")]
    Upstream { status: u16, reason: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    /// Message relayed from the `{error}` body of the airports endpoint
    #[error("{0}")]
    Endpoint(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Network("Request timed out".to_string())
        } else if err.is_connect() {
            ApiError::Network("Failed to connect to API".to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to save configuration: {0}")]
    SaveError(String),

    #[error("Access key not configured. Set AVIATION_STACK_API_KEY or `access_key` in the config file.")]
    MissingApiKey,

    #[error("API base URL not configured. Set AVIATION_API_BASE_URL or `api_base_url` in the config file.")]
    MissingBaseUrl,
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

/// Client storage and cache errors
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Could not determine cache directory")]
    NoHome,

    #[error("Cache I/O error: {0}")]
    Io(String),

    #[error("Cache database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Failed to serialize cache entry: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage quota exceeded ({needed} bytes needed, quota is {quota} bytes)")]
    QuotaExceeded { needed: usize, quota: usize },

    #[error("Corrupt cache entry: {0}")]
    Corrupt(String),
}
