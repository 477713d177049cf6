//! Command execution context
//!
//! Resolves configuration, opens local storage and wires the airport store
//! to its data source, so individual commands only deal with presentation.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::cache::{CachedAirportsClient, LocalStorage};
use crate::cli::{GlobalOptions, OutputFormat};
use crate::client::{AirportsApi, AviationStackClient, EndpointClient};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::store::{AirportStore, StoreField};

/// Where the store gets its data from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// A running `/api/airports` endpoint
    Endpoint(String),
    /// The upstream API, behind the in-process response cache
    Upstream,
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Endpoint(url) => write!(f, "{}", url),
            Self::Upstream => write!(f, "upstream API"),
        }
    }
}

/// Context for command execution: the store and where it fetches from.
pub struct CommandContext {
    /// Airport store, shared so callbacks and tasks can hold it
    pub store: Arc<AirportStore>,
    /// The store's data source, for fetches that bypass the persisted cache
    pub client: Arc<dyn AirportsApi>,
    /// Output format preference
    pub format: OutputFormat,
    /// Where fetches go
    pub source: DataSource,
}

impl CommandContext {
    /// Create a new command context.
    ///
    /// Upstream credentials are not validated here; a missing access key
    /// only fails the fetch that needs it.
    pub fn new(opts: &GlobalOptions) -> Result<Self> {
        let config = load_config(opts)?;
        let storage = Arc::new(
            open_storage(opts.data_dir_ref())?.with_quota(config.client.storage_quota_bytes),
        );

        let api_url = opts.api_url.clone().or_else(|| config.client.api_url.clone());
        let (source, client): (DataSource, Arc<dyn AirportsApi>) = match api_url {
            Some(url) => (
                DataSource::Endpoint(url.clone()),
                Arc::new(EndpointClient::new(url)?),
            ),
            None => {
                let upstream =
                    AviationStackClient::new(config.api_base_url.clone(), config.access_key.clone())?;
                (
                    DataSource::Upstream,
                    Arc::new(CachedAirportsClient::new(upstream, true)),
                )
            }
        };
        log::debug!("Data source: {}", source);

        let store = AirportStore::new(client.clone(), config.client.page_size)
            .with_storage(storage, !opts.no_cache);

        Ok(Self {
            store: Arc::new(store),
            client,
            format: opts.format,
            source,
        })
    }

    /// Fetch the dataset unless it is already loaded, showing a spinner while
    /// the store reports loading. A failed load is returned as an error.
    pub async fn ensure_loaded(&self) -> Result<()> {
        if !self.store.snapshot().all_airports.is_empty() {
            return Ok(());
        }

        let spinner = self.loading_spinner();
        self.store.fetch_airports().await;
        if let Some((ref bar, id)) = spinner {
            self.store.unsubscribe(id);
            bar.finish_and_clear();
        }

        self.check_error()
    }

    /// Turn a stored fetch error into a command error
    pub fn check_error(&self) -> Result<()> {
        match self.store.snapshot().error {
            Some(message) => Err(Error::load(&message)),
            None => Ok(()),
        }
    }

    fn loading_spinner(&self) -> Option<(ProgressBar, crate::store::SubscriptionId)> {
        if self.format != OutputFormat::Pretty {
            return None;
        }

        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            bar.set_style(style);
        }
        bar.set_message(format!("Loading airports from {}...", self.source));

        let handle = bar.clone();
        let id = self.store.subscribe(StoreField::IsLoading, move |state| {
            if state.is_loading {
                handle.enable_steady_tick(Duration::from_millis(100));
            } else {
                handle.finish_and_clear();
            }
        });
        Some((bar, id))
    }
}

/// Config file merged with CLI/env overrides
pub fn load_config(opts: &GlobalOptions) -> Result<Config> {
    let mut config = Config::load_at(opts.config_ref())?;
    config.apply_overrides(opts.base_url.as_deref(), opts.access_key.as_deref());
    Ok(config)
}

/// Storage directory: `--data-dir` or the user cache dir
pub fn storage_dir(data_dir: Option<&str>) -> Result<PathBuf> {
    match data_dir {
        Some(dir) => Ok(PathBuf::from(dir)),
        None => Ok(LocalStorage::storage_dir()?),
    }
}

pub fn open_storage(data_dir: Option<&str>) -> Result<LocalStorage> {
    Ok(LocalStorage::open_at(&storage_dir(data_dir)?)?)
}
