//! Global CLI options shared across all commands

use crate::cli::{Cli, OutputFormat};

/// Global CLI options passed to all command handlers.
///
/// # Precedence
///
/// CLI flag > environment variable > config file > default. This struct
/// captures the CLI/env layer; config file values are merged in
/// `CommandContext`.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Output format (pretty, table, json)
    pub format: OutputFormat,

    /// Custom config file path (defaults to ~/.airport-search/config.yaml)
    pub config: Option<String>,

    /// Skip the persisted response cache
    pub no_cache: bool,

    /// Fetch through a running `/api/airports` endpoint instead of upstream
    pub api_url: Option<String>,

    /// Directory of the durable client storage
    pub data_dir: Option<String>,

    /// Upstream base URL override
    pub base_url: Option<String>,

    /// Upstream access key override
    pub access_key: Option<String>,
}

impl GlobalOptions {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            format: cli.format,
            config: cli.config.clone(),
            no_cache: cli.no_cache,
            api_url: cli.api_url.clone(),
            data_dir: cli.data_dir.clone(),
            base_url: cli.base_url.clone(),
            access_key: cli.access_key.clone(),
        }
    }

    pub fn config_ref(&self) -> Option<&str> {
        self.config.as_deref()
    }

    pub fn data_dir_ref(&self) -> Option<&str> {
        self.data_dir.as_deref()
    }
}
