//! CLI command definitions and handlers

use clap::{Parser, Subcommand};

pub mod airport;
pub mod args;
pub mod cache;
pub mod context;
pub mod history;
pub mod init;
pub mod search;
pub mod serve;
pub mod status;

pub use args::{DetailTab, GlobalOptions, OutputFormat};
pub use context::CommandContext;

/// Airport search - browse and search the Aviationstack airport directory
#[derive(Parser, Debug)]
#[command(name = "airport-search")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (pretty, table, json)
    #[arg(
        long,
        global = true,
        env = "AIRPORT_SEARCH_FORMAT",
        default_value = "pretty",
        hide_env = true,
        hide_possible_values = true
    )]
    pub format: OutputFormat,

    /// Override config file location
    #[arg(long, global = true, env = "AIRPORT_SEARCH_CONFIG", hide_env = true)]
    pub config: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true, env = "AIRPORT_SEARCH_DEBUG", hide_env = true)]
    pub debug: bool,

    /// Bypass the local response cache
    #[arg(long, global = true, env = "AIRPORT_SEARCH_NO_CACHE", hide_env = true)]
    pub no_cache: bool,

    /// Fetch through a running airport-search server (e.g. http://localhost:3000)
    #[arg(long, global = true, env = "AIRPORT_SEARCH_API_URL", hide_env = true)]
    pub api_url: Option<String>,

    /// Directory for local storage (cache and search history)
    #[arg(long, global = true, env = "AIRPORT_SEARCH_DATA_DIR", hide_env = true)]
    pub data_dir: Option<String>,

    /// Upstream API base URL
    #[arg(long, global = true, env = "AVIATION_API_BASE_URL", hide_env = true)]
    pub base_url: Option<String>,

    /// Upstream API access key
    #[arg(
        long,
        global = true,
        env = "AVIATION_STACK_API_KEY",
        hide_env = true,
        hide_env_values = true
    )]
    pub access_key: Option<String>,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP API (GET /api/airports)
    Serve {
        /// Address to listen on (defaults to server.bind from config)
        #[arg(long)]
        bind: Option<String>,
    },

    /// List airports, one page at a time
    List {
        /// Filter by IATA code or name (case-insensitive substring)
        #[arg(long, short = 'q')]
        query: Option<String>,

        /// Page to show (1-based)
        #[arg(long, short = 'p', default_value = "1")]
        page: usize,
    },

    /// Show one airport by IATA code and record it in history
    Show {
        /// IATA code (case-insensitive)
        iata: String,

        /// Section to show
        #[arg(long, value_enum, default_value = "all")]
        tab: DetailTab,
    },

    /// Interactive search: read queries from stdin, one per line
    Search,

    /// Show recently viewed airports
    History,

    /// Write a config file from the current flags and environment
    Init,

    /// Show configuration and storage status
    Status,

    /// Manage the local response cache
    #[command(subcommand)]
    Cache(CacheCommands),

    /// Display version information
    Version,
}

/// Cache management subcommands
#[derive(Subcommand, Debug)]
pub enum CacheCommands {
    /// Show cache statistics
    Status,

    /// Remove all cached responses (search history is kept)
    Clear,

    /// Print the storage directory
    Path,
}
