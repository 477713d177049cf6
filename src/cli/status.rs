//! Status command implementation

use colored::Colorize;

use crate::cache::CLIENT_CACHE_PREFIX;
use crate::cli::GlobalOptions;
use crate::cli::context::{load_config, open_storage, storage_dir};
use crate::config::Config;
use crate::error::Result;
use crate::store::SearchHistory;

/// Display configuration and local storage status
pub fn run(opts: &GlobalOptions) -> Result<()> {
    println!("{}\n", "Airport Search Status".bold());

    let config_path = match opts.config_ref() {
        Some(path) => path.to_string(),
        None => Config::default_path()?.display().to_string(),
    };
    println!("Config file: {}", config_path.cyan());

    let config = load_config(opts)?;

    match config.api_base_url {
        Some(ref url) => println!("{} Upstream base URL: {}", "✓".green(), url),
        None => {
            println!("{} Upstream base URL not configured", "✗".red());
            println!("  → Set AVIATION_API_BASE_URL or api_base_url in the config file");
        }
    }

    if config.access_key.is_some() {
        println!("{} Access key configured", "✓".green());
    } else {
        println!("{} Access key not configured", "✗".red());
        println!("  → Set AVIATION_STACK_API_KEY or access_key in the config file");
    }

    match opts.api_url.as_ref().or(config.client.api_url.as_ref()) {
        Some(url) => println!("{} Fetching through: {}", "○".dimmed(), url.cyan()),
        None => println!("{} Fetching upstream directly", "○".dimmed()),
    }

    println!();
    let dir = storage_dir(opts.data_dir_ref())?;
    println!("Storage: {}", dir.display().to_string().cyan());

    match open_storage(opts.data_dir_ref()) {
        Ok(storage) => {
            let storage = std::sync::Arc::new(storage);
            let cached = storage.keys(CLIENT_CACHE_PREFIX)?.len();
            let history = SearchHistory::load(storage).items().len();
            println!("  Cached responses: {}", cached);
            println!("  History entries:  {}", history);
        }
        Err(e) => println!("{} Storage unavailable: {}", "⚠".yellow(), e),
    }

    Ok(())
}
