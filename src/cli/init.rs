//! Init command implementation

use std::path::PathBuf;

use colored::Colorize;

use crate::cli::args::GlobalOptions;
use crate::config::Config;
use crate::error::Result;

/// Write a config file from the current flags and environment.
///
/// An existing file is loaded first so settings that were not overridden
/// survive.
pub fn run(opts: &GlobalOptions) -> Result<()> {
    let path = match opts.config_ref() {
        Some(p) => PathBuf::from(p),
        None => Config::default_path()?,
    };

    let mut config = if path.exists() {
        Config::load_from(path.clone())?
    } else {
        Config::default()
    };
    config.apply_overrides(opts.base_url.as_deref(), opts.access_key.as_deref());
    if let Some(url) = &opts.api_url {
        config.client.api_url = Some(url.clone());
    }

    config.save_to(path.clone())?;
    log::debug!("Wrote configuration to {}", path.display());

    println!("{} Configuration saved to: {}", "✓".green(), path.display());
    if config.access_key.is_none() {
        println!(
            "  {} No access key set. Pass --access-key or set AVIATION_STACK_API_KEY.",
            "!".yellow()
        );
    }

    println!("\n{}", "Try running:".bold());
    println!("  {} - Show configuration status", "airport-search status".cyan());
    println!("  {} - Browse airports", "airport-search list".cyan());

    Ok(())
}
