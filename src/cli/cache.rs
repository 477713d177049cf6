//! Cache management commands
//!
//! These act on the persisted response cache only; search history shares the
//! storage file but is never touched here.

use serde::Serialize;

use crate::cache::{CLIENT_CACHE_PREFIX, CacheLimits, StorageStats};
use crate::cli::context::{open_storage, storage_dir};
use crate::cli::{GlobalOptions, OutputFormat};
use crate::error::Result;
use crate::output::{format_json, format_size, format_timestamp_local};

#[derive(Serialize)]
struct CacheStatus {
    #[serde(flatten)]
    stats: StorageStats,
    total_size_human: String,
    ttl_seconds: u64,
    capacity: usize,
    path: String,
}

/// Show cache status/statistics
pub fn status(opts: &GlobalOptions) -> Result<()> {
    let storage = open_storage(opts.data_dir_ref())?;
    let stats = storage.stats(CLIENT_CACHE_PREFIX)?;
    let path = storage_dir(opts.data_dir_ref())?.display().to_string();

    match opts.format {
        OutputFormat::Json => {
            let status = CacheStatus {
                total_size_human: format_size(stats.total_size_bytes),
                ttl_seconds: CacheLimits::TTL.as_secs(),
                capacity: CacheLimits::CLIENT_CAPACITY,
                path,
                stats,
            };
            println!("{}", format_json(&status)?);
        }
        _ => {
            println!("Cache Status");
            println!("────────────────────────────────────────");
            println!("Location:       {}", path);
            println!(
                "Entries:        {} (max {})",
                stats.entries,
                CacheLimits::CLIENT_CAPACITY
            );
            println!("Total size:     {}", format_size(stats.total_size_bytes));
            println!("TTL:            {} min", CacheLimits::TTL.as_secs() / 60);

            if let Some(oldest) = stats.oldest_entry {
                println!("Oldest entry:   {}", format_timestamp_local(oldest));
            }
            if let Some(newest) = stats.newest_entry {
                println!("Newest entry:   {}", format_timestamp_local(newest));
            }
        }
    }

    Ok(())
}

/// Remove every cached response
pub fn clear(opts: &GlobalOptions) -> Result<()> {
    let storage = open_storage(opts.data_dir_ref())?;
    let removed = storage.remove_prefix(CLIENT_CACHE_PREFIX)?;

    match opts.format {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "entries_removed": removed,
                "success": true,
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        _ => {
            if removed > 0 {
                println!("Cleared {} cache entries", removed);
            } else {
                println!("Cache was already empty");
            }
        }
    }

    Ok(())
}

/// Show the storage directory
pub fn path(opts: &GlobalOptions) -> Result<()> {
    println!("{}", storage_dir(opts.data_dir_ref())?.display());
    Ok(())
}
