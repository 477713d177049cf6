//! HTTP server command

use std::sync::Arc;

use tokio::net::TcpListener;

use crate::cache::CachedAirportsClient;
use crate::cli::GlobalOptions;
use crate::cli::context::load_config;
use crate::client::AviationStackClient;
use crate::error::Result;
use crate::server::{self, AppState};

/// Serve `/api/airports` until interrupted.
///
/// `--no-cache` disables the in-process response cache.
pub async fn run(opts: &GlobalOptions, bind: Option<&str>) -> Result<()> {
    let config = load_config(opts)?;
    let addr = bind.unwrap_or(&config.server.bind).to_string();

    if config.access_key.is_none() {
        log::warn!("No access key configured; requests will fail until one is set");
    }

    let upstream = AviationStackClient::new(config.api_base_url, config.access_key)?;
    let client = CachedAirportsClient::new(upstream, !opts.no_cache);

    let listener = TcpListener::bind(&addr).await?;
    println!("Serving airports on http://{}", listener.local_addr()?);

    server::serve(listener, AppState::new(Arc::new(client))).await
}
