//! Energy dashboard HTTP server.
//!
//! Wires the pieces of the `energy_server` library together:
//!
//! - `ChartClient` — blocking upstream client, built before the async runtime starts.
//! - `Refresher` — fetches the registered symbols concurrently and assembles snapshots.
//! - `EnergyService` — serves the cached snapshot and refreshes it on expiry.
//! - `http::router` — `GET /api/energy-data`, `GET /health` and optional static files.
//!
//! Errors during a refresh are logged and absorbed by the service; only startup
//! failures (bad address, TLS setup) end the process.
#![warn(missing_docs)]
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use clap::Parser;
use energy_common::{EnergyError, Result, SymbolRegistry};
use energy_server::config::Args;
use energy_server::fetcher::ChartClient;
use energy_server::http;
use energy_server::model::cache::AggregateCache;
use energy_server::{EnergyService, Refresher};
use log::info;

fn main() -> Result<(), EnergyError> {
    init_logger();
    let args = Args::parse();

    let fetcher = Arc::new(ChartClient::new(
        &args.upstream_base_url,
        args.upstream_timeout(),
    )?);
    let registry = SymbolRegistry::standard();
    for (commodity, ticker) in registry.iter() {
        info!("Tracking {} as {}", commodity, ticker);
    }

    let service = Arc::new(EnergyService::new(
        Refresher::new(fetcher, registry),
        AggregateCache::new(),
        args.cache_ttl(),
    ));

    let bind_ip: IpAddr = args
        .bind
        .parse()
        .map_err(|e| EnergyError::Format(format!("Invalid bind address {}: {}", args.bind, e)))?;
    let bind_addr = SocketAddr::new(bind_ip, args.port);
    let app = http::router(Arc::clone(&service), args.static_dir.clone());

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(async move {
        let listener = tokio::net::TcpListener::bind(bind_addr).await?;
        info!("Energy dashboard listening on {}", listener.local_addr()?);
        info!(
            "Snapshot freshness window: {}s",
            args.cache_ttl().as_secs()
        );
        axum::serve(listener, app).await?;
        Ok::<(), EnergyError>(())
    })?;

    Ok(())
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
