//! Energy Client — polls the dashboard server and logs the snapshot as a small table.
//!
//! It optionally reads a list of commodity keys from a text file to restrict which
//! quotes are shown, polls `GET /api/energy-data` at a fixed interval and stops on Ctrl+C.
//!
//! Usage example (CLI):
//! ```bash
//! energy_client --server-url http://192.168.0.10:3000 --interval-secs 30 --path ./commodities.txt
//! ```
//!
//! The commodity file holds one key per line (`wti`, `brent`, `rbob`, `heating_oil`, ...);
//! blank lines and `#` comments are ignored.
#![warn(missing_docs)]
mod args;
mod poller;
mod table;

use crate::args::Args;
use crate::poller::SnapshotPoller;
use clap::Parser;
use energy_common::EnergyError;
use energy_common::Result;
use energy_common::commodities::{Commodity, CommodityParser};
use log::{info, warn};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::time::Duration;

fn main() -> Result<(), EnergyError> {
    init_logger();
    let args = Args::parse();

    let filter = match args.path.as_deref() {
        Some(raw) => load_filter(&normalize_path(raw))?,
        None => Vec::new(),
    };
    if !filter.is_empty() {
        info!("Showing commodities: {:?}", filter);
    }

    let poller = SnapshotPoller::new(args.server_url.trim())?;
    let print = |snapshot: &energy_common::Snapshot| {
        for line in table::render(snapshot, &filter) {
            info!("{}", line);
        }
    };

    if args.once {
        print(&poller.fetch()?);
        return Ok(());
    }

    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let shutdown = shutdown.clone();
        ctrlc::set_handler(move || {
            info!("Ctrl+C received. Shutting down client...");
            shutdown.store(true, Ordering::SeqCst);
        })
        .map_err(|e| EnergyError::Format(format!("Error setting Ctrl+C handler: {}", e)))?;
    }

    info!("Client is running. Press Ctrl+C to exit.");
    poller.run(Duration::from_secs(args.interval_secs.max(1)), shutdown, print);
    Ok(())
}

fn load_filter(path: &PathBuf) -> Result<Vec<Commodity>, EnergyError> {
    if !is_file_exist(path) {
        warn!("Commodity file {:?} not found, showing everything", path);
        return Ok(Vec::new());
    }
    let file = File::open(path)?;
    Commodity::parse_from_file(BufReader::new(file))
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}

/// Normalize a CLI-provided path string by trimming whitespace and matching quotes.
///
/// This allows passing Windows paths in quotes without breaking parsing.
fn normalize_path(raw: &str) -> PathBuf {
    let trimmed = raw.trim();
    let no_quotes = trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(trimmed);
    PathBuf::from(no_quotes)
}

/// Returns `true` if the provided path exists and is a regular file.
fn is_file_exist(path: &PathBuf) -> bool {
    path.exists() && path.is_file()
}
