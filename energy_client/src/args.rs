//! Command-line arguments for the dashboard client.
//!
//! This module defines the CLI interface using `clap`. See `main` for end-to-end usage.
use clap::Parser;

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Base URL of the dashboard server.
    #[clap(long, env = "ENERGY_SERVER_URL", default_value = "http://127.0.0.1:3000")]
    pub server_url: String,

    /// Seconds between polls.
    #[clap(long, default_value_t = 60)]
    pub interval_secs: u64,

    /// Optional file listing the commodities to display, one key per line.
    #[clap(long)]
    pub path: Option<String>,

    /// Fetch once and exit.
    #[clap(long)]
    pub once: bool,
}
