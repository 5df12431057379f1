//! Command-line and environment configuration for the dashboard server.
//!
//! Every flag can also be set through the environment variable named in its help.
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use energy_common::net::DEFAULT_PORT;

use crate::fetcher::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use crate::model::cache::DEFAULT_MAX_AGE;

/// Parsed command-line arguments.
#[derive(Debug, Clone, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// HTTP port to listen on.
    #[clap(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Address to bind.
    #[clap(long, env = "BIND_ADDRESS", default_value = "0.0.0.0")]
    pub bind: String,

    /// Freshness window for the cached snapshot, in seconds.
    #[clap(long, env = "CACHE_TTL_SECS", default_value_t = DEFAULT_MAX_AGE.as_secs())]
    pub cache_ttl_secs: u64,

    /// Timeout for each upstream quote request, in seconds.
    #[clap(long, env = "UPSTREAM_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT.as_secs())]
    pub upstream_timeout_secs: u64,

    /// Base URL of the chart API.
    #[clap(long, env = "QUOTE_API_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub upstream_base_url: String,

    /// Directory with the dashboard page and assets, served at `/`.
    #[clap(long, env = "STATIC_DIR")]
    pub static_dir: Option<PathBuf>,
}

impl Args {
    /// Freshness window.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Per-request upstream timeout.
    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }
}
