//! Polling the dashboard server over HTTP.
//!
//! This module provides a small helper for fetching the snapshot endpoint and for
//! running a background-friendly poll loop that stops on a shared shutdown flag.
use energy_common::net::{ENERGY_DATA_PATH, endpoint_url};
use energy_common::{EnergyError, Snapshot};
use log::{debug, error, info};
use reqwest::blocking::Client;
use serde::Deserialize;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::thread;
use std::time::Duration;

/// Request timeout for a single poll.
const REQUEST_TIMEOUT_SECS: u64 = 15;
/// Granularity at which the sleep between polls checks for shutdown.
const SHUTDOWN_CHECK_MS: u64 = 200;

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Helper type for fetching snapshots from the server.
pub struct SnapshotPoller {
    client: Client,
    url: String,
}

impl SnapshotPoller {
    /// Create a poller against the server at `server_url`.
    pub fn new(server_url: &str) -> Result<Self, EnergyError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            url: endpoint_url(server_url, ENERGY_DATA_PATH),
        })
    }

    /// Fetch one snapshot. A server-side `{error}` body is surfaced as an
    /// aggregation failure.
    pub fn fetch(&self) -> Result<Snapshot, EnergyError> {
        debug!("GET {}", self.url);
        let response = self.client.get(&self.url).send()?;
        let status = response.status();
        let bytes = response.bytes()?;

        if status.is_success() {
            return Ok(serde_json::from_slice(&bytes)?);
        }
        let message = serde_json::from_slice::<ErrorBody>(&bytes)
            .map(|body| body.error)
            .unwrap_or_else(|_| format!("HTTP {}", status));
        Err(EnergyError::AggregationFailure(message))
    }

    /// Poll every `interval` until `shutdown` is set, handing each snapshot to
    /// `on_snapshot`. Fetch errors are logged and polling continues.
    pub fn run<F>(&self, interval: Duration, shutdown: Arc<AtomicBool>, mut on_snapshot: F)
    where
        F: FnMut(&Snapshot),
    {
        info!("Polling {} every {}s", self.url, interval.as_secs());
        while !shutdown.load(Ordering::Relaxed) {
            match self.fetch() {
                Ok(snapshot) => on_snapshot(&snapshot),
                Err(e) => error!("Poll failed: {}", e),
            }
            sleep_unless_shutdown(interval, &shutdown);
        }
        info!("Poll loop stopping...");
    }
}

fn sleep_unless_shutdown(total: Duration, shutdown: &AtomicBool) {
    let step = Duration::from_millis(SHUTDOWN_CHECK_MS);
    let mut slept = Duration::ZERO;
    while slept < total && !shutdown.load(Ordering::Relaxed) {
        let nap = step.min(total - slept);
        thread::sleep(nap);
        slept += nap;
    }
}
