//! The object the HTTP layer reads from: cache in front of the refresher.
//!
//! Concurrency discipline:
//! - A fresh cached snapshot is returned under the cache's read lock only.
//! - Refreshes are serialized by `refresh_gate`. A reader that queued behind a refresh
//!   that completed while it waited takes that refresh's outcome instead of starting
//!   another upstream batch, so N concurrent misses cost one batch.
//! - `completed` is bumped after the cache (or `last_failure`) is updated, so a reader
//!   that observes the bump also observes the outcome.
//! - A panic during assembly counts as a failed refresh. Neither lock guards data a
//!   panic could leave half-written, so both are taken through poison recovery.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use energy_common::{EnergyError, Result, Snapshot};
use log::{debug, error, warn};

use crate::model::cache::{AggregateCache, CacheState};
use crate::refresher::Refresher;

/// Cached, single-flight access to dashboard snapshots.
pub struct EnergyService {
    refresher: Refresher,
    cache: AggregateCache,
    max_age: Duration,
    refresh_gate: Mutex<()>,
    completed: AtomicU64,
    last_failure: Mutex<Option<String>>,
}

impl EnergyService {
    /// Build a service serving snapshots up to `max_age` old.
    pub fn new(refresher: Refresher, cache: AggregateCache, max_age: Duration) -> Self {
        Self {
            refresher,
            cache,
            max_age,
            refresh_gate: Mutex::new(()),
            completed: AtomicU64::new(0),
            last_failure: Mutex::new(None),
        }
    }

    /// Current snapshot, refreshing first if the cached one is missing or stale.
    ///
    /// Errors only when no snapshot was ever assembled and the refresh fails.
    pub fn snapshot(&self) -> Result<Arc<Snapshot>> {
        if let Some(snapshot) = self.cache.fresh(self.max_age) {
            debug!("Serving cached snapshot from {}", snapshot.timestamp);
            return Ok(snapshot);
        }

        let seen = self.completed.load(Ordering::Acquire);
        let _gate = lock(&self.refresh_gate);

        if self.completed.load(Ordering::Acquire) != seen {
            debug!("Joined a refresh that completed while waiting");
            return self.cached_or_failure();
        }
        if let Some(snapshot) = self.cache.fresh(self.max_age) {
            return Ok(snapshot);
        }

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.refresher.assemble()))
            .unwrap_or_else(|_| {
                Err(EnergyError::AggregationFailure(
                    "snapshot assembly panicked".to_string(),
                ))
            });
        let served = match outcome {
            Ok(snapshot) => {
                *lock(&self.last_failure) = None;
                Ok(self.cache.set(snapshot))
            }
            Err(e) => {
                error!("Refresh failed: {}", e);
                *lock(&self.last_failure) = Some(e.to_string());
                match self.cache.get() {
                    Some(stale) => {
                        warn!("Serving stale snapshot from {}", stale.timestamp);
                        Ok(stale)
                    }
                    None => Err(e),
                }
            }
        };
        self.completed.fetch_add(1, Ordering::Release);
        served
    }

    /// Number of refresh attempts completed so far.
    pub fn refresh_count(&self) -> u64 {
        self.completed.load(Ordering::Acquire)
    }

    /// Cache state for this service's freshness window.
    pub fn cache_state(&self) -> CacheState {
        self.cache.state(self.max_age)
    }

    fn cached_or_failure(&self) -> Result<Arc<Snapshot>> {
        match self.cache.get() {
            Some(snapshot) => Ok(snapshot),
            None => {
                let reason = lock(&self.last_failure)
                    .clone()
                    .unwrap_or_else(|| "no snapshot available".to_string());
                Err(EnergyError::AggregationFailure(reason))
            }
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}
