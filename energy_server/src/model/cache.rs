//! In-memory holder for the last assembled dashboard snapshot.
//!
//! The cache moves through three states:
//!
//! - `Empty` — nothing has been assembled since startup.
//! - `Fresh` — the held snapshot is younger than the freshness window.
//! - `Stale` — the held snapshot is older than the window but still served when a
//!   refresh fails.
//!
//! Only [`AggregateCache::set`] changes the held snapshot, and only by replacing it
//! wholesale. A failed refresh never touches the cache, so there is no error state.
//!
//! Design notes:
//! - Time is measured with a monotonic [`Clock`], immune to wall-clock changes.
//! - The entry sits behind an `RwLock` and snapshots are shared as `Arc`s: readers
//!   either see the previous snapshot or the new one, never a partial value.
//! - A poisoned lock is recovered rather than propagated; the guarded value is a
//!   single `Option` swap and cannot be left half-written.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{Duration, Instant};

use energy_common::Snapshot;

use crate::clock::{Clock, SystemClock};

/// Freshness window used by the server unless configured otherwise.
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(5 * 60);

/// Observable cache state for a given freshness window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    /// No snapshot yet.
    Empty,
    /// Snapshot within the freshness window.
    Fresh,
    /// Snapshot older than the freshness window.
    Stale,
}

/// Snapshot plus the instant it was stored.
struct CacheEntry {
    snapshot: Arc<Snapshot>,
    created_at: Instant,
}

/// Process-lifetime cache of the most recent snapshot.
pub struct AggregateCache {
    entry: RwLock<Option<CacheEntry>>,
    clock: Arc<dyn Clock>,
}

impl AggregateCache {
    /// Empty cache on the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Empty cache on the given clock.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entry: RwLock::new(None),
            clock,
        }
    }

    /// Current snapshot regardless of age.
    pub fn get(&self) -> Option<Arc<Snapshot>> {
        self.read().as_ref().map(|entry| Arc::clone(&entry.snapshot))
    }

    /// Replace the held snapshot and restart its age. Returns the shared handle.
    pub fn set(&self, snapshot: Snapshot) -> Arc<Snapshot> {
        let snapshot = Arc::new(snapshot);
        let entry = CacheEntry {
            snapshot: Arc::clone(&snapshot),
            created_at: self.clock.now(),
        };
        *self.write() = Some(entry);
        snapshot
    }

    /// `true` if a snapshot exists and is younger than `max_age`.
    pub fn is_fresh(&self, max_age: Duration) -> bool {
        self.state(max_age) == CacheState::Fresh
    }

    /// Snapshot only if it is fresh; checked under a single read lock.
    pub fn fresh(&self, max_age: Duration) -> Option<Arc<Snapshot>> {
        let now = self.clock.now();
        self.read()
            .as_ref()
            .filter(|entry| Self::within(entry, now, max_age))
            .map(|entry| Arc::clone(&entry.snapshot))
    }

    /// Classify the cache for `max_age`.
    pub fn state(&self, max_age: Duration) -> CacheState {
        let now = self.clock.now();
        match self.read().as_ref() {
            None => CacheState::Empty,
            Some(entry) if Self::within(entry, now, max_age) => CacheState::Fresh,
            Some(_) => CacheState::Stale,
        }
    }

    /// Age of the held snapshot.
    pub fn age(&self) -> Option<Duration> {
        let now = self.clock.now();
        self.read()
            .as_ref()
            .map(|entry| now.saturating_duration_since(entry.created_at))
    }

    fn within(entry: &CacheEntry, now: Instant, max_age: Duration) -> bool {
        now.saturating_duration_since(entry.created_at) < max_age
    }

    fn read(&self) -> RwLockReadGuard<'_, Option<CacheEntry>> {
        self.entry.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Option<CacheEntry>> {
        self.entry.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for AggregateCache {
    fn default() -> Self {
        Self::new()
    }
}
