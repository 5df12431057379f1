#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use energy_common::{EnergyError, Quote, QuoteSource, Result, SymbolRegistry};
use energy_server::clock::ManualClock;
use energy_server::fetcher::QuoteFetcher;
use energy_server::model::cache::AggregateCache;
use energy_server::{EnergyService, Refresher};

pub const WINDOW: Duration = Duration::from_secs(5 * 60);

/// Fetcher with canned prices, switchable failures and a call counter.
pub struct ScriptedFetcher {
    fail_all: AtomicBool,
    failing: Mutex<HashSet<String>>,
    panicking: Mutex<HashSet<String>>,
    latency: Duration,
    calls: AtomicUsize,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::with_latency(Duration::ZERO)
    }

    pub fn with_latency(latency: Duration) -> Self {
        Self {
            fail_all: AtomicBool::new(false),
            failing: Mutex::new(HashSet::new()),
            panicking: Mutex::new(HashSet::new()),
            latency,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn fail_all(&self, fail: bool) {
        self.fail_all.store(fail, Ordering::SeqCst);
    }

    pub fn fail_ticker(&self, ticker: &str) {
        self.failing.lock().unwrap().insert(ticker.to_string());
    }

    pub fn panic_on(&self, ticker: &str) {
        self.panicking.lock().unwrap().insert(ticker.to_string());
    }

    pub fn stop_panicking(&self) {
        self.panicking.lock().unwrap().clear();
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl QuoteFetcher for ScriptedFetcher {
    fn fetch(&self, ticker: &str) -> Result<Quote> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.latency.is_zero() {
            thread::sleep(self.latency);
        }
        let panics = self.panicking.lock().unwrap().contains(ticker);
        if panics {
            panic!("scripted panic for {}", ticker);
        }
        if self.fail_all.load(Ordering::SeqCst) || self.failing.lock().unwrap().contains(ticker) {
            return Err(EnergyError::upstream(ticker, "timed out"));
        }
        let (price, previous_close) = match ticker {
            "CL=F" => (66.50, 66.00),
            "BZ=F" => (70.20, 69.80),
            "RB=F" => (2.28, 2.26),
            "HO=F" => (2.55, 2.50),
            other => return Err(EnergyError::upstream(other, "unknown ticker")),
        };
        Ok(Quote::from_closes(price, previous_close, QuoteSource::Live))
    }
}

pub struct Harness {
    pub fetcher: Arc<ScriptedFetcher>,
    pub clock: Arc<ManualClock>,
    pub service: Arc<EnergyService>,
}

pub fn harness(fetcher: ScriptedFetcher) -> Harness {
    let fetcher = Arc::new(fetcher);
    let clock = Arc::new(ManualClock::new());
    let service = Arc::new(EnergyService::new(
        Refresher::new(fetcher.clone(), SymbolRegistry::standard()),
        AggregateCache::with_clock(clock.clone()),
        WINDOW,
    ));
    Harness {
        fetcher,
        clock,
        service,
    }
}
