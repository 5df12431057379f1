//! Snapshot assembly: concurrent per-symbol fetches joined into one snapshot.
//!
//! One scoped thread per registry entry calls the [`QuoteFetcher`] and reports
//! `(commodity, result)` over a crossbeam channel. The orchestrator waits for exactly
//! one report per symbol before assembling, so the snapshot is built only after every
//! fetch has either succeeded or been replaced by its fallback. A fetcher that panics
//! is reported as an upstream failure for its symbol.
//!
//! A refresh fails as a whole only when no primary symbol could be fetched live; the
//! caller then decides between a stale snapshot and an aggregation failure.

use std::any::Any;
use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;

use chrono::Utc;
use crossbeam_channel::unbounded;
use energy_common::{Commodity, EnergyError, Quote, Result, Snapshot, SymbolRegistry};
use log::{debug, info, warn};

use crate::fetcher::QuoteFetcher;
use crate::model::estimator;
use crate::model::fallback::FallbackProvider;
use crate::model::spreads;

/// Builds snapshots from the upstream provider.
pub struct Refresher {
    fetcher: Arc<dyn QuoteFetcher>,
    registry: SymbolRegistry,
    fallback: FallbackProvider,
}

impl Refresher {
    /// Create a refresher over `registry` using `fetcher` for live quotes.
    pub fn new(fetcher: Arc<dyn QuoteFetcher>, registry: SymbolRegistry) -> Self {
        Self {
            fetcher,
            registry,
            fallback: FallbackProvider,
        }
    }

    /// Fetch every registered symbol concurrently and collect one result per symbol.
    pub fn fetch_all(&self) -> Result<Vec<(Commodity, Result<Quote>)>> {
        let (result_tx, result_rx) = unbounded::<(Commodity, Result<Quote>)>();

        thread::scope(|scope| {
            for (commodity, ticker) in self.registry.iter() {
                let result_tx = result_tx.clone();
                let fetcher = Arc::clone(&self.fetcher);
                scope.spawn(move || {
                    let result = panic::catch_unwind(AssertUnwindSafe(|| fetcher.fetch(ticker)))
                        .unwrap_or_else(|payload| {
                            Err(EnergyError::upstream(
                                ticker,
                                format!("fetch panicked: {}", panic_message(payload.as_ref())),
                            ))
                        });
                    if result_tx.send((commodity, result)).is_err() {
                        warn!("{}: result dropped, receiver closed", commodity);
                    }
                });
            }
        });
        drop(result_tx);

        let mut results = Vec::with_capacity(self.registry.len());
        for _ in 0..self.registry.len() {
            let report = result_rx
                .recv()
                .map_err(|e| EnergyError::ChannelRecv(e.to_string()))?;
            results.push(report);
        }
        Ok(results)
    }

    /// Assemble a complete snapshot, substituting fallbacks for failed symbols.
    ///
    /// Fails with [`EnergyError::AggregationFailure`] when every fetch failed.
    pub fn assemble(&self) -> Result<Snapshot> {
        let results = self.fetch_all()?;
        let total = results.len();

        let mut quotes: BTreeMap<Commodity, Quote> = BTreeMap::new();
        let mut live = 0usize;
        let mut last_failure = None;

        for (commodity, result) in results {
            match result {
                Ok(quote) => {
                    debug!("{}: live {:.2}", commodity, quote.price);
                    live += 1;
                    quotes.insert(commodity, quote);
                }
                Err(e) => {
                    warn!("{}: upstream failed, using fallback quote: {}", commodity, e);
                    quotes.insert(commodity, self.fallback.fallback(commodity));
                    last_failure = Some(e);
                }
            }
        }

        if live == 0 {
            let reason = match last_failure {
                Some(e) => format!("all {} upstream fetches failed; last error: {}", total, e),
                None => "no symbols registered".to_string(),
            };
            return Err(EnergyError::AggregationFailure(reason));
        }

        let benchmark = quotes
            .get(&Commodity::Brent)
            .filter(|quote| quote.is_available())
            .map(|quote| quote.price);
        for (commodity, quote) in estimator::estimate_all(benchmark) {
            quotes.insert(commodity, quote);
        }

        let spreads = spreads::calculate(&quotes);
        info!("Snapshot assembled: {}/{} symbols live", live, total);
        Ok(Snapshot::new(Utc::now(), quotes, spreads))
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}
