//! Energy dashboard server library.
//!
//! Fetches front-month energy futures quotes, fills gaps with fallbacks and estimates,
//! derives spread metrics and caches the resulting snapshot for the HTTP layer:
//!
//! - `fetcher` — upstream chart API client behind the `QuoteFetcher` trait.
//! - `model` — fallbacks, estimates, spreads and the snapshot cache.
//! - `refresher` — concurrent fetch and snapshot assembly.
//! - `service` — cache-first, single-flight snapshot access.
//! - `http` — axum router exposing the snapshot.
//! - `config` — CLI/environment settings.
//! - `clock` — monotonic time source.
#![warn(missing_docs)]
pub mod clock;
pub mod config;
pub mod fetcher;
pub mod http;
pub mod model;
pub mod refresher;
pub mod service;

pub use refresher::Refresher;
pub use service::EnergyService;
