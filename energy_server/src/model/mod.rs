//! Domain models and pure computations for the dashboard server.
//!
//! This module groups the pieces that do not talk to the network:
//! - `fallback` — hardcoded last-known-good quotes.
//! - `estimator` — constant-offset estimates for products not quoted upstream.
//! - `spreads` — spread and crack-spread metrics.
//! - `cache` — the in-memory snapshot cache and its freshness states.

pub mod cache;
pub mod estimator;
pub mod fallback;
pub mod spreads;
