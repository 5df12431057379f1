//!
//! Common types and utilities shared by the energy dashboard server and client.
//!
//! This crate aggregates:
//! - `error` — unified error type `EnergyError` used across the workspace.
//! - `result` — handy `Result<T, EnergyError>` alias.
//! - `commodities` — commodity keys, the upstream symbol registry and list-file parsing.
//! - `quote` — the per-commodity `Quote` and its provenance tag.
//! - `snapshot` — the immutable dashboard `Snapshot`.
//! - `net` — networking constants and small helpers.
#![warn(missing_docs)]
pub mod commodities;
pub mod error;
pub mod net;
pub mod quote;
pub mod result;
pub mod snapshot;

pub use commodities::{Commodity, SymbolRegistry};
pub use error::EnergyError;
pub use quote::{Quote, QuoteSource};
pub use result::Result;
pub use snapshot::Snapshot;
