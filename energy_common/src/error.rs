//! Error types shared between the server and the client.
//!
//! The `EnergyError` enum unifies common failure cases for I/O, serialization,
//! upstream quote retrieval, snapshot aggregation and internal locking, allowing
//! crates to propagate a single error type.
use std::io;
use std::sync::PoisonError;

use thiserror::Error;

/// Unified error type shared by server and client.
#[derive(Error, Debug)]
pub enum EnergyError {
    /// I/O error originating from the standard library or sockets/files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Generic formatting/validation error with a human-readable message.
    #[error("Format error: {0}")]
    Format(String),

    /// Error while parsing a commodity list file into `Commodity` values.
    #[error("Parse commodities file error: {0}")]
    ParseCommoditiesFile(String),

    /// Failure while encoding/decoding JSON via serde_json.
    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// Failure inside the HTTP client (connection, TLS, body decoding, timeout).
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// A single upstream symbol could not be retrieved or its response was malformed.
    #[error("Upstream error for {symbol}: {reason}")]
    Upstream {
        /// Upstream ticker that failed.
        symbol: String,
        /// What went wrong.
        reason: String,
    },

    /// No snapshot can be served: the refresh failed and nothing was cached before.
    #[error("Aggregation failure: {0}")]
    AggregationFailure(String),

    /// Channel receive failed (e.g., sender closed); contains a short context string.
    #[error("Channel receive failed: {0}")]
    ChannelRecv(String),

    /// Error indicating a poisoned mutex/lock was encountered.
    #[error("Mutex Lock Poisoned: {0}")]
    MutexLock(String),

    /// Internal logic error where a commodity key could not be resolved.
    #[error("Internal Logic Error: Commodity not found: {0}")]
    CommodityNotFound(String),
}

impl EnergyError {
    /// Shorthand for building an [`EnergyError::Upstream`].
    pub fn upstream(symbol: impl Into<String>, reason: impl Into<String>) -> Self {
        EnergyError::Upstream {
            symbol: symbol.into(),
            reason: reason.into(),
        }
    }
}

impl<T> From<PoisonError<T>> for EnergyError {
    fn from(err: PoisonError<T>) -> Self {
        EnergyError::MutexLock(err.to_string())
    }
}
