//! Quote data model shared by server and client.
//!
//! A `Quote` is the per-commodity payload of a dashboard snapshot: the latest price,
//! the previous close and the day change derived from them, plus a provenance tag
//! telling consumers whether the numbers are live, a static fallback, or an estimate.

use serde::{Deserialize, Serialize};
use strum_macros::Display;

/// Where the numbers in a [`Quote`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum QuoteSource {
    /// Retrieved from the upstream quote provider during the last refresh.
    Live,
    /// Hardcoded last-known-good value used after an upstream failure.
    Fallback,
    /// Synthesized from a benchmark price with a constant offset.
    Estimated,
}

/// Market quote for a single commodity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// Latest price.
    pub price: f64,
    /// `price - previous_close`.
    pub change: f64,
    /// `change / previous_close * 100`, or 0 when the previous close is 0.
    pub change_percent: f64,
    /// Previous session close.
    pub previous_close: f64,
    /// Provenance of the values above.
    pub source: QuoteSource,
}

impl Quote {
    /// Build a quote from a price and previous close, deriving `change` and
    /// `change_percent` so the two always agree.
    pub fn from_closes(price: f64, previous_close: f64, source: QuoteSource) -> Self {
        let change = price - previous_close;
        Quote {
            price,
            change,
            change_percent: percent_change(change, previous_close),
            previous_close,
            source,
        }
    }

    /// The all-zero "unavailable" quote.
    pub fn zero(source: QuoteSource) -> Self {
        Quote {
            price: 0.0,
            change: 0.0,
            change_percent: 0.0,
            previous_close: 0.0,
            source,
        }
    }

    /// A price of exactly 0 marks the quote as unavailable.
    pub fn is_available(&self) -> bool {
        self.price != 0.0
    }
}

/// `change / base * 100`, defined as 0 when `base` is 0.
pub fn percent_change(change: f64, base: f64) -> f64 {
    if base == 0.0 {
        0.0
    } else {
        change / base * 100.0
    }
}

/// Round to cents.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
