//! Dashboard snapshot: one immutable, fully assembled view of quotes and spreads.
use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::commodities::Commodity;
use crate::quote::Quote;

/// Everything the dashboard endpoint returns.
///
/// A snapshot is never patched in place; each refresh builds a new one that
/// replaces the previous value wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Assembly time as an RFC 3339 / ISO-8601 UTC string.
    pub timestamp: String,
    /// Primary and derived quotes keyed by commodity.
    pub quotes: BTreeMap<Commodity, Quote>,
    /// Named spread metrics, $/bbl.
    pub spreads: BTreeMap<String, f64>,
}

impl Snapshot {
    /// Build a snapshot stamped with `at`.
    pub fn new(
        at: DateTime<Utc>,
        quotes: BTreeMap<Commodity, Quote>,
        spreads: BTreeMap<String, f64>,
    ) -> Self {
        Snapshot {
            timestamp: at.to_rfc3339_opts(SecondsFormat::Millis, true),
            quotes,
            spreads,
        }
    }

    /// Quote for `commodity`, if present.
    pub fn quote(&self, commodity: Commodity) -> Option<&Quote> {
        self.quotes.get(&commodity)
    }

    /// Spread value by name, if present.
    pub fn spread(&self, name: &str) -> Option<f64> {
        self.spreads.get(name).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quote::QuoteSource;
    use chrono::TimeZone;

    #[test]
    fn serializes_to_dashboard_shape() {
        let at = Utc.with_ymd_and_hms(2026, 3, 2, 14, 30, 0).unwrap();
        let mut quotes = BTreeMap::new();
        quotes.insert(
            Commodity::Wti,
            Quote::from_closes(66.5, 66.0, QuoteSource::Live),
        );
        let mut spreads = BTreeMap::new();
        spreads.insert("brent_wti".to_string(), 3.7);

        let snapshot = Snapshot::new(at, quotes, spreads);
        let value = serde_json::to_value(&snapshot).unwrap();

        assert_eq!(value["timestamp"], "2026-03-02T14:30:00.000Z");
        assert_eq!(value["quotes"]["wti"]["price"], 66.5);
        assert_eq!(value["spreads"]["brent_wti"], 3.7);

        let back: Snapshot = serde_json::from_value(value).unwrap();
        assert_eq!(back, snapshot);
    }
}
