//! Commodity keys, the upstream symbol registry and list-file parsing helpers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::BufRead;
use strum_macros::{Display, EnumString};

use crate::error::EnergyError;

/// Trait providing file parsing for commodity keys.
pub trait CommodityParser {
    /// Parses commodity keys from a buffered reader.
    ///
    /// Each non-empty line is parsed as a single `Commodity` value using `FromStr`.
    /// Lines starting with `#` are comments. Returns an error if any line cannot be parsed.
    fn parse_from_file<R: BufRead>(reader: R) -> Result<Vec<Commodity>, EnergyError>;
}

impl CommodityParser for Commodity {
    fn parse_from_file<R: BufRead>(reader: R) -> Result<Vec<Self>, EnergyError> {
        let mut commodities = Vec::new();

        for line_result in reader.lines() {
            let line = line_result.map_err(EnergyError::Io)?;
            let trimmed_line = line.trim();
            if trimmed_line.is_empty() || trimmed_line.starts_with('#') {
                continue;
            }

            match trimmed_line.parse::<Self>() {
                Ok(commodity) => commodities.push(commodity),
                Err(e) => {
                    return Err(EnergyError::ParseCommoditiesFile(format!(
                        "{}: {}",
                        trimmed_line, e
                    )));
                }
            }
        }
        Ok(commodities)
    }
}

/// Commodities shown on the dashboard.
///
/// The first four are quoted upstream; the rest are estimated from Brent.
#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    Hash,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Commodity {
    /// West Texas Intermediate crude, $/bbl.
    Wti,
    /// Brent crude, $/bbl.
    Brent,
    /// RBOB gasoline, $/gal.
    Rbob,
    /// NY Harbor heating oil (ULSD), $/gal.
    #[strum(to_string = "heating_oil", serialize = "ho")]
    HeatingOil,
    /// 0.5% sulphur fuel oil (estimated).
    Vlsfo,
    /// 380 cst high-sulphur fuel oil (estimated).
    #[serde(rename = "hsfo380")]
    #[strum(serialize = "hsfo380")]
    Hsfo380,
    /// Singapore 92 RON gasoline (estimated).
    #[serde(rename = "gasoline92")]
    #[strum(serialize = "gasoline92")]
    Gasoline92,
}

impl Commodity {
    /// Commodities fetched from the upstream quote provider.
    pub const PRIMARY: [Commodity; 4] = [
        Commodity::Wti,
        Commodity::Brent,
        Commodity::Rbob,
        Commodity::HeatingOil,
    ];

    /// Commodities synthesized from a benchmark price.
    pub const DERIVED: [Commodity; 3] = [
        Commodity::Vlsfo,
        Commodity::Hsfo380,
        Commodity::Gasoline92,
    ];

    /// Returns `true` if the commodity is quoted upstream.
    pub fn is_primary(&self) -> bool {
        Self::PRIMARY.contains(self)
    }
}

/// Mapping from commodity key to upstream ticker.
///
/// Built once at startup and shared read-only; there is no mutating API.
#[derive(Debug, Clone)]
pub struct SymbolRegistry {
    entries: BTreeMap<Commodity, String>,
}

impl SymbolRegistry {
    /// Build a registry from explicit `(commodity, ticker)` pairs.
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (Commodity, S)>,
        S: Into<String>,
    {
        Self {
            entries: entries.into_iter().map(|(c, t)| (c, t.into())).collect(),
        }
    }

    /// Front-month NYMEX/ICE futures tickers as used by the chart API.
    pub fn standard() -> Self {
        Self::new([
            (Commodity::Wti, "CL=F"),
            (Commodity::Brent, "BZ=F"),
            (Commodity::Rbob, "RB=F"),
            (Commodity::HeatingOil, "HO=F"),
        ])
    }

    /// Upstream ticker for `commodity`.
    pub fn ticker(&self, commodity: Commodity) -> Result<&str, EnergyError> {
        self.entries
            .get(&commodity)
            .map(String::as_str)
            .ok_or_else(|| EnergyError::CommodityNotFound(commodity.to_string()))
    }

    /// Iterate `(commodity, ticker)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (Commodity, &str)> {
        self.entries.iter().map(|(c, t)| (*c, t.as_str()))
    }

    /// Number of tracked upstream symbols.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no symbols are tracked.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for SymbolRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
