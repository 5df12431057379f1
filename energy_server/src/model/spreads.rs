//! Spread and crack-spread metrics computed from an assembled quote set.
//!
//! Every metric is $/bbl and rounded to cents. A missing input (absent key or a quote
//! with the zero-price sentinel) yields 0 for the affected metric.
//!
//! Calendar spreads are not read from a futures curve. They are fixed fractions of the
//! WTI front-month price and should be read as rough estimates.

use std::collections::BTreeMap;

use energy_common::quote::round2;
use energy_common::{Commodity, Quote};

/// Gallons per barrel.
pub const GALLONS_PER_BARREL: f64 = 42.0;
/// Product prices below this are taken to be $/gal.
pub const PER_GALLON_THRESHOLD: f64 = 10.0;
/// Estimated M1-M2 WTI spread as a fraction of the front month.
pub const M1_M2_FRACTION: f64 = 0.008;
/// Estimated M1-M6 WTI spread as a fraction of the front month.
pub const M1_M6_FRACTION: f64 = 0.035;

/// Brent minus WTI.
pub const BRENT_WTI: &str = "brent_wti";
/// RBOB crack against WTI.
pub const RBOB_CRACK: &str = "rbob_crack";
/// Heating oil crack against WTI.
pub const HEATING_OIL_CRACK: &str = "heating_oil_crack";
/// 3-2-1 crack against WTI.
pub const CRACK_321: &str = "crack_321";
/// Estimated WTI front-to-second month spread.
pub const WTI_M1_M2: &str = "wti_m1_m2";
/// Estimated WTI front-to-sixth month spread.
pub const WTI_M1_M6: &str = "wti_m1_m6";

/// Convert a product price to $/bbl, treating anything under
/// [`PER_GALLON_THRESHOLD`] as $/gal.
pub fn to_barrel(price: f64) -> f64 {
    if price < PER_GALLON_THRESHOLD {
        price * GALLONS_PER_BARREL
    } else {
        price
    }
}

/// Product margin over crude, $/bbl.
pub fn crack_spread(crude: f64, product: f64) -> f64 {
    to_barrel(product) - crude
}

/// Two parts gasoline plus one part distillate against three parts crude, per barrel.
pub fn crack_321(crude: f64, gasoline: f64, distillate: f64) -> f64 {
    (2.0 * to_barrel(gasoline) + to_barrel(distillate)) / 3.0 - crude
}

fn price_of(quotes: &BTreeMap<Commodity, Quote>, commodity: Commodity) -> Option<f64> {
    quotes
        .get(&commodity)
        .filter(|quote| quote.is_available())
        .map(|quote| quote.price)
}

/// Compute every named spread; never fails.
pub fn calculate(quotes: &BTreeMap<Commodity, Quote>) -> BTreeMap<String, f64> {
    let wti = price_of(quotes, Commodity::Wti);
    let brent = price_of(quotes, Commodity::Brent);
    let rbob = price_of(quotes, Commodity::Rbob);
    let heating_oil = price_of(quotes, Commodity::HeatingOil);

    let brent_wti = match (brent, wti) {
        (Some(brent), Some(wti)) => brent - wti,
        _ => 0.0,
    };
    let rbob_crack = match (wti, rbob) {
        (Some(wti), Some(rbob)) => crack_spread(wti, rbob),
        _ => 0.0,
    };
    let heating_oil_crack = match (wti, heating_oil) {
        (Some(wti), Some(ho)) => crack_spread(wti, ho),
        _ => 0.0,
    };
    let three_two_one = match (wti, rbob, heating_oil) {
        (Some(wti), Some(rbob), Some(ho)) => crack_321(wti, rbob, ho),
        _ => 0.0,
    };
    let (m1_m2, m1_m6) = match wti {
        Some(wti) => (wti * M1_M2_FRACTION, wti * M1_M6_FRACTION),
        None => (0.0, 0.0),
    };

    [
        (BRENT_WTI, brent_wti),
        (RBOB_CRACK, rbob_crack),
        (HEATING_OIL_CRACK, heating_oil_crack),
        (CRACK_321, three_two_one),
        (WTI_M1_M2, m1_m2),
        (WTI_M1_M6, m1_m6),
    ]
    .into_iter()
    .map(|(name, value)| (name.to_string(), round2(value)))
    .collect()
}
