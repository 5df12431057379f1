//! Estimated quotes for products the upstream provider does not carry.
//!
//! Each product is priced as the Brent benchmark plus a constant premium (or minus a
//! constant discount). Day change is a constant synthetic delta. None of these numbers
//! are market data; they are placeholders labeled [`QuoteSource::Estimated`].

use energy_common::quote::round2;
use energy_common::{Commodity, Quote, QuoteSource};

/// Benchmark used when no usable Brent price is available.
pub const DEFAULT_BENCHMARK_PRICE: f64 = 70.20;

/// Constant pricing rule for one synthetic product.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EstimateRule {
    /// Product the rule prices.
    pub product: Commodity,
    /// Added to the benchmark; negative for a discount.
    pub offset: f64,
    /// Synthetic day change.
    pub delta: f64,
}

/// Rules for every derived commodity, in [`Commodity::DERIVED`] order.
pub const RULES: [EstimateRule; 3] = [
    EstimateRule {
        product: Commodity::Vlsfo,
        offset: 8.50,
        delta: 0.45,
    },
    EstimateRule {
        product: Commodity::Hsfo380,
        offset: -6.75,
        delta: 0.30,
    },
    EstimateRule {
        product: Commodity::Gasoline92,
        offset: 11.20,
        delta: 0.40,
    },
];

impl EstimateRule {
    /// Rule for `product`, if it is a derived commodity.
    pub fn for_product(product: Commodity) -> Option<EstimateRule> {
        RULES.iter().copied().find(|rule| rule.product == product)
    }

    /// Price the product from `benchmark`. A missing or zero benchmark is replaced by
    /// [`DEFAULT_BENCHMARK_PRICE`], so the result is never the zero sentinel.
    pub fn estimate(&self, benchmark: Option<f64>) -> Quote {
        let benchmark = benchmark
            .filter(|price| *price > 0.0)
            .unwrap_or(DEFAULT_BENCHMARK_PRICE);
        let price = round2(benchmark + self.offset);
        let previous_close = round2(price - self.delta);
        Quote::from_closes(price, previous_close, QuoteSource::Estimated)
    }
}

/// Estimate every derived commodity from one benchmark price.
pub fn estimate_all(benchmark: Option<f64>) -> Vec<(Commodity, Quote)> {
    RULES
        .iter()
        .map(|rule| (rule.product, rule.estimate(benchmark)))
        .collect()
}
