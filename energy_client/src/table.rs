//! Plain-text rendering of a snapshot for the terminal.
use energy_common::{Commodity, Snapshot};

/// Render quotes (optionally restricted to `filter`) and all spreads as lines.
pub fn render(snapshot: &Snapshot, filter: &[Commodity]) -> Vec<String> {
    let mut lines = vec![format!("Snapshot {}", snapshot.timestamp)];

    for (commodity, quote) in &snapshot.quotes {
        if !filter.is_empty() && !filter.contains(commodity) {
            continue;
        }
        lines.push(format!(
            "{:<12} {:>9.2} {:>+8.2} {:>+7.2}% [{}]",
            commodity.to_string(),
            quote.price,
            quote.change,
            quote.change_percent,
            quote.source
        ));
    }

    for (name, value) in &snapshot.spreads {
        lines.push(format!("{:<18} {:>+9.2}", name, value));
    }
    lines
}
