use crate::config::ItemConfig;
use crate::model::ItemPrice;
use crate::parser::RawQuote;
use std::collections::HashSet;
use tracing::warn;

/// Maps source labels to catalog names. Unknown labels and unusable prices
/// are dropped; the first quote per item wins.
pub fn normalize_all(quotes: Vec<RawQuote>, items: &[ItemConfig]) -> Vec<ItemPrice> {
    let mut seen = HashSet::new();
    let mut result = Vec::with_capacity(quotes.len());

    for quote in quotes {
        let Some(name) = canonical_name(&quote.label, items) else {
            warn!("Unknown item label: {}", quote.label);
            continue;
        };
        if !quote.price.is_finite() || quote.price <= 0.0 {
            warn!("Dropping unusable price {} for {}", quote.price, name);
            continue;
        }
        if seen.insert(name.to_string()) {
            result.push(ItemPrice {
                name: name.to_string(),
                price: quote.price,
            });
        }
    }

    result
}

fn canonical_name<'a>(label: &str, items: &'a [ItemConfig]) -> Option<&'a str> {
    let label = label.trim().to_lowercase();
    items
        .iter()
        .find(|i| i.source_label.to_lowercase() == label || i.name.to_lowercase() == label)
        .map(|i| i.name.as_str())
}
