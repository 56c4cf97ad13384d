use crate::model::PriceRecord;

/// Collects up to `needed_days` valid records, scanning the most-recent-first
/// log from its head. Gap days (records with no items) are skipped, never
/// padded, so the result may be shorter than requested.
pub fn select_valid(history: &[PriceRecord], needed_days: usize) -> Vec<&PriceRecord> {
    history
        .iter()
        .filter(|rec| rec.is_valid())
        .take(needed_days)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ItemPrice;
    use chrono::NaiveDate;

    fn record(day: u32, prices: &[f64]) -> PriceRecord {
        let items = prices
            .iter()
            .map(|&price| ItemPrice {
                name: "512Gb TLC".into(),
                price,
            })
            .collect();
        PriceRecord::new(NaiveDate::from_ymd_opt(2026, 3, day).unwrap(), items)
    }

    #[test]
    fn skips_gap_days() {
        let history = vec![record(10, &[2.0]), record(9, &[]), record(8, &[1.9]), record(7, &[1.8])];
        let window = select_valid(&history, 3);
        let days: Vec<u32> = window.iter().map(|r| r.date.format("%d").to_string().parse().unwrap()).collect();
        assert_eq!(days, vec![10, 8, 7]);
    }

    #[test]
    fn never_exceeds_requested_length() {
        let history: Vec<PriceRecord> = (1..=20).rev().map(|d| record(d, &[1.0])).collect();
        assert_eq!(select_valid(&history, 5).len(), 5);
        assert!(select_valid(&history, 0).is_empty());
    }

    #[test]
    fn short_history_returns_what_exists() {
        let history = vec![record(2, &[1.0]), record(1, &[])];
        assert_eq!(select_valid(&history, 25).len(), 1);
    }

    #[test]
    fn all_gap_history_yields_empty_window() {
        let history: Vec<PriceRecord> = (1..=10).map(|d| record(d, &[])).collect();
        for n in [1, 5, 25] {
            assert!(select_valid(&history, n).is_empty());
        }
    }
}
