use crate::analyzer::indicators::IndicatorSet;
use crate::analyzer::predictions::predict;
use crate::analyzer::signals::detect_signal;
use crate::config::AnalysisConfig;
use crate::model::{Alert, AnalysisResult, AnalysisStatus, PriceChange, PriceRecord};
use crate::utils::percent_change;
use tracing::{debug, info};

/// Trait defining the interface for the daily price analyzer.
pub trait Analyzer {
    /// Compares `current` with the most-recent-first `history` (which must not
    /// already contain `current`).
    fn analyze(&self, current: &PriceRecord, history: &[PriceRecord]) -> AnalysisResult;
}

/// Implementation of the daily price analyzer.
pub struct AnalyzerImpl {
    config: AnalysisConfig,
    catalog: Vec<String>,
}

impl AnalyzerImpl {
    pub fn new(config: AnalysisConfig, catalog: Vec<String>) -> Self {
        Self { config, catalog }
    }

    pub fn indicators(&self, history: &[PriceRecord]) -> IndicatorSet {
        IndicatorSet::compute(history, &self.config, &self.catalog)
    }
}

impl Analyzer for AnalyzerImpl {
    fn analyze(&self, current: &PriceRecord, history: &[PriceRecord]) -> AnalysisResult {
        let Some(last_record) = history.first() else {
            info!("No history yet, treating {} as first run", current.date);
            return AnalysisResult::first_run();
        };

        let indicators = self.indicators(history);
        let previous_prices = last_record.price_map();
        let mut result = AnalysisResult {
            changes: Vec::new(),
            alerts: Vec::new(),
            signals: Vec::new(),
            predictions: Vec::new(),
            status: AnalysisStatus::Normal,
        };

        for item in &current.items {
            let Some(&previous) = previous_prices.get(item.name.as_str()) else {
                debug!("{} missing from {}, skipped", item.name, last_record.date);
                continue;
            };
            let Some(change_pct) = percent_change(item.price, previous) else {
                debug!("{} has non-positive previous price, skipped", item.name);
                continue;
            };

            result.changes.push(PriceChange {
                name: item.name.clone(),
                current: item.price,
                previous,
                change_pct,
            });

            if change_pct.abs() >= self.config.alert_threshold {
                result.alerts.push(Alert {
                    name: item.name.clone(),
                    change_pct,
                    current: item.price,
                });
            }

            let item_indicators = indicators.for_item(&item.name);
            if let Some(signal) = detect_signal(
                &item.name,
                item.price,
                item_indicators.ma_short,
                item_indicators.ma_medium,
                history,
                &self.config,
            ) {
                result.signals.push(signal);
            }
            if let Some(prediction) = predict(&item.name, item.price, &item_indicators, history, &self.config) {
                result.predictions.push(prediction);
            }
        }

        info!(
            "Analysis for {}: {} changes, {} alerts, {} signals, {} predictions",
            current.date,
            result.changes.len(),
            result.alerts.len(),
            result.signals.len(),
            result.predictions.len()
        );
        result
    }
}
