// Windowed indicators: moving averages, volatility, RSI
use crate::analyzer::history_window::select_valid;
use crate::config::AnalysisConfig;
use crate::model::PriceRecord;
use std::collections::HashMap;

/// Indicator values per item for one indicator kind and window length.
/// An item without enough history is absent, never zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndicatorSnapshot {
    values: HashMap<String, f64>,
}

impl IndicatorSnapshot {
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn insert(&mut self, name: &str, value: f64) {
        self.values.insert(name.to_string(), value);
    }
}

/// Name -> price lookups for a window of valid records, most recent first.
pub struct PriceWindow<'a> {
    maps: Vec<HashMap<&'a str, f64>>,
}

impl<'a> PriceWindow<'a> {
    pub fn new(records: &[&'a PriceRecord]) -> Self {
        Self {
            maps: records.iter().map(|&r| r.price_map()).collect(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.maps.len()
    }

    /// Prices of `name` over the first `days` records; records lacking the item are skipped.
    pub fn prices(&self, name: &str, days: usize) -> Vec<f64> {
        self.maps
            .iter()
            .take(days)
            .filter_map(|m| m.get(name).copied())
            .collect()
    }
}

pub struct IndicatorCalculator;

impl IndicatorCalculator {
    /// Minimum resolved prices for a volatility reading.
    pub const MIN_VOLATILITY_SAMPLES: usize = 3;

    /// Simple moving average over the `days` most recent valid records.
    /// Requires a full set of `days` prices for an item.
    pub fn moving_average(window: &PriceWindow, days: usize, catalog: &[String]) -> IndicatorSnapshot {
        let mut snapshot = IndicatorSnapshot::default();
        if days == 0 || window.len() < days {
            return snapshot;
        }
        for name in catalog {
            let prices = window.prices(name, days);
            if prices.len() == days {
                snapshot.insert(name, mean(&prices));
            }
        }
        snapshot
    }

    /// Coefficient of variation in percent (population std-dev / mean * 100).
    pub fn volatility(window: &PriceWindow, days: usize, catalog: &[String]) -> IndicatorSnapshot {
        let mut snapshot = IndicatorSnapshot::default();
        if window.len() < days {
            return snapshot;
        }
        for name in catalog {
            let prices = window.prices(name, days);
            if prices.len() < Self::MIN_VOLATILITY_SAMPLES {
                continue;
            }
            let avg = mean(&prices);
            let value = if avg > 0.0 {
                population_std_dev(&prices, avg) / avg * 100.0
            } else {
                0.0
            };
            snapshot.insert(name, value);
        }
        snapshot
    }

    /// Relative Strength Index over `period` day-over-day deltas (simple averages).
    pub fn rsi(window: &PriceWindow, period: usize, catalog: &[String]) -> IndicatorSnapshot {
        let mut snapshot = IndicatorSnapshot::default();
        if period == 0 || window.len() < period + 1 {
            return snapshot;
        }
        for name in catalog {
            let prices = window.prices(name, period + 1);
            if let Some(value) = Self::compute_rsi(&prices, period) {
                snapshot.insert(name, value);
            }
        }
        snapshot
    }

    /// `prices` are most recent first; deltas are taken oldest to newest.
    pub fn compute_rsi(prices: &[f64], period: usize) -> Option<f64> {
        if period == 0 || prices.len() < period + 1 {
            return None;
        }

        let chronological: Vec<f64> = prices[..=period].iter().rev().copied().collect();
        let mut gains = 0.0;
        let mut losses = 0.0;
        for w in chronological.windows(2) {
            let delta = w[1] - w[0];
            if delta > 0.0 {
                gains += delta;
            } else {
                losses -= delta;
            }
        }

        let avg_gain = gains / period as f64;
        let avg_loss = losses / period as f64;
        if avg_loss == 0.0 {
            return Some(100.0);
        }
        let rs = avg_gain / avg_loss;
        Some(100.0 - (100.0 / (1.0 + rs)))
    }
}

fn mean(prices: &[f64]) -> f64 {
    prices.iter().sum::<f64>() / prices.len() as f64
}

fn population_std_dev(prices: &[f64], mean: f64) -> f64 {
    let variance = prices.iter().map(|p| (p - mean).powi(2)).sum::<f64>() / prices.len() as f64;
    variance.sqrt()
}

/// Indicator values for a single item.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ItemIndicators {
    pub ma_short: Option<f64>,
    pub ma_medium: Option<f64>,
    pub ma_long: Option<f64>,
    pub volatility: Option<f64>,
    pub rsi: Option<f64>,
}

/// All snapshots computed from one history log.
#[derive(Debug, Clone, Default)]
pub struct IndicatorSet {
    pub ma_short: IndicatorSnapshot,
    pub ma_medium: IndicatorSnapshot,
    pub ma_long: IndicatorSnapshot,
    pub volatility: IndicatorSnapshot,
    pub rsi: IndicatorSnapshot,
}

impl IndicatorSet {
    pub fn compute(history: &[PriceRecord], cfg: &AnalysisConfig, catalog: &[String]) -> Self {
        let valid = select_valid(history, cfg.lookback);
        let window = PriceWindow::new(&valid);
        Self {
            ma_short: IndicatorCalculator::moving_average(&window, cfg.ma_short, catalog),
            ma_medium: IndicatorCalculator::moving_average(&window, cfg.ma_medium, catalog),
            ma_long: IndicatorCalculator::moving_average(&window, cfg.ma_long, catalog),
            volatility: IndicatorCalculator::volatility(&window, cfg.volatility_window, catalog),
            rsi: IndicatorCalculator::rsi(&window, cfg.rsi_period, catalog),
        }
    }

    pub fn for_item(&self, name: &str) -> ItemIndicators {
        ItemIndicators {
            ma_short: self.ma_short.get(name),
            ma_medium: self.ma_medium.get(name),
            ma_long: self.ma_long.get(name),
            volatility: self.volatility.get(name),
            rsi: self.rsi.get(name),
        }
    }
}
