//! End-to-end checks of the daily analysis through the public API.

use chrono::{Duration, NaiveDate};
use nand_sniper::analyzer::history_window::select_valid;
use nand_sniper::analyzer::indicators::{IndicatorCalculator, IndicatorSet, ItemIndicators, PriceWindow};
use nand_sniper::analyzer::predictions::predict;
use nand_sniper::analyzer::signals::detect_signal;
use nand_sniper::analyzer::{Analyzer, AnalyzerImpl};
use nand_sniper::config::{AnalysisConfig, default_items};
use nand_sniper::model::{AnalysisResult, AnalysisStatus, ItemPrice, PredictionKind, PriceRecord, SignalKind};

const TLC: &str = "512Gb TLC";

fn catalog() -> Vec<String> {
    default_items().into_iter().map(|i| i.name).collect()
}

fn analyzer() -> AnalyzerImpl {
    AnalyzerImpl::new(AnalysisConfig::default(), catalog())
}

fn date(offset: i64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 4, 1).unwrap() + Duration::days(offset)
}

fn record(offset: i64, price: f64) -> PriceRecord {
    PriceRecord::new(date(offset), vec![ItemPrice { name: TLC.into(), price }])
}

/// Most-recent-first log from chronological prices ending the day before `date(0)`.
fn history_from(chronological: &[f64]) -> Vec<PriceRecord> {
    let n = chronological.len() as i64;
    chronological
        .iter()
        .enumerate()
        .map(|(i, &p)| record(i as i64 - n, p))
        .rev()
        .collect()
}

#[test]
fn scenario_a_empty_history_is_first_run() {
    let result = analyzer().analyze(&record(0, 2.0), &[]);
    assert!(result.changes.is_empty());
    assert!(result.alerts.is_empty());
    assert!(result.signals.is_empty());
    assert!(result.predictions.is_empty());
    assert_eq!(result.status, AnalysisStatus::FirstRun);
    assert_eq!(result.status.to_string(), "first run");
    assert_eq!(result, AnalysisResult::first_run());
}

#[test]
fn scenario_b_five_percent_rise_raises_alert() {
    let history = history_from(&[2.00]);
    let result = analyzer().analyze(&record(0, 2.10), &history);

    assert_eq!(result.changes.len(), 1);
    let change = &result.changes[0];
    assert_eq!(change.previous, 2.00);
    assert!((change.change_pct - 5.0).abs() < 1e-9);

    assert_eq!(result.alerts.len(), 1);
    assert_eq!(result.alerts[0].name, TLC);
    assert_eq!(result.alerts[0].current, 2.10);
    assert_eq!(result.status.to_string(), "normal");
}

#[test]
fn scenario_c_rebound_below_ma10_is_a_buy() {
    let history = history_from(&[3.0, 3.0, 3.0, 3.0, 3.0, 3.0, 3.0, 2.30, 2.20, 2.10]);
    let set = IndicatorSet::compute(&history, &AnalysisConfig::default(), &catalog());
    let ma10 = set.ma_medium.get(TLC).unwrap();
    assert!(2.50 < ma10);

    let result = analyzer().analyze(&record(0, 2.50), &history);
    assert_eq!(result.signals.len(), 1);
    let signal = &result.signals[0];
    assert_eq!(signal.kind, SignalKind::Buy);
    assert_eq!(signal.reason, "price rebounded off a bottom");
    assert_eq!(signal.price, 2.50);
}

#[test]
fn scenario_d_lone_golden_cross_is_reported() {
    let indicators = ItemIndicators {
        ma_short: Some(10.5),
        ma_medium: Some(10.0),
        ma_long: Some(10.2),
        volatility: Some(1.0),
        rsi: Some(58.0),
    };
    let history = history_from(&[10.0; 5]);
    let prediction = predict(TLC, 10.2, &indicators, &history, &AnalysisConfig::default()).unwrap();
    assert_eq!(prediction.kind, PredictionKind::GoldenCross);
    assert_eq!(prediction.name, TLC);
    assert_eq!(prediction.action, "potential buy");
}

#[test]
fn scenario_e_rsi_of_steady_gains_is_exactly_100() {
    let prices: Vec<f64> = (0..15).map(|i| 1.0 + i as f64).collect();
    let history = history_from(&prices);
    let valid = select_valid(&history, 25);
    let rsi = IndicatorCalculator::rsi(&PriceWindow::new(&valid), 14, &catalog());
    assert_eq!(rsi.get(TLC), Some(100.0));
}

#[test]
fn all_gap_history_still_compares_nothing() {
    let history: Vec<PriceRecord> = (1..=10).map(|d| PriceRecord::new(date(-d), vec![])).collect();
    for n in [1, 5, 25] {
        assert!(select_valid(&history, n).is_empty());
    }
    let result = analyzer().analyze(&record(0, 2.0), &history);
    assert!(result.changes.is_empty());
    assert_eq!(result.status, AnalysisStatus::Normal);
}

#[test]
fn at_most_one_signal_and_prediction_per_item() {
    // steep slide then jump: several prediction rules and the buy pattern fire at once
    let mut prices = vec![4.0; 20];
    prices.extend([3.0, 3.1, 2.6, 2.4, 2.3, 2.2, 2.1]);
    let history = history_from(&prices);
    let result = analyzer().analyze(&record(0, 2.5), &history);

    assert_eq!(result.signals.len(), 1);
    assert_eq!(result.predictions.len(), 1);
    assert_eq!(result.predictions[0].kind, PredictionKind::HighVolatility);
}

#[test]
fn exclusive_rule_pairs_never_fire_together() {
    let cfg = AnalysisConfig {
        zero_indicator_is_absent: false,
        volatility_threshold: f64::INFINITY,
        ..AnalysisConfig::default()
    };
    let history = history_from(&[10.0; 5]);
    let levels = [8.0, 9.5, 10.0, 10.5, 12.0];
    for &ma5 in &levels {
        for &ma10 in &levels {
            for &ma20 in &levels {
                let ind = ItemIndicators {
                    ma_short: Some(ma5),
                    ma_medium: Some(ma10),
                    ma_long: Some(ma20),
                    volatility: Some(0.0),
                    rsi: Some(50.0),
                };
                if let Some(p) = predict(TLC, 10.0, &ind, &history, &cfg) {
                    let golden = ma5 > ma10 && ma10 <= ma20;
                    let death = ma5 < ma10 && ma10 >= ma20;
                    assert!(!(golden && death));
                    match p.kind {
                        PredictionKind::GoldenCross => assert!(golden),
                        PredictionKind::DeathCross => assert!(death),
                        PredictionKind::PriceHigh => assert!(10.0 > ma20 * 1.1),
                        PredictionKind::PriceLow => assert!(10.0 < ma20 * 0.9),
                        other => panic!("unexpected {}", other),
                    }
                }
            }
        }
    }
}

#[test]
fn signal_uses_raw_history_not_valid_window() {
    // a gap among the last three days suppresses the reversal check
    let mut history = history_from(&[3.0, 3.0, 3.0, 3.0, 3.0, 3.0, 3.0, 2.30, 2.20, 2.10]);
    history.insert(1, PriceRecord::new(date(-20), vec![]));
    let set = IndicatorSet::compute(&history, &AnalysisConfig::default(), &catalog());
    let item = set.for_item(TLC);
    assert!(item.ma_medium.is_some());
    let signal = detect_signal(TLC, 2.5, item.ma_short, item.ma_medium, &history, &AnalysisConfig::default());
    assert!(signal.is_none());
}

#[test]
fn flat_market_zero_volatility_suppresses_prediction() {
    let history = history_from(&[10.0; 25]);
    let set = IndicatorSet::compute(&history, &AnalysisConfig::default(), &catalog());
    let item = set.for_item(TLC);
    assert_eq!(item.volatility, Some(0.0));
    assert_eq!(item.rsi, Some(100.0));

    let result = analyzer().analyze(&record(0, 10.0), &history);
    assert!(result.predictions.is_empty());
    assert!(result.signals.is_empty());

    let cfg = AnalysisConfig {
        zero_indicator_is_absent: false,
        ..AnalysisConfig::default()
    };
    let result = AnalyzerImpl::new(cfg, catalog()).analyze(&record(0, 10.0), &history);
    assert_eq!(result.predictions.len(), 1);
    assert_eq!(result.predictions[0].kind, PredictionKind::RsiOverbought);
}

#[test]
fn prediction_boundaries_do_not_fire() {
    let history = history_from(&[10.0; 5]);
    let cfg = AnalysisConfig::default();
    let flat = ItemIndicators {
        ma_short: Some(10.0),
        ma_medium: Some(10.0),
        ma_long: Some(10.0),
        volatility: Some(1.0),
        rsi: Some(cfg.rsi_overbought - 10.0),
    };
    assert!(predict(TLC, 10.0, &flat, &history, &cfg).is_none());
    assert!(predict(TLC, 10.0 * (1.0 + 0.1), &flat, &history, &cfg).is_none());

    let crossing = ItemIndicators {
        ma_short: Some(10.5),
        ..flat
    };
    let p = predict(TLC, 10.0, &crossing, &history, &cfg).unwrap();
    assert_eq!(p.kind, PredictionKind::GoldenCross);
}
