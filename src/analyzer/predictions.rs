// Likely automated-trading reactions, ranked per item
use crate::analyzer::indicators::ItemIndicators;
use crate::analyzer::present;
use crate::config::AnalysisConfig;
use crate::model::{Prediction, PredictionKind, PriceRecord};

/// RSI rules fire this many points before the configured extremes.
const RSI_EARLY_BAND: f64 = 10.0;
/// Relative distance from MA20 treated as stretched.
const MA_LONG_BAND: f64 = 0.1;
/// Prior records required before any prediction is made.
const MIN_HISTORY: usize = 5;

/// Evaluates every rule for one item and returns the highest-priority match.
pub fn predict(
    name: &str,
    current_price: f64,
    indicators: &ItemIndicators,
    history: &[PriceRecord],
    cfg: &AnalysisConfig,
) -> Option<Prediction> {
    let ma_short = present(indicators.ma_short, cfg)?;
    let ma_medium = present(indicators.ma_medium, cfg)?;
    let ma_long = present(indicators.ma_long, cfg)?;
    let volatility = present(indicators.volatility, cfg)?;
    let rsi = present(indicators.rsi, cfg)?;
    if history.len() < MIN_HISTORY {
        return None;
    }

    let make = |kind: PredictionKind, action: &str, confidence: &str, reason: String, timing: &str| {
        Prediction {
            kind,
            name: name.to_string(),
            action: action.to_string(),
            confidence: confidence.to_string(),
            reason,
            timing: timing.to_string(),
        }
    };

    let mut matches = Vec::new();

    if ma_short > ma_medium && ma_medium <= ma_long {
        matches.push(make(
            PredictionKind::GoldenCross,
            "potential buy",
            "medium",
            "MA5 about to cross above MA10, may trigger programmatic buying".into(),
            "1-2 days",
        ));
    } else if ma_short < ma_medium && ma_medium >= ma_long {
        matches.push(make(
            PredictionKind::DeathCross,
            "potential sell",
            "medium",
            "MA5 about to cross below MA10, may trigger programmatic selling".into(),
            "1-2 days",
        ));
    }

    if rsi > cfg.rsi_overbought - RSI_EARLY_BAND {
        matches.push(make(
            PredictionKind::RsiOverbought,
            "watch for pullback",
            "high",
            format!("RSI={:.1} nearing overbought, algorithms may take profit", rsi),
            "short-term",
        ));
    } else if rsi < cfg.rsi_oversold + RSI_EARLY_BAND {
        matches.push(make(
            PredictionKind::RsiOversold,
            "possible rebound",
            "high",
            format!("RSI={:.1} nearing oversold, may trigger dip buying", rsi),
            "short-term",
        ));
    }

    if volatility > cfg.volatility_threshold {
        matches.push(make(
            PredictionKind::HighVolatility,
            "volatility intensifying",
            "high",
            format!("volatility={:.1}% unusually high, algorithms may trade in and out fast", volatility),
            "immediate",
        ));
    }

    if current_price > ma_long * (1.0 + MA_LONG_BAND) {
        matches.push(make(
            PredictionKind::PriceHigh,
            "caution on pullback",
            "medium",
            "price more than 10% above MA20, pullback pressure likely".into(),
            "short-term",
        ));
    } else if current_price < ma_long * (1.0 - MA_LONG_BAND) {
        matches.push(make(
            PredictionKind::PriceLow,
            "watch for support",
            "medium",
            "price more than 10% below MA20, may test support".into(),
            "short-term",
        ));
    }

    matches.sort_by_key(|p| p.kind.priority());
    matches.into_iter().next()
}
