use crate::analyzer::present;
use crate::config::AnalysisConfig;
use crate::model::{PriceRecord, SignalKind, TradeSignal};

/// Price above MA5 by more than this factor raises a warning.
const MA_SHORT_DEVIATION: f64 = 1.05;

/// Looks for an immediate reversal pattern for one item.
///
/// Uses the raw head of `history` (no gap filtering): `p0` is the latest
/// prior record, `p2` the third. Rules are checked in priority order and the
/// first match is returned.
pub fn detect_signal(
    name: &str,
    current_price: f64,
    ma_short: Option<f64>,
    ma_medium: Option<f64>,
    history: &[PriceRecord],
    cfg: &AnalysisConfig,
) -> Option<TradeSignal> {
    let ma_short = present(ma_short, cfg)?;
    let ma_medium = present(ma_medium, cfg)?;
    if history.len() < 3 {
        return None;
    }

    let recent: Vec<f64> = history[..3].iter().filter_map(|r| r.price_of(name)).collect();
    let &[p0, p1, p2] = recent.as_slice() else {
        return None;
    };

    let signal = |kind: SignalKind, reason: &str| TradeSignal {
        kind,
        name: name.to_string(),
        price: current_price,
        reason: reason.to_string(),
    };

    if current_price < ma_medium && p0 < p1 && p1 < p2 && p2 < current_price {
        return Some(signal(SignalKind::Buy, "price rebounded off a bottom"));
    }
    if current_price > ma_medium && p0 > p1 && p1 > p2 && p2 > current_price {
        return Some(signal(SignalKind::Sell, "price fell off a top"));
    }
    if current_price > ma_short * MA_SHORT_DEVIATION {
        return Some(signal(SignalKind::Warn, "price deviates >5% above MA5"));
    }
    None
}
