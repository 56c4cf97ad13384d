// Analyzer module: history windowing, indicators, signals, predictions and the daily orchestration.

pub mod change_analysis;
pub mod history_window;
pub mod indicators;
pub mod predictions;
pub mod signals;

use crate::config::AnalysisConfig;

// Re-export the main Analyzer implementation for ease of use.
pub use change_analysis::{Analyzer, AnalyzerImpl};

/// An indicator reading usable by the guards. A reading of exactly zero is
/// dropped when `zero_indicator_is_absent` is set.
pub(crate) fn present(value: Option<f64>, cfg: &AnalysisConfig) -> Option<f64> {
    value.filter(|v| !(cfg.zero_indicator_is_absent && *v == 0.0))
}
