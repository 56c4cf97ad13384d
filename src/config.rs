use crate::model::ConfigError;
use serde::Deserialize;
use std::fs;

/// A tracked memory grade: canonical name plus the label used on the source page.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemConfig {
    pub name: String,
    pub source_label: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StockConfig {
    pub ticker: String,
    pub name: String,
    pub country: String,
    pub sector: String,
}

/// Thresholds and window lengths used by the analyzer.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Percent move that triggers an alert.
    pub alert_threshold: f64,
    /// Volatility (percent) above which HIGH_VOLATILITY fires.
    pub volatility_threshold: f64,
    pub rsi_overbought: f64,
    pub rsi_oversold: f64,
    /// Number of records kept in the history log.
    pub retention: usize,
    pub ma_short: usize,
    pub ma_medium: usize,
    pub ma_long: usize,
    pub volatility_window: usize,
    pub rsi_period: usize,
    /// Valid records selected for indicator snapshots.
    pub lookback: usize,
    /// Treat an indicator reading of exactly 0 as missing in the signal and
    /// prediction guards. Kept on by default to match the historic heuristic.
    pub zero_indicator_is_absent: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            alert_threshold: 3.0,
            volatility_threshold: 2.0,
            rsi_overbought: 70.0,
            rsi_oversold: 30.0,
            retention: 30,
            ma_short: 5,
            ma_medium: 10,
            ma_long: 20,
            volatility_window: 5,
            rsi_period: 14,
            lookback: 25,
            zero_indicator_is_absent: true,
        }
    }
}

impl AnalysisConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        let windows = [
            ("ma_short", self.ma_short),
            ("ma_medium", self.ma_medium),
            ("ma_long", self.ma_long),
            ("volatility_window", self.volatility_window),
            ("rsi_period", self.rsi_period),
            ("retention", self.retention),
        ];
        if let Some((name, _)) = windows.iter().find(|(_, v)| *v == 0) {
            return Err(ConfigError::Invalid(format!("{} must be positive", name)));
        }
        let widest = [
            self.ma_short,
            self.ma_medium,
            self.ma_long,
            self.volatility_window,
            self.rsi_period + 1,
        ]
        .into_iter()
        .max()
        .unwrap_or_default();
        if self.lookback < widest {
            return Err(ConfigError::Invalid(format!(
                "lookback {} is shorter than the widest window {}",
                self.lookback, widest
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub telegram_bot_token: String,
    pub telegram_chat_id: i64,
    #[serde(default = "default_source_url")]
    pub source_url: String,
    #[serde(default = "default_db_path")]
    pub db_path: String,
    #[serde(default = "default_check_interval")]
    pub check_interval_seconds: u64,
    #[serde(default = "default_items")]
    pub items: Vec<ItemConfig>,
    #[serde(default = "default_stocks")]
    pub stocks: Vec<StockConfig>,
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

impl AppConfig {
    /// Canonical names of the tracked items, in catalog order.
    pub fn catalog(&self) -> Vec<String> {
        self.items.iter().map(|i| i.name.clone()).collect()
    }
}

pub fn load_config(path: &str) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

pub fn parse_config(content: &str) -> Result<AppConfig, ConfigError> {
    let config: AppConfig = serde_json::from_str(content)?;
    config.analysis.validate()?;
    Ok(config)
}

fn default_source_url() -> String {
    "https://www.dramexchange.com/".to_string()
}

fn default_db_path() -> String {
    "data.db".to_string()
}

fn default_check_interval() -> u64 {
    24 * 60 * 60
}

pub fn default_items() -> Vec<ItemConfig> {
    [
        ("512Gb TLC", "512Gb TLC"),
        ("256Gb TLC", "256Gb TLC"),
        ("128Gb TLC", "128Gb TLC"),
        ("64Gb MLC", "MLC 64Gb"),
        ("32Gb MLC", "MLC 32Gb"),
        ("SLC 2Gb", "SLC 2Gb"),
    ]
    .into_iter()
    .map(|(name, label)| ItemConfig {
        name: name.to_string(),
        source_label: label.to_string(),
    })
    .collect()
}

fn default_stocks() -> Vec<StockConfig> {
    [
        ("MU", "Micron Technology", "US", "Memory"),
        ("WDC", "Western Digital", "US", "Storage"),
        ("NVDA", "NVIDIA", "US", "AI/GPU"),
        ("603986.SZ", "GigaDevice", "CN", "Memory"),
        ("688981.SS", "SMIC", "CN", "Foundry"),
        ("002049.SZ", "Unigroup Guoxin", "CN", "Memory"),
        ("002371.SZ", "NAURA", "CN", "Equipment"),
        ("600745.SS", "Wingtech", "CN", "Power semis"),
    ]
    .into_iter()
    .map(|(ticker, name, country, sector)| StockConfig {
        ticker: ticker.to_string(),
        name: name.to_string(),
        country: country.to_string(),
        sector: sector.to_string(),
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_gets_defaults() {
        let cfg = parse_config(r#"{"telegram_bot_token": "t", "telegram_chat_id": 1}"#).unwrap();
        assert_eq!(cfg.items.len(), 6);
        assert_eq!(cfg.catalog()[3], "64Gb MLC");
        assert_eq!(cfg.analysis.alert_threshold, 3.0);
        assert_eq!(cfg.analysis.lookback, 25);
        assert!(cfg.analysis.zero_indicator_is_absent);
        assert_eq!(cfg.check_interval_seconds, 86400);
    }

    #[test]
    fn partial_analysis_section_keeps_other_defaults() {
        let cfg = parse_config(
            r#"{"telegram_bot_token": "t", "telegram_chat_id": 1,
                "analysis": {"alert_threshold": 5.0}}"#,
        )
        .unwrap();
        assert_eq!(cfg.analysis.alert_threshold, 5.0);
        assert_eq!(cfg.analysis.rsi_period, 14);
    }

    #[test]
    fn lookback_shorter_than_windows_is_rejected() {
        let err = parse_config(
            r#"{"telegram_bot_token": "t", "telegram_chat_id": 1,
                "analysis": {"lookback": 10}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }
}
