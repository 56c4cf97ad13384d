// Core structs: PriceRecord, analysis outputs, collaborator errors
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// One observed (item, price) pair inside a day's record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemPrice {
    pub name: String,
    pub price: f64,
}

/// One day's observed prices. `items` may be empty (holiday / no data).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fetched_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub items: Vec<ItemPrice>,
}

impl PriceRecord {
    pub fn new(date: NaiveDate, items: Vec<ItemPrice>) -> Self {
        Self {
            date,
            fetched_at: None,
            items,
        }
    }

    /// A record counts as valid when at least one price was observed.
    pub fn is_valid(&self) -> bool {
        !self.items.is_empty()
    }

    /// Name -> price lookup. On duplicate names the first entry wins.
    pub fn price_map(&self) -> HashMap<&str, f64> {
        let mut map = HashMap::with_capacity(self.items.len());
        for item in &self.items {
            map.entry(item.name.as_str()).or_insert(item.price);
        }
        map
    }

    pub fn price_of(&self, name: &str) -> Option<f64> {
        self.items.iter().find(|i| i.name == name).map(|i| i.price)
    }
}

/// Day-over-day movement of one item.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceChange {
    pub name: String,
    pub current: f64,
    pub previous: f64,
    pub change_pct: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub name: String,
    pub change_pct: f64,
    pub current: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalKind {
    Buy,
    Sell,
    Warn,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TradeSignal {
    pub kind: SignalKind,
    pub name: String,
    pub price: f64,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredictionKind {
    GoldenCross,
    DeathCross,
    RsiOverbought,
    RsiOversold,
    HighVolatility,
    PriceHigh,
    PriceLow,
}

impl PredictionKind {
    /// Ranking used when several rules fire for the same item; lower wins.
    pub fn priority(self) -> u8 {
        match self {
            PredictionKind::HighVolatility => 0,
            PredictionKind::RsiOverbought => 1,
            PredictionKind::RsiOversold => 2,
            PredictionKind::GoldenCross => 3,
            PredictionKind::DeathCross => 4,
            PredictionKind::PriceHigh => 5,
            PredictionKind::PriceLow => 6,
        }
    }
}

impl fmt::Display for PredictionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PredictionKind::GoldenCross => "GOLDEN_CROSS",
            PredictionKind::DeathCross => "DEATH_CROSS",
            PredictionKind::RsiOverbought => "RSI_OVERBOUGHT",
            PredictionKind::RsiOversold => "RSI_OVERSOLD",
            PredictionKind::HighVolatility => "HIGH_VOLATILITY",
            PredictionKind::PriceHigh => "PRICE_HIGH",
            PredictionKind::PriceLow => "PRICE_LOW",
        };
        f.write_str(s)
    }
}

/// Expected reaction of automated traders for one item.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub kind: PredictionKind,
    pub name: String,
    pub action: String,
    pub confidence: String,
    pub reason: String,
    pub timing: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisStatus {
    FirstRun,
    Normal,
}

impl fmt::Display for AnalysisStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisStatus::FirstRun => f.write_str("first run"),
            AnalysisStatus::Normal => f.write_str("normal"),
        }
    }
}

/// Everything the report layer needs, computed for one new record.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    pub changes: Vec<PriceChange>,
    pub alerts: Vec<Alert>,
    pub signals: Vec<TradeSignal>,
    pub predictions: Vec<Prediction>,
    pub status: AnalysisStatus,
}

impl AnalysisResult {
    pub fn first_run() -> Self {
        Self {
            changes: Vec::new(),
            alerts: Vec::new(),
            signals: Vec::new(),
            predictions: Vec::new(),
            status: AnalysisStatus::FirstRun,
        }
    }
}

/// Auxiliary equity quote. Shown in reports, never analyzed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockQuote {
    pub ticker: String,
    pub name: String,
    pub country: String,
    pub sector: String,
    pub price: Option<f64>,
    pub change: Option<f64>,
    #[serde(default)]
    pub note: String,
}

#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub url: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config value: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("http error: {0}")]
    HttpError(String),
    #[error("request timed out")]
    Timeout,
    #[error("unexpected response")]
    InvalidResponse(String),
}

#[derive(Debug, Error)]
pub enum ParserError {
    #[error("html parse error: {0}")]
    HtmlParseError(String),
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("invalid stored value: {0}")]
    Corrupt(String),
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("telegram api error: {0}")]
    ApiError(String),
    #[error("telegram unreachable")]
    Unreachable,
}
