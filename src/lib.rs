//! Daily NAND Flash price monitor: ingests a day's spot prices, keeps a short
//! history and derives alerts, reversal signals and expected automated-trading
//! reactions for a human operator.

pub mod analyzer;
pub mod config;
pub mod model;
pub mod normalizer;
pub mod notifier;
pub mod parser;
pub mod scraper;
pub mod storage;
pub mod utils;
