use crate::config::StockConfig;
use crate::model::{FetchRequest, ScraperError, StockQuote};

#[async_trait::async_trait]
pub trait Scraper: Send + Sync {
    async fn fetch(&self, req: &FetchRequest) -> Result<String, ScraperError>;
}

#[async_trait::async_trait]
pub trait QuoteProvider: Send + Sync {
    async fn quote(&self, stock: &StockConfig) -> StockQuote;
}
