use crate::config::StockConfig;
use crate::model::StockQuote;
use crate::scraper::traits::QuoteProvider;
use futures::future::join_all;

/// Placeholder provider: no quote API is wired up yet.
pub struct StubQuoteProvider;

#[async_trait::async_trait]
impl QuoteProvider for StubQuoteProvider {
    async fn quote(&self, stock: &StockConfig) -> StockQuote {
        StockQuote {
            ticker: stock.ticker.clone(),
            name: stock.name.clone(),
            country: stock.country.clone(),
            sector: stock.sector.clone(),
            price: None,
            change: None,
            note: "quote API unavailable".to_string(),
        }
    }
}

/// Queries every watch-list entry concurrently, keeping watch-list order.
pub async fn fetch_quotes(provider: &dyn QuoteProvider, stocks: &[StockConfig]) -> Vec<StockQuote> {
    join_all(stocks.iter().map(|s| provider.quote(s))).await
}
