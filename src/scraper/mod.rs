pub mod fetcher;
pub mod quotes;
pub mod traits;

pub use fetcher::ScraperImpl;
pub use quotes::{StubQuoteProvider, fetch_quotes};
pub use traits::{QuoteProvider, Scraper};
