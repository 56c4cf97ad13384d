// DRAMeXchange-specific HTML parsing
use crate::config::ItemConfig;
use crate::model::ParserError;
use scraper::{Html, Selector};

/// A price as it appears on the source page, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct RawQuote {
    pub label: String,
    pub price: f64,
}

pub trait Parser {
    fn parse(&self, html: &str, items: &[ItemConfig]) -> Result<Vec<RawQuote>, ParserError>;
}

pub struct DramExchangeParser;

impl DramExchangeParser {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DramExchangeParser {
    fn default() -> Self {
        Self::new()
    }
}

fn selector(css: &str) -> Result<Selector, ParserError> {
    Selector::parse(css).map_err(|e| ParserError::HtmlParseError(e.to_string()))
}

impl Parser for DramExchangeParser {
    /// For each configured label, takes the first table row mentioning it and
    /// reads its first numeric `td.tab_tr_gray` cell. Labels not on the page
    /// are left out.
    fn parse(&self, html: &str, items: &[ItemConfig]) -> Result<Vec<RawQuote>, ParserError> {
        let document = Html::parse_document(html);
        let row_selector = selector("tr")?;
        let price_selector = selector("td.tab_tr_gray")?;

        let rows: Vec<_> = document
            .select(&row_selector)
            .map(|row| (row.text().collect::<String>(), row))
            .collect();

        let mut quotes = Vec::new();
        for item in items {
            let price = rows
                .iter()
                .filter(|(text, _)| text.contains(&item.source_label))
                .find_map(|(_, row)| {
                    row.select(&price_selector).find_map(|cell| {
                        cell.text().collect::<String>().trim().replace(',', "").parse::<f64>().ok()
                    })
                });

            if let Some(price) = price {
                quotes.push(RawQuote {
                    label: item.source_label.clone(),
                    price,
                });
            }
        }

        Ok(quotes)
    }
}
