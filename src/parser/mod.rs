pub mod dram_parser;

pub use dram_parser::{DramExchangeParser, Parser, RawQuote};
