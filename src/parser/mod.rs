// Parsing: listing URLs into ids, API bodies into observations.

pub mod tiki_parser;
pub mod url;

pub use tiki_parser::{Parser, TikiProductParser};
pub use url::extract_ids;
