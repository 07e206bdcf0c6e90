// Core structs: ProductIdentifier, SessionToken, Observation, RunSummary
use reqwest::StatusCode;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Pair of numeric ids the product API needs, taken from a listing URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductIdentifier {
    pub product_id: String,
    pub variant_id: String,
}

/// Guest credential issued by the site for one run.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(***)")
    }
}

/// One timestamped snapshot of a product. Field order is the CSV column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Observation {
    pub timestamp: String,
    pub sku: Option<String>,
    pub name: Option<String>,
    pub brand: Option<String>,
    pub price: Option<i64>,
    pub list_price: Option<i64>,
    pub discount_rate: Option<i64>,
    pub seller_name: Option<String>,
    pub stock_status: Option<String>,
    pub stock_quantity: Option<i64>,
    pub rating_average: Option<f64>,
    pub review_count: Option<i64>,
    pub sold_quantity_text: Option<String>,
    pub sold_quantity_value: Option<i64>,
    pub canonical_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub recorded: usize,
    pub skipped_extract: usize,
    pub skipped_fetch: usize,
    pub skipped_invalid: usize,
    pub failed_record: usize,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("proxy is not configured, set {0}")]
    MissingProxy(&'static str),
    #[error("invalid proxy: {0}")]
    InvalidProxy(String),
    #[error("invalid config value: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
#[error("cannot extract product ids from URL: {url}")]
pub struct ExtractionError {
    pub url: String,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("token request returned HTTP {0}")]
    Status(StatusCode),
    #[error("cookie {0} was not set by the server")]
    MissingCookie(&'static str),
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {0}, token may be invalid, the ids wrong, or the request blocked")]
    Http(StatusCode),
    #[error("unexpected error while fetching product: {0}")]
    Unknown(String),
}

#[derive(Debug, Error)]
pub enum ParserError {
    #[error("invalid product JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Errors that end a run before any product is fetched.
#[derive(Debug, Error)]
pub enum JobError {
    #[error("failed to open HTTP session: {0}")]
    Session(#[from] reqwest::Error),
    #[error(transparent)]
    Token(#[from] TokenError),
}
