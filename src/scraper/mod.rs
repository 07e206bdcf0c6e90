pub mod fetcher;
pub mod token;
pub mod traits;

pub use fetcher::TikiScraper;
pub use traits::ProductApi;

pub const BASE_URL: &str = "https://tiki.vn";
