pub mod export;
pub mod fetch;
pub mod job;
pub mod parser;
pub mod scraper;
pub mod search;
pub mod types;
pub mod utils;

pub use fetch::{FetchError, HttpFetcher, PageFetcher};
pub use scraper::{CongressScraper, ScraperConfig, ScraperError};

pub(crate) const BASE_URL: &str = "https://www.congress.gov";
