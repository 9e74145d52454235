use std::future::Future;
use std::time::Duration;

use reqwest::Client;

/// Sent on every request; the search endpoint serves a reduced page to
/// clients without a browser-like agent string.
pub(crate) const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Empty response body from {0}")]
    EmptyBody(String),
}

/// Retrieval of one page body by URL. Implemented by [`HttpFetcher`] in
/// production and by scripted fetchers in tests.
pub trait PageFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, FetchError>> + Send;
}

/// The production fetcher: one reqwest client, built once and shared for
/// the lifetime of the scraper. Connections are released when the scraper
/// is dropped, on every exit path.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(HttpFetcher { client })
    }
}

impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let html = self
            .client
            .get(url)
            .send()
            .await
            .inspect_err(|e| log::error!("HTTP error: {e:?}"))?
            .error_for_status()?
            .text()
            .await
            .inspect_err(|e| log::error!("Decode error: {e:?}"))?;

        if html.trim().is_empty() {
            return Err(FetchError::EmptyBody(url.to_string()));
        }

        Ok(html)
    }
}
