use std::collections::HashMap;

use futures::StreamExt;
use futures::stream;

use crate::fetch::{FetchError, HttpFetcher, PageFetcher};
use crate::job::{JobQueue, ScrapeJob};
use crate::parser::{LegislationParser, SourceParser};
use crate::search::build_search_url;
use crate::types::{Bill, BillDetails, BillSummary, SourceType};

#[derive(Debug, thiserror::Error)]
pub enum ScraperError {
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),
    #[error("No parser registered for source type: {0}")]
    UnknownSource(SourceType),
}

#[derive(Debug, Clone)]
pub struct ScraperConfig {
    /// Most recent congress session to scrape; the range runs descending
    /// from here to `end_congress`, inclusive.
    pub start_congress: u16,
    pub end_congress: u16,
    pub sources: Vec<SourceType>,
    /// Upper bound on concurrent detail-page fetches within one search
    /// page. Search pages themselves are always fetched sequentially:
    /// continuation depends on each page's result emptiness.
    pub max_workers: usize,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        ScraperConfig {
            start_congress: 119,
            end_congress: 115,
            sources: vec![SourceType::Legislation],
            max_workers: 5,
        }
    }
}

impl ScraperConfig {
    pub fn validate(self) -> Result<Self, String> {
        if self.start_congress < self.end_congress {
            return Err(format!(
                "Start congress ({}) must not be older than end congress ({}); \
                 the range is scraped newest-first",
                self.start_congress, self.end_congress
            ));
        }
        if self.sources.is_empty() {
            return Err("At least one source type is required".to_string());
        }
        if self.max_workers == 0 {
            return Err("Worker budget must be greater than 0".to_string());
        }
        Ok(self)
    }
}

type ParserRegistry = HashMap<SourceType, Box<dyn SourceParser>>;

/// Fixed registration table, built once at startup. Legislation is the
/// only populated entry; other source types are extension points and a
/// job for them degrades to an empty result with an error log.
fn default_registry() -> ParserRegistry {
    let mut registry: ParserRegistry = HashMap::new();
    registry.insert(SourceType::Legislation, Box::new(LegislationParser));
    registry
}

/// Drains a queue of (congress, source, page) jobs: fetch the search page,
/// parse its listings, enrich every listing from its detail page, and
/// enqueue the next page while results keep coming.
pub struct CongressScraper<F = HttpFetcher> {
    fetcher: F,
    registry: ParserRegistry,
    config: ScraperConfig,
}

impl CongressScraper<HttpFetcher> {
    pub fn new(config: ScraperConfig) -> Result<Self, ScraperError> {
        Ok(CongressScraper::with_fetcher(config, HttpFetcher::new()?))
    }
}

impl<F: PageFetcher> CongressScraper<F> {
    pub fn with_fetcher(config: ScraperConfig, fetcher: F) -> Self {
        CongressScraper {
            fetcher,
            registry: default_registry(),
            config,
        }
    }

    /// Runs the full scrape and returns everything accumulated. Per-job
    /// failures are logged and degrade to empty results; this method
    /// never propagates an error past its own boundary.
    pub async fn scrape(&self) -> Vec<Bill> {
        let mut queue = JobQueue::seed(
            self.config.start_congress,
            self.config.end_congress,
            &self.config.sources,
        );
        log::info!(
            "Seeded {} job(s) for congresses {} down to {}",
            queue.len(),
            self.config.start_congress,
            self.config.end_congress
        );

        let mut bills = Vec::new();
        while let Some(job) = queue.pop() {
            let items = self.scrape_page(&job).await;

            // A non-empty page is the only signal that another page may
            // exist; an empty one ends this (congress, source) sequence.
            if !items.is_empty() {
                queue.push(job.next_page());
            }
            bills.extend(items);
        }

        log::info!("Scraped {} bill(s) in total", bills.len());
        bills
    }

    async fn scrape_page(&self, job: &ScrapeJob) -> Vec<Bill> {
        let Some(parser) = self.registry.get(&job.source) else {
            log::error!("No parser registered for source type: {}", job.source);
            return Vec::new();
        };

        let url = build_search_url(job.congress, job.source, job.page);
        log::info!("Fetching {}...", job);

        let html = match self.fetcher.fetch(&url).await {
            Ok(html) => html,
            Err(e) => {
                log::error!("Failed to fetch {}: {}", job, e);
                return Vec::new();
            }
        };

        let summaries = parser.parse_search_results(&html);
        log::info!("Parsed {} listing item(s) from {}", summaries.len(), job);

        stream::iter(summaries)
            .map(|summary| self.enrich(parser.as_ref(), summary))
            .buffered(self.config.max_workers)
            .collect()
            .await
    }

    async fn enrich(&self, parser: &dyn SourceParser, summary: BillSummary) -> Bill {
        let mut bill = Bill::from(summary);
        match self.fetcher.fetch(&bill.url).await {
            Ok(html) => bill.enrich(parser.parse_bill_details(&html)),
            Err(e) => log::warn!("Failed to fetch details for {}: {}", bill.bill_number, e),
        }
        bill
    }

    /// One-shot fetch and parse of a single bill detail page.
    pub async fn fetch_bill_details(
        &self,
        source: SourceType,
        url: &str,
    ) -> Result<BillDetails, ScraperError> {
        let parser = self
            .registry
            .get(&source)
            .ok_or(ScraperError::UnknownSource(source))?;
        let html = self.fetcher.fetch(url).await?;
        Ok(parser.parse_bill_details(&html))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use crate::types::Congress;

    /// Serves canned page bodies by URL and records every request. URLs
    /// with no canned body fail the way a broken fetch does.
    struct ScriptedFetcher {
        pages: HashMap<String, String>,
        requests: Mutex<Vec<String>>,
    }

    impl ScriptedFetcher {
        fn new(pages: HashMap<String, String>) -> Self {
            ScriptedFetcher {
                pages,
                requests: Mutex::new(Vec::new()),
            }
        }

        fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl PageFetcher for ScriptedFetcher {
        async fn fetch(&self, url: &str) -> Result<String, FetchError> {
            self.requests.lock().unwrap().push(url.to_string());
            self.pages
                .get(url)
                .cloned()
                .ok_or_else(|| FetchError::EmptyBody(url.to_string()))
        }
    }

    fn listing_page(count: usize) -> String {
        let items: String = (1..=count)
            .map(|i| {
                format!(
                    r#"<li class="expanded">
                        <h2 class="item-name"><a href="/bill/119th-congress/house-bill/{i}">H.R. {i}</a></h2>
                        <p class="item-description">Bill number {i}.</p>
                        <span class="status">Introduced</span>
                        <span class="sponsor">Rep. Sponsor {i}</span>
                    </li>"#
                )
            })
            .collect();
        format!("<ol>{}</ol>", items)
    }

    const EMPTY_PAGE: &str = "<html><body><p>No results found.</p></body></html>";

    const DETAIL_PAGE: &str = r#"
        <div class="committees"><ul><li>House Committee on the Judiciary</li></ul></div>
        <table class="actions">
            <tr><th>Date</th><th>Action</th></tr>
            <tr><td>01/03/2025</td><td>Introduced in House</td></tr>
        </table>
        <div class="cosponsors"><ul><li>Rep. Cosponsor</li></ul></div>
    "#;

    fn detail_url(i: usize) -> String {
        format!("https://www.congress.gov/bill/119th-congress/house-bill/{i}")
    }

    fn single_congress_config(sources: Vec<SourceType>) -> ScraperConfig {
        ScraperConfig {
            start_congress: 119,
            end_congress: 119,
            sources,
            max_workers: 5,
        }
    }

    #[tokio::test]
    async fn test_scrape_paginates_until_an_empty_page() {
        let mut pages = HashMap::new();
        pages.insert(
            build_search_url(Congress::Number(119), SourceType::Legislation, 1),
            listing_page(3),
        );
        pages.insert(
            build_search_url(Congress::Number(119), SourceType::Legislation, 2),
            EMPTY_PAGE.to_string(),
        );
        for i in 1..=3 {
            pages.insert(detail_url(i), DETAIL_PAGE.to_string());
        }

        let scraper = CongressScraper::with_fetcher(
            single_congress_config(vec![SourceType::Legislation]),
            ScriptedFetcher::new(pages),
        );
        let bills = scraper.scrape().await;

        assert_eq!(bills.len(), 3);
        assert_eq!(bills[0].bill_number, "H.R. 1");
        assert_eq!(bills[1].bill_number, "H.R. 2");
        assert_eq!(bills[2].bill_number, "H.R. 3");

        // Search-result fields survive the enrichment merge.
        assert_eq!(bills[0].title, "Bill number 1.");
        assert_eq!(bills[0].status, "Introduced");
        assert_eq!(bills[0].sponsor, "Rep. Sponsor 1");
        for bill in &bills {
            assert!(bill.enriched_at.is_some());
            assert_eq!(bill.committees, vec!["House Committee on the Judiciary"]);
            assert_eq!(bill.actions.len(), 1);
            assert_eq!(bill.cosponsors, vec!["Rep. Cosponsor"]);
        }

        let requests = scraper.fetcher.requests();
        let search_fetches = requests.iter().filter(|u| u.contains("/search?")).count();
        let detail_fetches = requests.iter().filter(|u| u.contains("/bill/")).count();
        assert_eq!(search_fetches, 2);
        assert_eq!(detail_fetches, 3);
    }

    #[tokio::test]
    async fn test_fetch_failure_yields_empty_run_and_no_continuation() {
        let scraper = CongressScraper::with_fetcher(
            single_congress_config(vec![SourceType::Legislation]),
            ScriptedFetcher::new(HashMap::new()),
        );
        let bills = scraper.scrape().await;

        assert!(bills.is_empty());
        // Only the page-1 search fetch was attempted; the failed page did
        // not enqueue page 2.
        assert_eq!(scraper.fetcher.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_unregistered_source_skips_fetching_entirely() {
        let scraper = CongressScraper::with_fetcher(
            single_congress_config(vec![SourceType::CommitteeReports]),
            ScriptedFetcher::new(HashMap::new()),
        );
        let bills = scraper.scrape().await;

        assert!(bills.is_empty());
        assert!(scraper.fetcher.requests().is_empty());
    }

    #[tokio::test]
    async fn test_detail_fetch_failure_keeps_the_summary() {
        let mut pages = HashMap::new();
        pages.insert(
            build_search_url(Congress::Number(119), SourceType::Legislation, 1),
            listing_page(1),
        );
        pages.insert(
            build_search_url(Congress::Number(119), SourceType::Legislation, 2),
            EMPTY_PAGE.to_string(),
        );
        // No detail page: the enrichment fetch fails.

        let scraper = CongressScraper::with_fetcher(
            single_congress_config(vec![SourceType::Legislation]),
            ScriptedFetcher::new(pages),
        );
        let bills = scraper.scrape().await;

        assert_eq!(bills.len(), 1);
        assert_eq!(bills[0].bill_number, "H.R. 1");
        assert!(bills[0].enriched_at.is_none());
        assert!(bills[0].committees.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_bill_details() {
        let mut pages = HashMap::new();
        pages.insert(detail_url(1), DETAIL_PAGE.to_string());

        let scraper = CongressScraper::with_fetcher(
            ScraperConfig::default(),
            ScriptedFetcher::new(pages),
        );

        let details = scraper
            .fetch_bill_details(SourceType::Legislation, &detail_url(1))
            .await
            .expect("detail fetch should succeed");
        assert_eq!(details.committees.len(), 1);
        assert_eq!(details.actions.len(), 1);

        let err = scraper
            .fetch_bill_details(SourceType::CommitteeReports, &detail_url(1))
            .await
            .unwrap_err();
        assert!(matches!(err, ScraperError::UnknownSource(_)));
    }

    #[test]
    fn test_config_validate() {
        assert!(ScraperConfig::default().validate().is_ok());

        let inverted = ScraperConfig {
            start_congress: 115,
            end_congress: 119,
            ..ScraperConfig::default()
        };
        assert!(inverted.validate().is_err());

        let no_sources = ScraperConfig {
            sources: Vec::new(),
            ..ScraperConfig::default()
        };
        assert!(no_sources.validate().is_err());

        let no_workers = ScraperConfig {
            max_workers: 0,
            ..ScraperConfig::default()
        };
        assert!(no_workers.validate().is_err());
    }
}
