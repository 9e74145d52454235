use chrono::Utc;
use scraper::{ElementRef, Html, Selector};

use crate::types::{BillAction, BillDetails, BillSummary};

/// Field extraction for one source type. Parsing is pure text-to-records;
/// all fetching stays with the orchestrator. Implementations degrade
/// gracefully: a malformed item is skipped, a missing section is empty,
/// and neither ever fails the surrounding page.
pub trait SourceParser: Send + Sync {
    /// Extracts one summary per listing item on a search-results page.
    /// Items missing their title link are skipped without affecting
    /// sibling items.
    fn parse_search_results(&self, html: &str) -> Vec<BillSummary>;

    /// Extracts the enrichment record from a bill's detail page.
    fn parse_bill_details(&self, html: &str) -> BillDetails;
}

/// Parser for the `legislation` source type.
pub struct LegislationParser;

impl SourceParser for LegislationParser {
    fn parse_search_results(&self, html: &str) -> Vec<BillSummary> {
        parse_search_results(html)
    }

    fn parse_bill_details(&self, html: &str) -> BillDetails {
        parse_bill_details(html)
    }
}

fn elem_text(element: ElementRef) -> String {
    element.text().collect::<String>()
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn select_text(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .next()
        .map(|e| normalize_whitespace(&elem_text(e)))
}

pub fn parse_search_results(html: &str) -> Vec<BillSummary> {
    let document = Html::parse_document(html);
    let item_selector = Selector::parse("li.expanded").unwrap();
    let link_selector = Selector::parse("h2.item-name a").unwrap();
    let description_selector = Selector::parse("p.item-description").unwrap();
    let status_selector = Selector::parse("span.status").unwrap();
    let sponsor_selector = Selector::parse("span.sponsor").unwrap();

    let mut results = Vec::new();
    for item in document.select(&item_selector) {
        let Some(link) = item.select(&link_selector).next() else {
            log::warn!("Skipping listing item without a title link");
            continue;
        };
        let Some(href) = link.value().attr("href") else {
            log::warn!("Skipping listing item without an href");
            continue;
        };

        let bill_number = normalize_whitespace(&elem_text(link));
        let url = if href.starts_with("http") {
            href.to_string()
        } else {
            format!("{}{}", crate::BASE_URL, href)
        };

        let title = item
            .select(&description_selector)
            .next()
            .map(|e| normalize_whitespace(&elem_text(e)))
            .unwrap_or_else(|| "No title available".to_string());

        let status = item
            .select(&status_selector)
            .next()
            .map(|e| normalize_whitespace(&elem_text(e)))
            .unwrap_or_else(|| "Status unknown".to_string());

        let sponsor = item
            .select(&sponsor_selector)
            .next()
            .map(|e| normalize_whitespace(&elem_text(e)))
            .unwrap_or_else(|| "No sponsor info".to_string());

        results.push(BillSummary {
            bill_number,
            title,
            status,
            sponsor,
            url,
            scraped_at: Utc::now(),
        });
    }

    results
}

pub fn parse_bill_details(html: &str) -> BillDetails {
    let document = Html::parse_document(html);
    let last_action_selector = Selector::parse("span.last-action").unwrap();
    let introduced_selector = Selector::parse("span.introduced-date").unwrap();

    BillDetails {
        committees: extract_committees(&document),
        actions: extract_actions(&document),
        cosponsors: extract_cosponsors(&document),
        last_action_date: select_text(&document, &last_action_selector),
        introduced_date: select_text(&document, &introduced_selector),
        scraped_at: Utc::now(),
    }
}

fn extract_committees(document: &Html) -> Vec<String> {
    let selector = Selector::parse("div.committees li").unwrap();
    document
        .select(&selector)
        .map(|e| normalize_whitespace(&elem_text(e)))
        .collect()
}

fn extract_actions(document: &Html) -> Vec<BillAction> {
    let row_selector = Selector::parse("table.actions tr").unwrap();
    let cell_selector = Selector::parse("td").unwrap();

    document
        .select(&row_selector)
        .skip(1) // header row
        .filter_map(|row| {
            let mut cells = row.select(&cell_selector);
            let date = cells.next()?;
            let action = cells.next()?;
            Some(BillAction {
                date: normalize_whitespace(&elem_text(date)),
                action: normalize_whitespace(&elem_text(action)),
            })
        })
        .collect()
}

fn extract_cosponsors(document: &Html) -> Vec<String> {
    let selector = Selector::parse("div.cosponsors li").unwrap();
    document
        .select(&selector)
        .map(|e| normalize_whitespace(&elem_text(e)))
        .collect()
}
