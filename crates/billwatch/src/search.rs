use serde::Serialize;
use url::form_urlencoded;

use crate::types::{Congress, SourceType};

pub(crate) const SEARCH_URL: &str = "https://www.congress.gov/search";

/// Page size sent alongside an explicit page number.
const PAGE_SIZE: u32 = 100;

/// The search endpoint's query object. Field order matters: it is
/// serialized in declaration order and the site expects congress first,
/// then source, then the pagination keys.
#[derive(Serialize)]
struct SearchQuery<'a> {
    congress: String,
    // The endpoint expects an array here even for a single source.
    source: [&'a str; 1],
    #[serde(rename = "pageSize", skip_serializing_if = "Option::is_none")]
    page_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    page: Option<u32>,
}

/// Builds the search-results URL for one (congress, source, page) triple.
///
/// Pure and deterministic: identical inputs always yield byte-identical
/// URLs. The query object is serialized as compact JSON and carried
/// percent-encoded in a single `q` parameter. Page 1 omits the
/// `pageSize`/`page` keys entirely; their absence is meaningful to the
/// endpoint and must not be replaced with default values.
pub fn build_search_url(congress: Congress, source: SourceType, page: u32) -> String {
    let query = SearchQuery {
        congress: congress.to_string(),
        source: [source.tag()],
        page_size: (page > 1).then_some(PAGE_SIZE),
        page: (page > 1).then_some(page),
    };

    let json = serde_json::to_string(&query).expect("search query serialization");
    let params = form_urlencoded::Serializer::new(String::new())
        .append_pair("q", &json)
        .finish();

    format!("{}?{}", SEARCH_URL, params)
}
