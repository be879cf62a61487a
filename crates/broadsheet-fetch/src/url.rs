//! Endpoint URL construction.

use broadsheet_types::{ArchiveQuery, SearchQuery};
use reqwest::Url;

/// Default API base URL.
pub const BASE_URL: &str = "https://api.nytimes.com/svc";

/// Builds the archive URL for one month.
///
/// URL format: `{base}/archive/v1/{YEAR}/{MONTH}.json` (month not zero-padded).
///
/// `base` must be able to carry path segments (http or https).
///
/// # Example
///
/// ```
/// use broadsheet_fetch::url::{archive_url, BASE_URL};
/// use broadsheet_types::ArchiveQuery;
///
/// let base = BASE_URL.parse().unwrap();
/// let url = archive_url(&base, &ArchiveQuery::new(7, 2023).unwrap());
/// assert_eq!(url.as_str(), "https://api.nytimes.com/svc/archive/v1/2023/7.json");
/// ```
#[must_use]
pub fn archive_url(base: &Url, query: &ArchiveQuery) -> Url {
    let year = query.year().to_string();
    let month = format!("{}.json", query.month());
    with_path(base, &["archive", "v1", &year, &month])
}

/// Builds the article search URL for one page, without the credential.
#[must_use]
pub fn search_url(base: &Url, query: &SearchQuery) -> Url {
    let mut url = with_path(base, &["search", "v2", "articlesearch.json"]);
    url.query_pairs_mut()
        .append_pair("q", &query.disjunction())
        .append_pair("fq", &query.date_filter())
        .append_pair("page", &query.page().to_string());
    url
}

fn with_path(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    url.set_query(None);
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}
