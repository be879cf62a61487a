//! Concurrent page fan-out and ordered merge.

use broadsheet_fetch::{FetchError, PageFetcher};
use broadsheet_types::{Article, BroadsheetError, PageResult, Query, SearchQuery};
use futures::stream::{self, StreamExt};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::pages::{DEFAULT_MAX_PAGES, DEFAULT_PAGE_SIZE, pages_needed};

/// What to do when a page after page 0 fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AggregateMode {
    /// Any page failure fails the whole call.
    #[default]
    AllOrNothing,
    /// Failed pages are skipped and reported in [`Aggregate::failed_pages`].
    BestEffort,
}

/// Configuration for the aggregator.
#[derive(Debug, Clone)]
pub struct AggregatorConfig {
    /// Items per page served upstream.
    pub page_size: u32,
    /// Upstream page cap; pages beyond it are never requested.
    pub max_pages: u32,
    /// Maximum page requests in flight at once (0 is treated as 1).
    pub concurrency: usize,
    /// Failure handling for pages after page 0.
    pub mode: AggregateMode,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: DEFAULT_MAX_PAGES,
            concurrency: 5,
            mode: AggregateMode::AllOrNothing,
        }
    }
}

/// A page that was skipped in best-effort mode.
#[derive(Debug)]
pub struct PageFailure {
    /// Page index.
    pub page: u32,
    /// Why the fetch failed.
    pub error: FetchError,
}

/// Articles merged from every fetched page, in page-index order.
#[derive(Debug, Default)]
pub struct Aggregate {
    /// Merged articles.
    pub articles: Vec<Article>,
    /// Total hits reported by page 0 (search only).
    pub total_hits: Option<u64>,
    /// Number of pages requested, including page 0.
    pub pages_requested: u32,
    /// Pages skipped in best-effort mode, ascending by index.
    pub failed_pages: Vec<PageFailure>,
}

impl Aggregate {
    /// Returns true if no page was skipped.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.failed_pages.is_empty()
    }

    /// Returns the indices of skipped pages.
    #[must_use]
    pub fn failed_page_indices(&self) -> Vec<u32> {
        self.failed_pages.iter().map(|f| f.page).collect()
    }
}

/// Errors that fail a whole aggregation.
#[derive(Error, Debug)]
pub enum AggregateError {
    /// A page fetch failed.
    #[error("page {page} failed: {source}")]
    Page {
        /// Page index (0 for archive queries).
        page: u32,
        /// The underlying fetch error, carrying URL and status.
        #[source]
        source: FetchError,
    },
}

impl AggregateError {
    /// Returns the failing page index.
    #[must_use]
    pub const fn page(&self) -> u32 {
        match self {
            Self::Page { page, .. } => *page,
        }
    }

    /// Returns the HTTP status, if the failure was an upstream status.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Page { source, .. } => source.status(),
        }
    }

    /// Returns the failing request URL, if any.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Page { source, .. } => source.url(),
        }
    }
}

impl From<AggregateError> for BroadsheetError {
    fn from(e: AggregateError) -> Self {
        Self::Fetch(e.to_string())
    }
}

/// Fetches every page of a query and merges the results.
///
/// Pages after page 0 are polled concurrently on the calling task, at most
/// `concurrency` at a time. In all-or-nothing mode the first failure returns
/// immediately: requests still in flight are dropped and pages not yet
/// started are never sent.
#[derive(Debug, Clone)]
pub struct Aggregator<F> {
    fetcher: F,
    config: AggregatorConfig,
}

impl<F: PageFetcher> Aggregator<F> {
    /// Creates an aggregator over the given fetcher.
    #[must_use]
    pub const fn new(fetcher: F, config: AggregatorConfig) -> Self {
        Self { fetcher, config }
    }

    /// Creates an aggregator with default configuration.
    #[must_use]
    pub fn with_defaults(fetcher: F) -> Self {
        Self::new(fetcher, AggregatorConfig::default())
    }

    /// Returns the underlying fetcher.
    #[must_use]
    pub const fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Returns the aggregator configuration.
    #[must_use]
    pub const fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    /// Fetches all pages for `query` and merges them in page order.
    ///
    /// Archive queries are a single unpaginated request. Search queries use
    /// `query` as a template; its own page index is ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if page 0 fails, or if any page fails in
    /// all-or-nothing mode.
    #[instrument(skip_all, fields(query = %query))]
    pub async fn fetch_all(&self, query: &Query) -> Result<Aggregate, AggregateError> {
        match query {
            Query::Archive(_) => {
                let page = self
                    .fetcher
                    .fetch(query)
                    .await
                    .map_err(|source| AggregateError::Page { page: 0, source })?;
                info!(articles = page.len(), "archive fetched");
                Ok(Aggregate {
                    total_hits: page.total_hits,
                    articles: page.articles,
                    pages_requested: 1,
                    failed_pages: Vec::new(),
                })
            }
            Query::Search(template) => self.fetch_search(template).await,
        }
    }

    async fn fetch_search(&self, template: &SearchQuery) -> Result<Aggregate, AggregateError> {
        let first = self
            .fetch_page(template, 0)
            .await
            .map_err(|source| AggregateError::Page { page: 0, source })?;

        let total_hits = first.total_hits.unwrap_or(0);
        let pages = pages_needed(total_hits, self.config.page_size, self.config.max_pages);
        info!(total_hits, pages, "first page fetched");

        let mut slots: Vec<Option<Vec<Article>>> = Vec::with_capacity(pages as usize);
        slots.push(Some(first.articles));
        slots.resize_with(pages as usize, || None);

        let mut failed_pages = Vec::new();
        let mut results = stream::iter(1..pages)
            .map(|page| async move { (page, self.fetch_page(template, page).await) })
            .buffer_unordered(self.config.concurrency.max(1));

        while let Some((page, result)) = results.next().await {
            match result {
                Ok(fetched) => {
                    debug!(page, articles = fetched.len(), "page fetched");
                    slots[page as usize] = Some(fetched.articles);
                }
                Err(error) => match self.config.mode {
                    AggregateMode::AllOrNothing => {
                        warn!(page, error = %error, "page failed, aborting aggregation");
                        return Err(AggregateError::Page {
                            page,
                            source: error,
                        });
                    }
                    AggregateMode::BestEffort => {
                        warn!(page, error = %error, "page failed, skipping");
                        failed_pages.push(PageFailure { page, error });
                    }
                },
            }
        }

        failed_pages.sort_by_key(|f| f.page);
        let articles: Vec<Article> = slots.into_iter().flatten().flatten().collect();
        info!(
            articles = articles.len(),
            failed = failed_pages.len(),
            "aggregation finished"
        );

        Ok(Aggregate {
            articles,
            total_hits: first.total_hits,
            pages_requested: pages,
            failed_pages,
        })
    }

    async fn fetch_page(&self, template: &SearchQuery, page: u32) -> Result<PageResult, FetchError> {
        self.fetcher
            .fetch(&Query::Search(template.with_page(page)))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use broadsheet_types::ArchiveQuery;
    use chrono::NaiveDate;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn article(page: u32, index: u64) -> Article {
        Article {
            headline: format!("p{page}-{index}"),
            abstract_text: String::new(),
            web_url: format!("https://example.com/{page}/{index}"),
            snippet: String::new(),
            lead_paragraph: String::new(),
            pub_date: "2023-07-01T00:00:00+0000".to_string(),
            document_type: "article".to_string(),
            news_desk: String::new(),
            section_name: String::new(),
            type_of_material: "News".to_string(),
            word_count: 0,
            subsection_name: None,
            persons: None,
            organizations: None,
        }
    }

    /// Serves `total_hits` synthetic articles, ten per page.
    #[derive(Default)]
    struct StubFetcher {
        total_hits: u64,
        failures: HashMap<u32, u16>,
        reverse_delay: bool,
        calls: Mutex<Vec<u32>>,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    impl StubFetcher {
        fn new(total_hits: u64) -> Self {
            Self {
                total_hits,
                ..Default::default()
            }
        }

        fn failing(mut self, page: u32, status: u16) -> Self {
            self.failures.insert(page, status);
            self
        }

        fn reversed(mut self) -> Self {
            self.reverse_delay = true;
            self
        }

        fn calls(&self) -> Vec<u32> {
            let mut calls = self.calls.lock().unwrap().clone();
            calls.sort_unstable();
            calls
        }
    }

    #[async_trait]
    impl PageFetcher for StubFetcher {
        async fn fetch(&self, query: &Query) -> Result<PageResult, FetchError> {
            let page = query.page().unwrap_or(0);
            self.calls.lock().unwrap().push(page);

            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            let delay = if self.reverse_delay {
                30u64.saturating_sub(u64::from(page) * 3)
            } else {
                2
            };
            tokio::time::sleep(Duration::from_millis(delay)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if let Some(status) = self.failures.get(&page) {
                return Err(FetchError::Upstream {
                    url: format!("https://example.com/search?page={page}"),
                    status: *status,
                });
            }

            let start = u64::from(page) * 10;
            let end = self.total_hits.min(start + 10);
            let articles = (start..end).map(|i| article(page, i - start)).collect();
            let total_hits = matches!(query, Query::Search(_)).then_some(self.total_hits);
            Ok(PageResult::new(articles, total_hits, query.page()))
        }
    }

    fn search() -> Query {
        let since = NaiveDate::from_ymd_opt(2019, 1, 1).unwrap();
        Query::Search(SearchQuery::new(["tech"], since).unwrap())
    }

    fn headlines(aggregate: &Aggregate) -> Vec<String> {
        aggregate
            .articles
            .iter()
            .map(|a| a.headline.clone())
            .collect()
    }

    #[test]
    fn test_config_default() {
        let config = AggregatorConfig::default();
        assert_eq!(config.page_size, 10);
        assert_eq!(config.max_pages, 100);
        assert_eq!(config.concurrency, 5);
        assert_eq!(config.mode, AggregateMode::AllOrNothing);
    }

    #[tokio::test]
    async fn test_zero_hits_fetches_only_page_zero() {
        let aggregator = Aggregator::with_defaults(StubFetcher::new(0));
        let aggregate = aggregator.fetch_all(&search()).await.unwrap();

        assert!(aggregate.articles.is_empty());
        assert_eq!(aggregate.pages_requested, 1);
        assert_eq!(aggregator.fetcher().calls(), vec![0]);
    }

    #[tokio::test]
    async fn test_partial_last_page() {
        let aggregator = Aggregator::with_defaults(StubFetcher::new(101));
        let aggregate = aggregator.fetch_all(&search()).await.unwrap();

        assert_eq!(aggregate.pages_requested, 11);
        assert_eq!(aggregate.articles.len(), 101);
        assert_eq!(aggregate.total_hits, Some(101));
        assert_eq!(aggregator.fetcher().calls(), (0..11).collect::<Vec<_>>());
        assert_eq!(aggregate.articles.last().unwrap().headline, "p10-0");
    }

    #[tokio::test]
    async fn test_order_preserved_when_later_pages_finish_first() {
        let aggregator = Aggregator::new(
            StubFetcher::new(50).reversed(),
            AggregatorConfig {
                concurrency: 10,
                ..Default::default()
            },
        );
        let aggregate = aggregator.fetch_all(&search()).await.unwrap();

        let expected: Vec<String> = (0..5)
            .flat_map(|p| (0..10).map(move |i| format!("p{p}-{i}")))
            .collect();
        assert_eq!(headlines(&aggregate), expected);
    }

    #[tokio::test]
    async fn test_pages_beyond_cap_never_requested() {
        let aggregator = Aggregator::new(
            StubFetcher::new(5000),
            AggregatorConfig {
                concurrency: 20,
                ..Default::default()
            },
        );
        let aggregate = aggregator.fetch_all(&search()).await.unwrap();

        assert_eq!(aggregate.pages_requested, 100);
        assert_eq!(aggregate.articles.len(), 1000);
        let calls = aggregator.fetcher().calls();
        assert_eq!(calls.len(), 100);
        assert_eq!(calls.last(), Some(&99));
    }

    #[tokio::test]
    async fn test_concurrency_is_bounded() {
        let aggregator = Aggregator::new(
            StubFetcher::new(300),
            AggregatorConfig {
                concurrency: 3,
                ..Default::default()
            },
        );
        aggregator.fetch_all(&search()).await.unwrap();

        let max = aggregator.fetcher().max_in_flight.load(Ordering::SeqCst);
        assert!(max <= 3, "saw {max} requests in flight");
        assert!(max >= 2);
    }

    #[tokio::test]
    async fn test_page_failure_fails_whole_call() {
        let aggregator = Aggregator::with_defaults(StubFetcher::new(100).failing(3, 500));
        let err = aggregator.fetch_all(&search()).await.unwrap_err();

        assert_eq!(err.page(), 3);
        assert_eq!(err.status(), Some(500));
        assert!(err.url().unwrap().contains("page=3"));
    }

    #[tokio::test]
    async fn test_best_effort_reports_failed_pages() {
        let aggregator = Aggregator::new(
            StubFetcher::new(100).failing(7, 503).failing(3, 500),
            AggregatorConfig {
                mode: AggregateMode::BestEffort,
                ..Default::default()
            },
        );
        let aggregate = aggregator.fetch_all(&search()).await.unwrap();

        assert!(!aggregate.is_complete());
        assert_eq!(aggregate.failed_page_indices(), vec![3, 7]);
        assert_eq!(aggregate.articles.len(), 80);
        assert!(headlines(&aggregate).iter().all(|h| !h.starts_with("p3-")));
        assert_eq!(aggregate.failed_pages[0].error.status(), Some(500));
    }

    #[tokio::test]
    async fn test_best_effort_still_fails_on_first_page() {
        let aggregator = Aggregator::new(
            StubFetcher::new(100).failing(0, 429),
            AggregatorConfig {
                mode: AggregateMode::BestEffort,
                ..Default::default()
            },
        );
        let err = aggregator.fetch_all(&search()).await.unwrap_err();

        assert_eq!(err.page(), 0);
        assert_eq!(aggregator.fetcher().calls(), vec![0]);
    }

    #[tokio::test]
    async fn test_rerun_yields_identical_sequence() {
        let aggregator = Aggregator::with_defaults(StubFetcher::new(73).reversed());
        let first = aggregator.fetch_all(&search()).await.unwrap();
        let second = aggregator.fetch_all(&search()).await.unwrap();

        assert_eq!(first.articles, second.articles);
    }

    #[tokio::test]
    async fn test_template_page_index_ignored() {
        let since = NaiveDate::from_ymd_opt(2019, 1, 1).unwrap();
        let query = Query::Search(SearchQuery::new(["tech"], since).unwrap().with_page(4));
        let aggregator = Aggregator::with_defaults(StubFetcher::new(20));
        let aggregate = aggregator.fetch_all(&query).await.unwrap();

        assert_eq!(aggregate.articles.len(), 20);
        assert_eq!(aggregator.fetcher().calls(), vec![0, 1]);
    }

    #[tokio::test]
    async fn test_archive_is_single_request() {
        let aggregator = Aggregator::with_defaults(StubFetcher::new(7));
        let query = Query::Archive(ArchiveQuery::new(7, 2023).unwrap());
        let aggregate = aggregator.fetch_all(&query).await.unwrap();

        assert_eq!(aggregate.pages_requested, 1);
        assert_eq!(aggregate.articles.len(), 7);
        assert_eq!(aggregate.total_hits, None);
        assert_eq!(aggregator.fetcher().calls(), vec![0]);
    }
}
