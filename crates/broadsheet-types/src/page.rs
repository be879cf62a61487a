//! Page results.

use crate::Article;

/// One response unit from a single page fetch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageResult {
    /// Articles on this page, in upstream order.
    pub articles: Vec<Article>,
    /// Total hits reported by the search envelope.
    pub total_hits: Option<u64>,
    /// The page index this result answers (search only).
    pub page: Option<u32>,
}

impl PageResult {
    /// Creates a page result.
    #[must_use]
    pub const fn new(articles: Vec<Article>, total_hits: Option<u64>, page: Option<u32>) -> Self {
        Self {
            articles,
            total_hits,
            page,
        }
    }

    /// Returns true if the page holds no articles.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    /// Returns the number of articles on the page.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.articles.len()
    }
}
