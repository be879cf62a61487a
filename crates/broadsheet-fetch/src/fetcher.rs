//! Page fetching capability.

use async_trait::async_trait;
use broadsheet_types::{PageResult, Query};

use crate::FetchError;

/// Fetches one logical page for a query.
///
/// Implementations make a single attempt per call and must be safe to call
/// concurrently from one task.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches and parses the page described by `query`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the server answers with a
    /// status other than 200, or the body cannot be parsed.
    async fn fetch(&self, query: &Query) -> Result<PageResult, FetchError>;
}

#[async_trait]
impl<T: PageFetcher + ?Sized> PageFetcher for std::sync::Arc<T> {
    async fn fetch(&self, query: &Query) -> Result<PageResult, FetchError> {
        (**self).fetch(query).await
    }
}
