//! Paginated news archive and article search client.
//!
//! This is a facade crate that re-exports functionality from the broadsheet
//! workspace crates for convenient access.
//!
//! # Quick Start
//!
//! ```ignore
//! use broadsheet_lib::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let credential = Credential::from_env(DEFAULT_ENV_VAR)?;
//!     let fetcher = HttpFetcher::with_defaults(credential)?;
//!     let aggregator = Aggregator::with_defaults(fetcher);
//!
//!     let since = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//!     let query = SearchQuery::new(["climate", "energy"], since)?;
//!     let aggregate = aggregator.fetch_all(&query.into()).await?;
//!
//!     let table = append(None, &aggregate.articles)?;
//!     println!("{} rows", table.num_rows());
//!     Ok(())
//! }
//! ```

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/broadsheet-rs/broadsheet/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use broadsheet_types::*;

// Re-export fetch functionality
#[cfg(feature = "fetch")]
pub use broadsheet_fetch::{
    ClientConfig, CredentialStyle, FetchError, HttpFetcher, PageFetcher, ParseError, parse_page,
};

// Re-export aggregation
#[cfg(feature = "aggregate")]
pub use broadsheet_aggregate::{
    Aggregate, AggregateError, AggregateMode, Aggregator, AggregatorConfig, DEFAULT_MAX_PAGES,
    DEFAULT_PAGE_SIZE, PageFailure, pages_needed,
};

// Re-export materializers and formatters
#[cfg(feature = "format")]
pub use broadsheet_format::{
    FormatError, Formatter, JsonFormatter, JsonStyle, OutputFormat, append, article_row,
    article_schema, articles_to_batch,
};

#[cfg(all(feature = "format", feature = "parquet"))]
pub use broadsheet_format::ParquetFormatter;

// Re-export the SQL store
#[cfg(feature = "store")]
pub use broadsheet_store::{ArticleStore, ConnectionConfig, DEFAULT_TABLE, Driver, StoreError};

/// Prelude module for convenient imports.
///
/// ```
/// use broadsheet_lib::prelude::*;
/// ```
pub mod prelude {
    pub use broadsheet_types::{
        ArchiveQuery, Article, BroadsheetError, Credential, DEFAULT_ENV_VAR, PageResult, Query,
        Result, SearchQuery,
    };

    #[cfg(feature = "fetch")]
    pub use broadsheet_fetch::{ClientConfig, CredentialStyle, HttpFetcher, PageFetcher};

    #[cfg(feature = "aggregate")]
    pub use broadsheet_aggregate::{Aggregate, AggregateMode, Aggregator, AggregatorConfig};

    #[cfg(feature = "format")]
    pub use broadsheet_format::{Formatter, JsonFormatter, OutputFormat, append};

    #[cfg(all(feature = "format", feature = "parquet"))]
    pub use broadsheet_format::ParquetFormatter;

    #[cfg(feature = "store")]
    pub use broadsheet_store::{ArticleStore, ConnectionConfig, Driver};
}
