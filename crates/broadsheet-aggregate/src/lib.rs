//! Paginated result aggregation for the broadsheet news archive client.
//!
//! This crate turns a query into one ordered article sequence:
//!
//! - [`pages_needed`] - Page count from a total hit count, clamped to the upstream cap
//! - [`Aggregator`] - Bounded concurrent fan-out over a [`broadsheet_fetch::PageFetcher`]
//! - [`Aggregate`] - The merged result, with any skipped pages in best-effort mode

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/broadsheet-rs/broadsheet/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod aggregator;
mod pages;

pub use aggregator::{
    Aggregate, AggregateError, AggregateMode, Aggregator, AggregatorConfig, PageFailure,
};
pub use pages::{DEFAULT_MAX_PAGES, DEFAULT_PAGE_SIZE, pages_needed};
