//! HTTP page fetching for the broadsheet news archive client.
//!
//! This crate provides the page-level request pipeline:
//!
//! - [`url::archive_url`] / [`url::search_url`] - Endpoint construction
//! - [`PageFetcher`] - Capability trait the aggregator is written against
//! - [`HttpFetcher`] - `reqwest`-backed fetcher, one attempt per call
//! - [`parse::parse_page`] - Response envelope parsing

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/broadsheet-rs/broadsheet/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
mod fetcher;
pub mod parse;
pub mod url;

pub use client::{ClientConfig, CredentialStyle, FetchError, HttpFetcher};
pub use fetcher::PageFetcher;
pub use parse::{ParseError, parse_page};
