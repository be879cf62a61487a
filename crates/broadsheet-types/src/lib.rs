//! Core types for the broadsheet news archive client.
//!
//! This crate provides the fundamental data structures used throughout broadsheet:
//!
//! - [`Query`] - What to fetch: a monthly archive dump or one search page
//! - [`Article`] - A normalized article metadata record
//! - [`PageResult`] - One response unit returned by a page fetch
//! - [`Credential`] - The API key attached to every request

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/broadsheet-rs/broadsheet/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod article;
mod credential;
mod error;
mod page;
mod query;

pub use article::{Article, FIELD_NAMES, flatten_names};
pub use credential::{Credential, DEFAULT_ENV_VAR};
pub use error::{BroadsheetError, Result};
pub use page::PageResult;
pub use query::{ArchiveQuery, Query, SearchQuery};
