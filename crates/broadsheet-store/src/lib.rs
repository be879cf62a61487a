//! Relational persistence for the broadsheet news archive client.
//!
//! - [`ConnectionConfig`] - Destination database settings
//! - [`ArticleStore`] - One connection per call, one insert per article

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/broadsheet-rs/broadsheet/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod store;

pub use config::{ConnectionConfig, Driver};
pub use store::{ArticleStore, DEFAULT_TABLE, StoreError};
