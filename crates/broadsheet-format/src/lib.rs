//! Tabular materialization and output formatters for broadsheet.
//!
//! This crate turns article sequences into tables and files:
//!
//! - [`table::append`] - Arrow record batch builder with append semantics
//! - [`JsonFormatter`] - Flat JSON rows, as an array or NDJSON
//! - [`ParquetFormatter`] - Apache Parquet columnar format

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/broadsheet-rs/broadsheet/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod formatter;
mod json;
pub mod table;

#[cfg(feature = "parquet")]
mod parquet;

#[cfg(test)]
mod test_support;

pub use formatter::{FormatError, Formatter, OutputFormat};
pub use json::{JsonFormatter, JsonStyle, article_row};
pub use table::{append, article_schema, articles_to_batch};

#[cfg(feature = "parquet")]
pub use crate::parquet::ParquetFormatter;
