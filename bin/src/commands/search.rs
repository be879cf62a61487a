//! Search command implementation.

use anyhow::{Context, Result};
use broadsheet_lib::prelude::*;
use chrono::NaiveDate;

use super::RunArgs;

/// Search for articles matching any term, published on or after `since`.
pub(crate) async fn search(
    terms: &[String],
    since: &str,
    args: &RunArgs,
    quiet: bool,
) -> Result<()> {
    let since = NaiveDate::parse_from_str(since, "%Y-%m-%d")
        .with_context(|| format!("Invalid since date: {since}"))?;
    let query = SearchQuery::new(terms.iter().cloned(), since)?;
    super::run::run(Query::from(query), args, quiet).await
}
