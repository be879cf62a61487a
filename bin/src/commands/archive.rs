//! Archive command implementation.

use anyhow::Result;
use broadsheet_lib::prelude::*;

use super::RunArgs;

/// Fetch one archive month.
pub(crate) async fn archive(month: u32, year: i32, args: &RunArgs, quiet: bool) -> Result<()> {
    let query = ArchiveQuery::new(month, year)?;
    super::run::run(Query::from(query), args, quiet).await
}
