//! Display utilities and output formatting for the broadsheet CLI.

use anyhow::Result;
use broadsheet_lib::prelude::*;
use clap::ValueEnum;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Output format for fetched articles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum Format {
    Json,
    Ndjson,
    Parquet,
}

impl From<OutputFormat> for Format {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Json => Self::Json,
            OutputFormat::Ndjson => Self::Ndjson,
            OutputFormat::Parquet => Self::Parquet,
        }
    }
}

impl Format {
    /// Picks the explicit format, else the one named by the file extension, else JSON.
    pub(crate) fn resolve(explicit: Option<Self>, output: &Path) -> Self {
        explicit
            .or_else(|| {
                output
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .and_then(|ext| ext.parse::<OutputFormat>().ok())
                    .map(Self::from)
            })
            .unwrap_or(Self::Json)
    }
}

/// Write articles to a file in the specified format.
pub(crate) fn write_articles(articles: &[Article], output: &Path, format: Format) -> Result<()> {
    let file = File::create(output)?;
    let writer = BufWriter::new(file);

    match format {
        Format::Json => {
            let formatter = JsonFormatter::new().with_pretty(true);
            formatter.write_articles(articles, writer)?;
        }
        Format::Ndjson => {
            let formatter = JsonFormatter::ndjson();
            formatter.write_articles(articles, writer)?;
        }
        Format::Parquet => {
            #[cfg(feature = "parquet")]
            {
                let formatter = ParquetFormatter::new();
                formatter.write_articles(articles, writer)?;
            }
            #[cfg(not(feature = "parquet"))]
            {
                anyhow::bail!("Parquet support not compiled in");
            }
        }
    }

    Ok(())
}

/// Print fetch totals, the table shape and the first few headlines.
pub(crate) fn print_summary(aggregate: &Aggregate, rows: usize, columns: usize, preview: usize) {
    if let Some(hits) = aggregate.total_hits {
        println!("Total hits: {hits}");
    }
    println!("Pages requested: {}", aggregate.pages_requested);
    if !aggregate.is_complete() {
        println!("Failed pages: {:?}", aggregate.failed_page_indices());
    }
    println!("Table: {rows} rows x {columns} columns");

    for article in aggregate.articles.iter().take(preview) {
        let byline = article.author_list().unwrap_or_else(|| "-".to_string());
        println!("  {} | {} | {}", article.pub_date, article.headline, byline);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_format() {
        assert_eq!(Format::resolve(None, Path::new("out.parquet")), Format::Parquet);
        assert_eq!(Format::resolve(None, Path::new("out.jsonl")), Format::Ndjson);
        assert_eq!(Format::resolve(None, Path::new("out")), Format::Json);
        assert_eq!(
            Format::resolve(Some(Format::Ndjson), Path::new("out.parquet")),
            Format::Ndjson
        );
    }
}
