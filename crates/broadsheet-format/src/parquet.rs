//! Apache Parquet output format.

use arrow::record_batch::RecordBatch;
use broadsheet_types::Article;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::io::Write;
use std::sync::Arc;

use crate::table::{article_schema, articles_to_batch};
use crate::{FormatError, Formatter};

/// Parquet formatter.
#[derive(Debug, Clone)]
pub struct ParquetFormatter {
    /// Row group size (number of rows per group).
    row_group_size: usize,
    /// Compression codec.
    compression: Compression,
}

impl Default for ParquetFormatter {
    fn default() -> Self {
        Self {
            row_group_size: 50_000,
            compression: Compression::SNAPPY,
        }
    }
}

impl ParquetFormatter {
    /// Creates a new Parquet formatter with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the row group size.
    #[must_use]
    pub const fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size;
        self
    }

    /// Sets the compression codec.
    #[must_use]
    pub const fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    fn writer<W: Write + Send>(&self, writer: W) -> Result<ArrowWriter<W>, FormatError> {
        let props = WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .build();
        ArrowWriter::try_new(writer, Arc::new(article_schema()), Some(props))
            .map_err(|e| FormatError::Parquet(e.to_string()))
    }

    /// Writes an already materialized article table.
    ///
    /// # Errors
    ///
    /// Returns an error if the table does not have the article schema or writing fails.
    pub fn write_table<W: Write + Send>(
        &self,
        table: &RecordBatch,
        writer: W,
    ) -> Result<(), FormatError> {
        let table = crate::table::append(Some(table), &[])?;
        let mut arrow_writer = self.writer(writer)?;
        arrow_writer
            .write(&table)
            .map_err(|e| FormatError::Parquet(e.to_string()))?;
        arrow_writer
            .close()
            .map_err(|e| FormatError::Parquet(e.to_string()))?;
        Ok(())
    }
}

impl Formatter for ParquetFormatter {
    fn write_articles<W: Write + Send>(
        &self,
        articles: &[Article],
        writer: W,
    ) -> Result<(), FormatError> {
        let mut arrow_writer = self.writer(writer)?;

        for chunk in articles.chunks(self.row_group_size.max(1)) {
            let batch = articles_to_batch(chunk)?;
            arrow_writer
                .write(&batch)
                .map_err(|e| FormatError::Parquet(e.to_string()))?;
        }

        arrow_writer
            .close()
            .map_err(|e| FormatError::Parquet(e.to_string()))?;

        Ok(())
    }

    fn extension(&self) -> &str {
        "parquet"
    }
}
