//! Arrow table materialization.
//!
//! One column per article field, in [`FIELD_NAMES`] order. Person and
//! organization lists are flattened to one space-joined string; an absent
//! byline is a null cell, never an empty string.

use arrow::array::{ArrayRef, StringArray, UInt32Array};
use arrow::compute::concat_batches;
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;
use broadsheet_types::{Article, FIELD_NAMES};
use std::sync::Arc;

use crate::FormatError;

/// Index of the first nullable column (`subsection_name`).
const FIRST_OPTIONAL: usize = 11;

/// Index of the `word_count` column.
const WORD_COUNT: usize = 10;

/// Creates the Arrow schema for article tables.
#[must_use]
pub fn article_schema() -> Schema {
    let fields: Vec<Field> = FIELD_NAMES
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let data_type = if i == WORD_COUNT {
                DataType::UInt32
            } else {
                DataType::Utf8
            };
            Field::new(*name, data_type, i >= FIRST_OPTIONAL)
        })
        .collect();
    Schema::new(fields)
}

fn required<'a>(articles: &'a [Article], field: fn(&'a Article) -> &'a str) -> ArrayRef {
    Arc::new(StringArray::from_iter_values(articles.iter().map(field)))
}

fn optional(articles: &[Article], field: fn(&Article) -> Option<String>) -> ArrayRef {
    Arc::new(articles.iter().map(field).collect::<StringArray>())
}

/// Converts articles to an Arrow record batch.
///
/// # Errors
///
/// Returns an error if Arrow rejects the columns.
pub fn articles_to_batch(articles: &[Article]) -> Result<RecordBatch, FormatError> {
    let columns: Vec<ArrayRef> = vec![
        required(articles, |a| a.headline.as_str()),
        required(articles, |a| a.abstract_text.as_str()),
        required(articles, |a| a.web_url.as_str()),
        required(articles, |a| a.snippet.as_str()),
        required(articles, |a| a.lead_paragraph.as_str()),
        required(articles, |a| a.pub_date.as_str()),
        required(articles, |a| a.document_type.as_str()),
        required(articles, |a| a.news_desk.as_str()),
        required(articles, |a| a.section_name.as_str()),
        required(articles, |a| a.type_of_material.as_str()),
        Arc::new(UInt32Array::from_iter_values(
            articles.iter().map(|a| a.word_count),
        )),
        optional(articles, |a| a.subsection_name.clone()),
        optional(articles, Article::author_list),
        optional(articles, Article::organization_list),
    ];
    Ok(RecordBatch::try_new(Arc::new(article_schema()), columns)?)
}

fn column_names(schema: &Schema) -> Vec<String> {
    schema.fields().iter().map(|f| f.name().clone()).collect()
}

/// Appends articles to an existing table, or starts a new one.
///
/// Existing rows keep their order and new rows follow in input order.
/// Appending an empty slice returns the existing table unchanged.
///
/// # Errors
///
/// Returns [`FormatError::SchemaMismatch`] if `existing` does not have
/// exactly the article columns (names, types and nullability).
pub fn append(
    existing: Option<&RecordBatch>,
    articles: &[Article],
) -> Result<RecordBatch, FormatError> {
    let schema: SchemaRef = Arc::new(article_schema());
    let Some(existing) = existing else {
        return articles_to_batch(articles);
    };

    if existing.schema().fields() != schema.fields() {
        return Err(FormatError::SchemaMismatch {
            expected: column_names(&schema),
            found: column_names(&existing.schema()),
        });
    }
    if articles.is_empty() {
        return Ok(existing.clone());
    }

    let new_rows = articles_to_batch(articles)?;
    Ok(concat_batches(&schema, [existing, &new_rows])?)
}
