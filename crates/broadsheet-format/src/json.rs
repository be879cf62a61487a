//! JSON output in the flat row shape.
//!
//! Each article becomes one object keyed by [`FIELD_NAMES`], the same
//! columns the Arrow table and the SQL store carry. Person and organization
//! lists are space-joined; an absent byline is `null`.

use broadsheet_types::{Article, FIELD_NAMES};
use serde_json::{Map, Value};
use std::io::Write;

use crate::{FormatError, Formatter};

/// Converts one article to a flat JSON row.
#[must_use]
pub fn article_row(article: &Article) -> Map<String, Value> {
    let values: [Value; FIELD_NAMES.len()] = [
        article.headline.as_str().into(),
        article.abstract_text.as_str().into(),
        article.web_url.as_str().into(),
        article.snippet.as_str().into(),
        article.lead_paragraph.as_str().into(),
        article.pub_date.as_str().into(),
        article.document_type.as_str().into(),
        article.news_desk.as_str().into(),
        article.section_name.as_str().into(),
        article.type_of_material.as_str().into(),
        article.word_count.into(),
        article.subsection_name.clone().into(),
        article.author_list().into(),
        article.organization_list().into(),
    ];
    FIELD_NAMES
        .iter()
        .zip(values)
        .map(|(name, value)| ((*name).to_string(), value))
        .collect()
}

/// JSON output style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonStyle {
    /// One array of rows.
    #[default]
    Array,
    /// One row per line.
    Ndjson,
}

/// Writes articles as flat JSON rows.
#[derive(Debug, Clone, Default)]
pub struct JsonFormatter {
    style: JsonStyle,
    pretty: bool,
}

impl JsonFormatter {
    /// Array output.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            style: JsonStyle::Array,
            pretty: false,
        }
    }

    /// Line-delimited output.
    #[must_use]
    pub const fn ndjson() -> Self {
        Self {
            style: JsonStyle::Ndjson,
            pretty: false,
        }
    }

    /// Indents array output; ignored for NDJSON.
    #[must_use]
    pub const fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

impl Formatter for JsonFormatter {
    fn write_articles<W: Write + Send>(
        &self,
        articles: &[Article],
        mut writer: W,
    ) -> Result<(), FormatError> {
        let rows = articles.iter().map(article_row);
        match self.style {
            JsonStyle::Array => {
                let rows: Vec<Map<String, Value>> = rows.collect();
                if self.pretty {
                    serde_json::to_writer_pretty(&mut writer, &rows)?;
                } else {
                    serde_json::to_writer(&mut writer, &rows)?;
                }
                writeln!(writer)?;
            }
            JsonStyle::Ndjson => {
                for row in rows {
                    serde_json::to_writer(&mut writer, &row)?;
                    writeln!(writer)?;
                }
            }
        }
        writer.flush()?;
        Ok(())
    }

    fn extension(&self) -> &str {
        match self.style {
            JsonStyle::Array => "json",
            JsonStyle::Ndjson => "ndjson",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::article;

    fn render(formatter: &JsonFormatter, articles: &[Article]) -> String {
        let mut output = Vec::new();
        formatter.write_articles(articles, &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_row_matches_table_columns() {
        let row = article_row(&article("Markets"));

        assert_eq!(row.len(), FIELD_NAMES.len());
        assert!(FIELD_NAMES.iter().all(|name| row.contains_key(*name)));
        assert_eq!(row["abstract"], "Markets abstract");
        assert_eq!(row["word_count"], 500);
        assert_eq!(row["author_list"], "Jane Doe John Roe");
        assert_eq!(row["organization_list"], Value::Null);
        assert_eq!(row["subsection_name"], Value::Null);
    }

    #[test]
    fn test_blank_person_is_not_null() {
        let mut blank = article("Blank");
        blank.persons = Some(vec![" ".to_string()]);
        assert_eq!(article_row(&blank)["author_list"], " ");
    }

    #[test]
    fn test_array_keeps_input_order() {
        let out = render(&JsonFormatter::new(), &[article("First"), article("Second")]);

        let rows: Vec<Value> = serde_json::from_str(&out).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["headline"], "First");
        assert_eq!(rows[1]["headline"], "Second");
    }

    #[test]
    fn test_ndjson_one_row_per_line() {
        let formatter = JsonFormatter::ndjson().with_pretty(true);
        let out = render(&formatter, &[article("A"), article("B"), article("C")]);

        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        let last: Value = serde_json::from_str(lines[2]).unwrap();
        assert_eq!(last["headline"], "C");
        assert_eq!(formatter.extension(), "ndjson");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(render(&JsonFormatter::new(), &[]).trim(), "[]");
        assert!(render(&JsonFormatter::ndjson(), &[]).is_empty());
    }
}
