//! Article metadata record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Column names in record order, shared by every materializer.
pub const FIELD_NAMES: [&str; 14] = [
    "headline",
    "abstract",
    "web_url",
    "snippet",
    "lead_paragraph",
    "pub_date",
    "document_type",
    "news_desk",
    "section_name",
    "type_of_material",
    "word_count",
    "subsection_name",
    "author_list",
    "organization_list",
];

/// A single article's metadata.
///
/// `persons` and `organizations` are `None` when the byline lists nobody.
/// They are never `Some` of an empty vector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    /// Main headline.
    pub headline: String,
    /// Article abstract.
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    /// Canonical web URL.
    pub web_url: String,
    /// Search snippet.
    pub snippet: String,
    /// First paragraph.
    pub lead_paragraph: String,
    /// Publication timestamp as sent upstream.
    pub pub_date: String,
    /// Document type (article, multimedia, ...).
    pub document_type: String,
    /// Originating news desk.
    pub news_desk: String,
    /// Section name.
    pub section_name: String,
    /// Type of material (News, Op-Ed, ...).
    pub type_of_material: String,
    /// Word count.
    pub word_count: u32,
    /// Subsection name, if any.
    pub subsection_name: Option<String>,
    /// Person authors as display names.
    pub persons: Option<Vec<String>>,
    /// Organization authors.
    pub organizations: Option<Vec<String>>,
}

impl Article {
    /// Parses `pub_date` into a UTC timestamp.
    ///
    /// Accepts the upstream `2023-07-01T04:00:12+0000` form as well as RFC 3339.
    #[must_use]
    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_str(&self.pub_date, "%Y-%m-%dT%H:%M:%S%z")
            .or_else(|_| DateTime::parse_from_rfc3339(&self.pub_date))
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Returns the person authors flattened to one display string.
    #[must_use]
    pub fn author_list(&self) -> Option<String> {
        flatten_names(self.persons.as_deref())
    }

    /// Returns the organization authors flattened to one display string.
    #[must_use]
    pub fn organization_list(&self) -> Option<String> {
        flatten_names(self.organizations.as_deref())
    }
}

/// Joins names with a single space, mapping absent or empty lists to `None`.
///
/// ```
/// use broadsheet_types::flatten_names;
///
/// let names = vec!["Jane Doe".to_string(), "John Roe".to_string()];
/// assert_eq!(flatten_names(Some(names.as_slice())).as_deref(), Some("Jane Doe John Roe"));
/// assert_eq!(flatten_names(Some(&[][..])), None);
/// assert_eq!(flatten_names(None), None);
/// ```
#[must_use]
pub fn flatten_names(names: Option<&[String]>) -> Option<String> {
    match names {
        Some(names) if !names.is_empty() => Some(names.join(" ")),
        _ => None,
    }
}
