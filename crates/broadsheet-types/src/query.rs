//! Query descriptions.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::BroadsheetError;

/// Request for every article published in one month.
///
/// Deserialization goes through [`ArchiveQuery::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "ArchiveFields")]
pub struct ArchiveQuery {
    month: u32,
    year: i32,
}

impl ArchiveQuery {
    /// Creates an archive query, validating the month.
    ///
    /// # Errors
    ///
    /// Returns an error if `month` is not in `1..=12`.
    pub fn new(month: u32, year: i32) -> Result<Self, BroadsheetError> {
        if !(1..=12).contains(&month) {
            return Err(BroadsheetError::InvalidQuery(format!(
                "month must be between 1 and 12, got {month}"
            )));
        }
        Ok(Self { month, year })
    }

    /// Returns the month (1-12).
    #[must_use]
    pub const fn month(&self) -> u32 {
        self.month
    }

    /// Returns the year.
    #[must_use]
    pub const fn year(&self) -> i32 {
        self.year
    }
}

/// Keyword search for one result page.
///
/// Deserialization goes through [`SearchQuery::new`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "SearchFields")]
pub struct SearchQuery {
    terms: Vec<String>,
    since: NaiveDate,
    page: u32,
}

#[derive(Deserialize)]
struct ArchiveFields {
    month: u32,
    year: i32,
}

impl TryFrom<ArchiveFields> for ArchiveQuery {
    type Error = BroadsheetError;

    fn try_from(fields: ArchiveFields) -> Result<Self, Self::Error> {
        Self::new(fields.month, fields.year)
    }
}

#[derive(Deserialize)]
struct SearchFields {
    terms: Vec<String>,
    since: NaiveDate,
    #[serde(default)]
    page: u32,
}

impl TryFrom<SearchFields> for SearchQuery {
    type Error = BroadsheetError;

    fn try_from(fields: SearchFields) -> Result<Self, Self::Error> {
        Ok(Self::new(fields.terms, fields.since)?.with_page(fields.page))
    }
}

impl SearchQuery {
    /// Creates a search query for page 0.
    ///
    /// Blank terms are dropped; at least one term must remain.
    ///
    /// # Errors
    ///
    /// Returns an error if no non-blank terms are supplied.
    pub fn new<I, S>(terms: I, since: NaiveDate) -> Result<Self, BroadsheetError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let terms: Vec<String> = terms
            .into_iter()
            .map(Into::into)
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        if terms.is_empty() {
            return Err(BroadsheetError::InvalidQuery(
                "search requires at least one term".to_string(),
            ));
        }
        Ok(Self {
            terms,
            since,
            page: 0,
        })
    }

    /// Returns a copy of this query targeting another page.
    #[must_use]
    pub fn with_page(&self, page: u32) -> Self {
        Self {
            page,
            ..self.clone()
        }
    }

    /// Returns the search terms.
    #[must_use]
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Returns the publication-date lower bound (inclusive).
    #[must_use]
    pub const fn since(&self) -> NaiveDate {
        self.since
    }

    /// Returns the page index.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Renders the terms as a quoted, OR-joined disjunction.
    ///
    /// ```
    /// use broadsheet_types::SearchQuery;
    /// use chrono::NaiveDate;
    ///
    /// let since = NaiveDate::from_ymd_opt(2019, 1, 1).unwrap();
    /// let query = SearchQuery::new(["rust", "memory safety"], since).unwrap();
    /// assert_eq!(query.disjunction(), r#""rust" OR "memory safety""#);
    /// ```
    #[must_use]
    pub fn disjunction(&self) -> String {
        self.terms
            .iter()
            .map(|t| format!("\"{}\"", t.replace('"', "")))
            .collect::<Vec<_>>()
            .join(" OR ")
    }

    /// Renders the publication-date filter, an inclusive range up to now.
    #[must_use]
    pub fn date_filter(&self) -> String {
        format!("pub_date:[{}T00:00:00Z TO NOW]", self.since.format("%Y-%m-%d"))
    }
}

/// Immutable description of what to fetch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Query {
    /// A whole month's archive dump (unpaginated).
    Archive(ArchiveQuery),
    /// One page of a keyword search.
    Search(SearchQuery),
}

impl Query {
    /// Returns the page index for search queries.
    #[must_use]
    pub const fn page(&self) -> Option<u32> {
        match self {
            Self::Archive(_) => None,
            Self::Search(search) => Some(search.page),
        }
    }
}

impl From<ArchiveQuery> for Query {
    fn from(query: ArchiveQuery) -> Self {
        Self::Archive(query)
    }
}

impl From<SearchQuery> for Query {
    fn from(query: SearchQuery) -> Self {
        Self::Search(query)
    }
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Archive(a) => write!(f, "archive {}-{:02}", a.year, a.month),
            Self::Search(s) => write!(f, "search [{}] page {}", s.terms.join(", "), s.page),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn since() -> NaiveDate {
        NaiveDate::from_ymd_opt(2019, 1, 1).unwrap()
    }

    #[test]
    fn test_archive_month_validation() {
        assert!(ArchiveQuery::new(7, 2023).is_ok());
        assert!(ArchiveQuery::new(0, 2023).is_err());
        assert!(ArchiveQuery::new(13, 2023).is_err());
    }

    #[test]
    fn test_search_requires_terms() {
        assert!(SearchQuery::new(Vec::<String>::new(), since()).is_err());
        assert!(SearchQuery::new(["  ", ""], since()).is_err());
    }

    #[test]
    fn test_with_page_leaves_template_untouched() {
        let template = SearchQuery::new(["tech"], since()).unwrap();
        let page_3 = template.with_page(3);

        assert_eq!(template.page(), 0);
        assert_eq!(page_3.page(), 3);
        assert_eq!(page_3.terms(), template.terms());
    }

    #[test]
    fn test_disjunction_quotes_and_strips_inner_quotes() {
        let query = SearchQuery::new(["a \"b\"", "c"], since()).unwrap();
        assert_eq!(query.disjunction(), r#""a b" OR "c""#);
    }

    #[test]
    fn test_date_filter() {
        let query = SearchQuery::new(["tech"], since()).unwrap();
        assert_eq!(query.date_filter(), "pub_date:[2019-01-01T00:00:00Z TO NOW]");
    }

    #[test]
    fn test_query_page() {
        let archive: Query = ArchiveQuery::new(1, 2024).unwrap().into();
        let search: Query = SearchQuery::new(["x"], since()).unwrap().with_page(2).into();
        assert_eq!(archive.page(), None);
        assert_eq!(search.page(), Some(2));
        assert_eq!(archive.to_string(), "archive 2024-01");
    }

    #[test]
    fn test_deserialize_validates() {
        let archive: Query =
            serde_json::from_str(r#"{"Archive":{"month":7,"year":2023}}"#).unwrap();
        assert_eq!(archive.to_string(), "archive 2023-07");

        assert!(serde_json::from_str::<Query>(r#"{"Archive":{"month":13,"year":2023}}"#).is_err());
        assert!(
            serde_json::from_str::<SearchQuery>(r#"{"terms":[],"since":"2019-01-01","page":0}"#)
                .is_err()
        );
        assert!(
            serde_json::from_str::<SearchQuery>(r#"{"terms":[" "],"since":"2019-01-01"}"#)
                .is_err()
        );
    }

    #[test]
    fn test_serde_round_trip_keeps_page() {
        let query = SearchQuery::new(["tech"], since()).unwrap().with_page(4);
        let json = serde_json::to_string(&query).unwrap();
        let back: SearchQuery = serde_json::from_str(&json).unwrap();
        assert_eq!(back, query);
    }
}
