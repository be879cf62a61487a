//! Response envelope parsing.
//!
//! Both endpoints wrap their documents as `{"response": {"meta": {"hits": n}, "docs": [...]}}`.
//! Archive responses may omit `meta`; search responses must carry `meta.hits`.

use broadsheet_types::{Article, PageResult};
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur while parsing a response body.
#[derive(Error, Debug)]
pub enum ParseError {
    /// The body is not the expected JSON shape.
    #[error("Malformed response body: {0}")]
    Json(#[from] serde_json::Error),

    /// A search response carried no `meta.hits`.
    #[error("Search response for page {page} has no meta.hits")]
    MissingHits {
        /// Requested page index.
        page: u32,
    },
}

#[derive(Debug, Deserialize)]
struct Envelope {
    response: ResponseBody,
}

#[derive(Debug, Deserialize)]
struct ResponseBody {
    #[serde(default)]
    meta: Option<Meta>,
    #[serde(default)]
    docs: Option<Vec<Doc>>,
}

#[derive(Debug, Deserialize)]
struct Meta {
    hits: u64,
}

#[derive(Debug, Deserialize)]
struct Doc {
    headline: Headline,
    #[serde(rename = "abstract")]
    abstract_text: String,
    web_url: String,
    snippet: String,
    lead_paragraph: String,
    pub_date: String,
    document_type: String,
    news_desk: String,
    section_name: String,
    type_of_material: String,
    word_count: u32,
    #[serde(default)]
    subsection_name: Option<String>,
    #[serde(default)]
    byline: Option<Byline>,
}

#[derive(Debug, Deserialize)]
struct Headline {
    main: String,
}

#[derive(Debug, Default, Deserialize)]
struct Byline {
    #[serde(default)]
    person: Option<Vec<Person>>,
    #[serde(default)]
    organization: Option<Organizations>,
}

#[derive(Debug, Deserialize)]
struct Person {
    #[serde(default)]
    firstname: Option<String>,
    #[serde(default)]
    middlename: Option<String>,
    #[serde(default)]
    lastname: Option<String>,
}

impl Person {
    /// `first [middle] last`, always separated by one space.
    fn display_name(&self) -> String {
        let mut parts = vec![self.firstname.as_deref().unwrap_or_default()];
        if let Some(middle) = self.middlename.as_deref().filter(|m| !m.is_empty()) {
            parts.push(middle);
        }
        parts.push(self.lastname.as_deref().unwrap_or_default());
        parts.join(" ")
    }
}

/// The upstream sends one string, a list, or null.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Organizations {
    One(String),
    Many(Vec<String>),
}

impl Organizations {
    fn into_names(self) -> Vec<String> {
        match self {
            Self::One(name) => vec![name],
            Self::Many(names) => names,
        }
        .into_iter()
        .filter(|name| !name.trim().is_empty())
        .collect()
    }
}

/// Maps an empty list to the absent marker.
fn non_empty(names: Vec<String>) -> Option<Vec<String>> {
    (!names.is_empty()).then_some(names)
}

impl From<Doc> for Article {
    fn from(doc: Doc) -> Self {
        let byline = doc.byline.unwrap_or_default();
        let persons = byline
            .person
            .unwrap_or_default()
            .iter()
            .map(Person::display_name)
            .collect();
        let organizations = byline
            .organization
            .map(Organizations::into_names)
            .unwrap_or_default();

        Self {
            headline: doc.headline.main,
            abstract_text: doc.abstract_text,
            web_url: doc.web_url,
            snippet: doc.snippet,
            lead_paragraph: doc.lead_paragraph,
            pub_date: doc.pub_date,
            document_type: doc.document_type,
            news_desk: doc.news_desk,
            section_name: doc.section_name,
            type_of_material: doc.type_of_material,
            word_count: doc.word_count,
            subsection_name: doc.subsection_name,
            persons: non_empty(persons),
            organizations: non_empty(organizations),
        }
    }
}

/// Parses a response body into a page result.
///
/// `page` is `Some` for search queries and is echoed back into the result.
///
/// # Errors
///
/// Returns an error if the body is not valid JSON, lacks required fields,
/// or is a search response without `meta.hits`.
pub fn parse_page(body: &[u8], page: Option<u32>) -> Result<PageResult, ParseError> {
    let envelope: Envelope = serde_json::from_slice(body)?;
    let articles = envelope
        .response
        .docs
        .unwrap_or_default()
        .into_iter()
        .map(Article::from)
        .collect();
    let total_hits = envelope.response.meta.map(|m| m.hits);
    if let (Some(page), None) = (page, total_hits) {
        return Err(ParseError::MissingHits { page });
    }
    Ok(PageResult::new(articles, total_hits, page))
}
