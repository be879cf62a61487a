//! Article persistence over a single scoped connection.

use broadsheet_types::{Article, BroadsheetError, FIELD_NAMES};
use sqlx::any::install_default_drivers;
use sqlx::{AnyConnection, Connection};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::{ConnectionConfig, Driver};

/// Default destination table.
pub const DEFAULT_TABLE: &str = "articles";

/// Store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Invalid connection settings or table name.
    #[error("Invalid store config: {0}")]
    InvalidConfig(String),

    /// Could not open the connection.
    #[error("Failed to connect to {target}: {source}")]
    Connect {
        /// Password-free connection description.
        target: String,
        /// Driver error.
        #[source]
        source: sqlx::Error,
    },

    /// An insert failed; rows before `index` were already committed.
    #[error("Insert of article {index} failed ({written} rows written): {source}")]
    Insert {
        /// Index of the failing article.
        index: usize,
        /// Rows written before the failure.
        written: u64,
        /// Driver error.
        #[source]
        source: sqlx::Error,
    },
}

impl From<StoreError> for BroadsheetError {
    fn from(e: StoreError) -> Self {
        Self::Store(e.to_string())
    }
}

/// Writes articles into a pre-existing 14-column table.
#[derive(Debug, Clone)]
pub struct ArticleStore {
    table: String,
}

impl Default for ArticleStore {
    fn default() -> Self {
        Self {
            table: DEFAULT_TABLE.to_string(),
        }
    }
}

impl ArticleStore {
    /// Creates a store writing to the `articles` table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store writing to `table`.
    ///
    /// # Errors
    ///
    /// Returns an error unless the name is a plain identifier
    /// (ASCII letters, digits and `_`, not starting with a digit).
    pub fn with_table(table: impl Into<String>) -> Result<Self, StoreError> {
        let table = table.into();
        let valid = table
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            && table.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !valid {
            return Err(StoreError::InvalidConfig(format!(
                "invalid table name: {table:?}"
            )));
        }
        Ok(Self { table })
    }

    /// Returns the destination table name.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Returns the insert statement for `driver`.
    #[must_use]
    pub fn insert_statement(&self, driver: Driver) -> String {
        let placeholders: Vec<String> = (1..=FIELD_NAMES.len())
            .map(|n| driver.placeholder(n))
            .collect();
        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.table,
            FIELD_NAMES.join(", "),
            placeholders.join(", ")
        )
    }

    /// Opens one connection, inserts every article in order and closes it.
    ///
    /// The connection is closed whether or not the inserts succeed. Each
    /// insert commits on its own, so a failure leaves earlier rows in place;
    /// [`StoreError::Insert`] reports how many.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be opened or an insert fails.
    #[instrument(skip_all, fields(target = %config.target(), table = %self.table, articles = articles.len()))]
    pub async fn persist(
        &self,
        articles: &[Article],
        config: &ConnectionConfig,
    ) -> Result<u64, StoreError> {
        install_default_drivers();
        let url = config.url()?;
        let mut conn = AnyConnection::connect(&url)
            .await
            .map_err(|source| StoreError::Connect {
                target: config.target(),
                source,
            })?;
        debug!("Connected");

        let result = self.write(&mut conn, config.driver, articles).await;

        if let Err(e) = conn.close().await {
            warn!(error = %e, "Failed to close connection");
        }

        match &result {
            Ok(written) => info!(written, "Persisted articles"),
            Err(e) => warn!(error = %e, "Persist aborted"),
        }
        result
    }

    /// Inserts articles in order over an already open connection.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Insert`] on the first failing insert.
    pub async fn write(
        &self,
        conn: &mut AnyConnection,
        driver: Driver,
        articles: &[Article],
    ) -> Result<u64, StoreError> {
        let sql = self.insert_statement(driver);
        let mut written = 0u64;

        for (index, article) in articles.iter().enumerate() {
            sqlx::query(&sql)
                .bind(article.headline.as_str())
                .bind(article.abstract_text.as_str())
                .bind(article.web_url.as_str())
                .bind(article.snippet.as_str())
                .bind(article.lead_paragraph.as_str())
                .bind(article.pub_date.as_str())
                .bind(article.document_type.as_str())
                .bind(article.news_desk.as_str())
                .bind(article.section_name.as_str())
                .bind(article.type_of_material.as_str())
                .bind(i64::from(article.word_count))
                .bind(article.subsection_name.as_deref())
                .bind(article.author_list())
                .bind(article.organization_list())
                .execute(&mut *conn)
                .await
                .map_err(|source| StoreError::Insert {
                    index,
                    written,
                    source,
                })?;
            written += 1;
        }

        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CREATE_TABLE: &str = "CREATE TABLE articles (
        headline TEXT NOT NULL,
        abstract TEXT NOT NULL,
        web_url TEXT NOT NULL UNIQUE,
        snippet TEXT NOT NULL,
        lead_paragraph TEXT NOT NULL,
        pub_date TEXT NOT NULL,
        document_type TEXT NOT NULL,
        news_desk TEXT NOT NULL,
        section_name TEXT NOT NULL,
        type_of_material TEXT NOT NULL,
        word_count INTEGER NOT NULL,
        subsection_name TEXT,
        author_list TEXT,
        organization_list TEXT
    )";

    fn article(slug: &str, persons: Option<Vec<&str>>) -> Article {
        Article {
            headline: slug.to_uppercase(),
            abstract_text: "abstract".to_string(),
            web_url: format!("https://www.nytimes.com/{slug}.html"),
            snippet: "snippet".to_string(),
            lead_paragraph: "lead".to_string(),
            pub_date: "2023-07-01T04:00:12+0000".to_string(),
            document_type: "article".to_string(),
            news_desk: "Foreign".to_string(),
            section_name: "World".to_string(),
            type_of_material: "News".to_string(),
            word_count: 812,
            subsection_name: None,
            persons: persons.map(|p| p.into_iter().map(String::from).collect()),
            organizations: None,
        }
    }

    async fn memory() -> AnyConnection {
        install_default_drivers();
        let mut conn = AnyConnection::connect("sqlite::memory:").await.unwrap();
        sqlx::query(CREATE_TABLE).execute(&mut conn).await.unwrap();
        conn
    }

    async fn file_db(dir: &tempfile::TempDir) -> ConnectionConfig {
        install_default_drivers();
        let path = dir.path().join("news.db");
        let mut conn = AnyConnection::connect(&format!("sqlite:{}?mode=rwc", path.display()))
            .await
            .unwrap();
        sqlx::query(CREATE_TABLE).execute(&mut conn).await.unwrap();
        conn.close().await.unwrap();
        ConnectionConfig::new(Driver::Sqlite, path.display().to_string())
    }

    async fn count(config: &ConnectionConfig) -> i64 {
        let mut conn = AnyConnection::connect(&config.url().unwrap())
            .await
            .unwrap();
        let n = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM articles")
            .fetch_one(&mut conn)
            .await
            .unwrap();
        conn.close().await.unwrap();
        n
    }

    #[test]
    fn test_insert_statement() {
        let store = ArticleStore::new();
        let sql = store.insert_statement(Driver::Postgres);
        assert!(sql.starts_with("INSERT INTO articles (headline, abstract, web_url"));
        assert!(sql.ends_with("$13, $14)"));

        let sql = store.insert_statement(Driver::MySql);
        assert_eq!(sql.matches('?').count(), 14);
    }

    #[test]
    fn test_table_name_validation() {
        assert_eq!(ArticleStore::with_table("nyt_2023").unwrap().table(), "nyt_2023");
        assert!(ArticleStore::with_table("").is_err());
        assert!(ArticleStore::with_table("1st").is_err());
        assert!(ArticleStore::with_table("articles; DROP TABLE x").is_err());
    }

    #[tokio::test]
    async fn test_write_nulls_for_absent_bylines() {
        let mut conn = memory().await;
        let articles = vec![
            article("a", Some(vec!["Jane Doe", "John Roe"])),
            article("b", None),
            article("c", Some(vec![" "])),
        ];

        let written = ArticleStore::new()
            .write(&mut conn, Driver::Sqlite, &articles)
            .await
            .unwrap();
        assert_eq!(written, 3);

        let authors = sqlx::query_scalar::<_, Option<String>>(
            "SELECT author_list FROM articles ORDER BY rowid",
        )
        .fetch_all(&mut conn)
        .await
        .unwrap();
        assert_eq!(
            authors,
            vec![Some("Jane Doe John Roe".to_string()), None, Some(" ".to_string())]
        );

        let orgs = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM articles WHERE organization_list IS NULL",
        )
        .fetch_one(&mut conn)
        .await
        .unwrap();
        assert_eq!(orgs, 3);
    }

    #[tokio::test]
    async fn test_write_empty_is_noop() {
        let mut conn = memory().await;
        let written = ArticleStore::new()
            .write(&mut conn, Driver::Sqlite, &[])
            .await
            .unwrap();
        assert_eq!(written, 0);
    }

    #[tokio::test]
    async fn test_persist_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let config = file_db(&dir).await;

        let written = ArticleStore::new()
            .persist(&[article("a", None), article("b", None)], &config)
            .await
            .unwrap();

        assert_eq!(written, 2);
        assert_eq!(count(&config).await, 2);
    }

    #[tokio::test]
    async fn test_persist_failure_reports_written_rows() {
        let dir = tempfile::tempdir().unwrap();
        let config = file_db(&dir).await;
        let articles = vec![
            article("a", None),
            article("b", None),
            article("a", None),
            article("d", None),
        ];

        let err = ArticleStore::new()
            .persist(&articles, &config)
            .await
            .unwrap_err();

        match err {
            StoreError::Insert { index, written, .. } => {
                assert_eq!(index, 2);
                assert_eq!(written, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(count(&config).await, 2);
    }

    #[tokio::test]
    async fn test_persist_connect_failure() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing").join("news.db");
        let config = ConnectionConfig::new(Driver::Sqlite, missing.display().to_string());

        let err = ArticleStore::new()
            .persist(&[article("a", None)], &config)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Connect { .. }));
    }

    #[tokio::test]
    async fn test_persist_missing_table() {
        let dir = tempfile::tempdir().unwrap();
        let config = file_db(&dir).await;
        let store = ArticleStore::with_table("archive").unwrap();

        let err = store.persist(&[article("a", None)], &config).await.unwrap_err();
        assert!(matches!(err, StoreError::Insert { index: 0, written: 0, .. }));
    }
}
