//! HTTP client for the archive and article search endpoints.

use async_trait::async_trait;
use broadsheet_types::{BroadsheetError, Credential, PageResult, Query};
use reqwest::{Client, StatusCode, Url};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::url::{BASE_URL, archive_url, search_url};
use crate::{PageFetcher, ParseError, parse_page};

/// How the credential is attached to each request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CredentialStyle {
    /// `api-key=<key>` query parameter.
    #[default]
    QueryParam,
    /// `Authorization: Bearer <key>` header.
    Bearer,
}

/// Configuration for the HTTP fetcher.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL, e.g. `https://api.nytimes.com/svc`.
    pub base_url: String,
    /// How the credential is sent.
    pub credential_style: CredentialStyle,
    /// Request timeout.
    pub timeout: Duration,
    /// Connection establishment timeout.
    pub connect_timeout: Duration,
    /// Idle connections kept per host.
    pub pool_max_idle_per_host: usize,
    /// User agent string.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            credential_style: CredentialStyle::QueryParam,
            timeout: Duration::from_secs(60),
            connect_timeout: Duration::from_secs(10),
            pool_max_idle_per_host: 10,
            user_agent: format!("broadsheet/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Errors that can occur while fetching a page.
///
/// URLs carried by these errors never include the credential.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The connection could not be established, timed out, or broke mid-body.
    #[error("GET {url} failed: {source}")]
    Transport {
        /// Request URL.
        url: String,
        /// Underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with anything other than 200 OK.
    #[error("GET {url} {status}")]
    Upstream {
        /// Request URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },

    /// The response body could not be parsed.
    #[error("GET {url} returned an unparseable body: {source}")]
    Parse {
        /// Request URL.
        url: String,
        /// Underlying parse error.
        #[source]
        source: ParseError,
    },

    /// The configured base URL is unusable.
    #[error("Invalid base URL {base_url}: {reason}")]
    InvalidBaseUrl {
        /// The configured base URL.
        base_url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The HTTP client could not be built.
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl FetchError {
    /// Returns the HTTP status for upstream failures.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the request URL, if the error is tied to a request.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Transport { url, .. } | Self::Upstream { url, .. } | Self::Parse { url, .. } => {
                Some(url)
            }
            Self::InvalidBaseUrl { .. } | Self::Client(_) => None,
        }
    }
}

impl From<FetchError> for BroadsheetError {
    fn from(e: FetchError) -> Self {
        Self::Fetch(e.to_string())
    }
}

/// Page fetcher backed by a pooled `reqwest` client.
///
/// Each call makes exactly one request; there is no retry.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    base: Url,
    credential: Credential,
    config: ClientConfig,
}

impl HttpFetcher {
    /// Creates a fetcher with the given credential and configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client cannot be created.
    pub fn new(credential: Credential, config: ClientConfig) -> Result<Self, FetchError> {
        let invalid = |reason: String| FetchError::InvalidBaseUrl {
            base_url: config.base_url.clone(),
            reason,
        };
        let base = config
            .base_url
            .parse::<Url>()
            .map_err(|e| invalid(e.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(invalid("URL cannot carry path segments".to_string()));
        }

        let client = Client::builder()
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_nodelay(true)
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .gzip(true)
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self {
            client,
            base,
            credential,
            config,
        })
    }

    /// Creates a fetcher with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_defaults(credential: Credential) -> Result<Self, FetchError> {
        Self::new(credential, ClientConfig::default())
    }

    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Returns the credential-free URL for a query.
    #[must_use]
    pub fn url_for(&self, query: &Query) -> Url {
        match query {
            Query::Archive(archive) => archive_url(&self.base, archive),
            Query::Search(search) => search_url(&self.base, search),
        }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    #[instrument(skip_all, fields(query = %query))]
    async fn fetch(&self, query: &Query) -> Result<PageResult, FetchError> {
        let url = self.url_for(query);
        let shown = url.to_string();

        let request = match self.config.credential_style {
            CredentialStyle::QueryParam => {
                let mut keyed = url;
                keyed
                    .query_pairs_mut()
                    .append_pair("api-key", self.credential.expose());
                self.client.get(keyed)
            }
            CredentialStyle::Bearer => self.client.get(url).bearer_auth(self.credential.expose()),
        };

        debug!(url = %shown, "sending request");
        let transport = |e: reqwest::Error| FetchError::Transport {
            url: shown.clone(),
            source: e.without_url(),
        };

        let response = request.send().await.map_err(transport)?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::Upstream {
                url: shown.clone(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(transport)?;
        let page = parse_page(&body, query.page()).map_err(|source| FetchError::Parse {
            url: shown.clone(),
            source,
        })?;
        debug!(url = %shown, articles = page.len(), total_hits = ?page.total_hits, "page parsed");
        Ok(page)
    }
}
