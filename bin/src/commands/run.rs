//! Shared fetch, materialize and persist pipeline.

use crate::display::{Format, print_summary, write_articles};
use anyhow::{Context, Result};
use broadsheet_lib::prelude::*;
use broadsheet_lib::{DEFAULT_TABLE, append};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, warn};

/// Options shared by every fetching command.
#[derive(Args)]
pub(crate) struct RunArgs {
    /// API key
    #[arg(long, env = "NYTIMES_API_KEY", hide_env_values = true)]
    pub(crate) api_key: Option<String>,

    /// Send the key as a bearer token instead of an api-key parameter
    #[arg(long)]
    pub(crate) bearer: bool,

    /// Override the API base URL
    #[arg(long)]
    pub(crate) base_url: Option<String>,

    /// Maximum concurrent page requests
    #[arg(short, long, default_value_t = 5)]
    pub(crate) concurrency: usize,

    /// Keep successful pages when later pages fail
    #[arg(long)]
    pub(crate) best_effort: bool,

    /// Output file path
    #[arg(short, long)]
    pub(crate) output: Option<PathBuf>,

    /// Output format (defaults to the output file extension, then json)
    #[arg(short, long, value_enum)]
    pub(crate) format: Option<Format>,

    /// Number of headlines to print
    #[arg(long, default_value_t = 5)]
    pub(crate) preview: usize,

    #[command(flatten)]
    pub(crate) db: DbArgs,
}

/// Database destination; persistence is enabled by `--db-name`.
#[derive(Args)]
pub(crate) struct DbArgs {
    /// Database name, or file path for sqlite
    #[arg(long = "db-name")]
    pub(crate) database: Option<String>,

    /// Database driver (mysql, postgres, sqlite)
    #[arg(long = "db-driver")]
    pub(crate) driver: Option<String>,

    /// Database user
    #[arg(long = "db-user")]
    pub(crate) user: Option<String>,

    /// Database password
    #[arg(long = "db-password", env = "BROADSHEET_DB_PASSWORD", hide_env_values = true)]
    pub(crate) password: Option<String>,

    /// Database host
    #[arg(long = "db-host")]
    pub(crate) host: Option<String>,

    /// Database port
    #[arg(long = "db-port")]
    pub(crate) port: Option<String>,

    /// Destination table
    #[arg(long = "db-table", default_value = DEFAULT_TABLE)]
    pub(crate) table: String,
}

impl DbArgs {
    /// Returns the connection settings, or `None` if persistence is off.
    fn connection(&self) -> Result<Option<ConnectionConfig>> {
        let Some(database) = &self.database else {
            return Ok(None);
        };

        let mut map = HashMap::from([("database".to_string(), database.clone())]);
        let optional = [
            ("driver", &self.driver),
            ("user", &self.user),
            ("password", &self.password),
            ("host", &self.host),
            ("port", &self.port),
        ];
        for (key, value) in optional {
            if let Some(value) = value {
                map.insert(key.to_string(), value.clone());
            }
        }

        Ok(Some(ConnectionConfig::from_map(&map)?))
    }
}

impl RunArgs {
    fn credential(&self) -> Result<Credential> {
        let Some(key) = &self.api_key else {
            return Err(BroadsheetError::MissingCredential {
                reason: format!("pass --api-key or set {DEFAULT_ENV_VAR}"),
            }
            .into());
        };
        Ok(Credential::new(key.clone())?)
    }

    fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig {
            credential_style: if self.bearer {
                CredentialStyle::Bearer
            } else {
                CredentialStyle::QueryParam
            },
            ..Default::default()
        };
        if let Some(base_url) = &self.base_url {
            config.base_url.clone_from(base_url);
        }
        config
    }

    fn aggregator_config(&self) -> AggregatorConfig {
        AggregatorConfig {
            concurrency: self.concurrency,
            mode: if self.best_effort {
                AggregateMode::BestEffort
            } else {
                AggregateMode::AllOrNothing
            },
            ..Default::default()
        }
    }
}

/// Fetch every page of `query`, then write and persist the articles.
pub(crate) async fn run(query: Query, args: &RunArgs, quiet: bool) -> Result<()> {
    // Fail before any network I/O
    let credential = args.credential()?;
    let connection = args.db.connection()?;
    let store = ArticleStore::with_table(args.db.table.clone())?;

    let fetcher = HttpFetcher::new(credential, args.client_config())?;
    let aggregator = Aggregator::new(fetcher, args.aggregator_config());
    debug!(config = ?aggregator.config(), "Aggregator ready");

    let progress = if quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .context("Invalid progress template")?,
        );
        pb.set_message(format!("Fetching {query}"));
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    };

    let aggregate = match aggregator.fetch_all(&query).await {
        Ok(aggregate) => aggregate,
        Err(e) => {
            progress.abandon_with_message(format!("Failed: {query}"));
            return Err(e).with_context(|| format!("Failed to fetch {query}"));
        }
    };

    let finish_msg = if aggregate.is_complete() {
        format!(
            "Fetched {} articles from {} pages",
            aggregate.articles.len(),
            aggregate.pages_requested
        )
    } else {
        format!(
            "Fetched {} articles ({} of {} pages failed)",
            aggregate.articles.len(),
            aggregate.failed_pages.len(),
            aggregate.pages_requested
        )
    };
    progress.finish_with_message(finish_msg);

    for failure in &aggregate.failed_pages {
        warn!(page = failure.page, error = %failure.error, "Page skipped");
    }

    let table = append(None, &aggregate.articles)?;
    if !quiet {
        print_summary(&aggregate, table.num_rows(), table.num_columns(), args.preview);
    }

    if let Some(output) = &args.output {
        let format = Format::resolve(args.format, output);
        write_articles(&aggregate.articles, output, format)?;
        if !quiet {
            println!("Output written to: {}", output.display());
        }
    }

    if let Some(connection) = connection {
        let written = store
            .persist(&aggregate.articles, &connection)
            .await
            .with_context(|| format!("Failed to persist into {}", connection.target()))?;
        if !quiet {
            println!(
                "Persisted {written} rows into {}.{}",
                connection.target(),
                store.table()
            );
        }
    }

    Ok(())
}
