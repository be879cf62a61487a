//! broadsheet CLI - fetch news archive and article search results.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod display;

use commands::RunArgs;

#[derive(Parser)]
#[command(name = "broadsheet")]
#[command(about = "Fetch news archive and article search results", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (suppress progress output)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch every article of one archive month
    Archive {
        /// Month (1-12)
        month: u32,

        /// Year (e.g. 2023)
        year: i32,

        #[command(flatten)]
        run: RunArgs,
    },

    /// Search articles matching any of the given terms
    Search {
        /// Search terms, combined with OR
        #[arg(required = true)]
        terms: Vec<String>,

        /// Earliest publication date (YYYY-MM-DD)
        #[arg(short, long)]
        since: String,

        #[command(flatten)]
        run: RunArgs,
    },
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "warn",
        (false, 0) => "info",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Show help if no command provided
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    init_tracing(cli.verbose, cli.quiet);

    match command {
        Commands::Archive { month, year, run } => {
            commands::archive::archive(month, year, &run, cli.quiet).await
        }
        Commands::Search { terms, since, run } => {
            commands::search::search(&terms, &since, &run, cli.quiet).await
        }
    }
}
