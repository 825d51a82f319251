//! Meetup Scraper CLI
//!
//! Runs the HTTP API or resolves records from the command line.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use futures::stream::{self, StreamExt};
use meetup_scraper::{
    error::{AppError, Result},
    models::Config,
    server,
    services::RecordService,
};

/// Number of groups resolved at once by `latest`.
const MAX_CONCURRENT_GROUPS: usize = 4;

/// Meetup Scraper - cached event and group records
#[derive(Parser, Debug)]
#[command(
    name = "meetup-scraper",
    version,
    about = "Scrapes Meetup events and groups into cached JSON"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "storage/config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON log lines
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API
    Serve {
        /// Address to bind (overrides server.bind)
        #[arg(long)]
        bind: Option<String>,
    },

    /// Print the latest upcoming event of one or more groups
    Latest {
        #[arg(required = true)]
        slugs: Vec<String>,

        /// Skip the cache lookup
        #[arg(long)]
        fresh: bool,
    },

    /// Print one event
    Event {
        slug: String,
        id: String,

        /// Skip the cache lookup
        #[arg(long)]
        fresh: bool,
    },

    /// Print a group
    Group {
        slug: String,

        /// Skip the cache lookup
        #[arg(long)]
        fresh: bool,
    },

    /// Validate the configuration file
    Validate,
}

/// Initialize logging based on verbosity and format flags.
fn init_logging(verbose: bool, json: bool, configured: &str) {
    let level = if verbose { "debug" } else { configured };

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
            )
            .init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
            .format_timestamp_secs()
            .init();
    }
}

/// Print each resolved event; fails when any group had none.
fn report_latest(results: Vec<(String, Result<String>)>) -> Result<()> {
    let mut failed = 0;
    for (slug, result) in results {
        match result {
            Ok(json) => println!("{json}"),
            Err(e) => {
                failed += 1;
                log::error!("{}: {}", slug, e);
            }
        }
    }

    if failed > 0 {
        return Err(AppError::not_found(format!(
            "{failed} group(s) had no resolvable latest event"
        )));
    }
    Ok(())
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load_or_default(&cli.config);
    config.apply_env();
    init_logging(cli.verbose, cli.json_logs, &config.logging.level);

    log::info!("Loaded configuration from {}", cli.config.display());

    match cli.command {
        Command::Serve { bind } => {
            let bind = bind.unwrap_or_else(|| config.server.bind.clone());
            let records = RecordService::from_config(&config).await?;
            server::serve(&bind, records).await?;
        }

        Command::Latest { slugs, fresh } => {
            let records = RecordService::from_config(&config).await?;

            let results: Vec<(String, Result<String>)> = stream::iter(slugs)
                .map(|slug| {
                    let records = records.clone();
                    async move {
                        let result = records.latest(&slug, fresh).await;
                        (slug, result)
                    }
                })
                .buffered(MAX_CONCURRENT_GROUPS)
                .collect()
                .await;

            report_latest(results)?;
        }

        Command::Event { slug, id, fresh } => {
            let records = RecordService::from_config(&config).await?;
            println!("{}", records.event(&slug, &id, fresh).await?);
        }

        Command::Group { slug, fresh } => {
            let records = RecordService::from_config(&config).await?;
            println!("{}", records.group(&slug, fresh).await?);
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!(
                "✓ Config OK (base URL {}, timezone {}, {:?} cache)",
                config.scraper.base_url,
                config.timezone_name,
                config.cache.backend
            );
        }
    }

    Ok(())
}
