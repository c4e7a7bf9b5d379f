//! Scholar Watch CLI
//!
//! Intended to be invoked on a schedule (cron or a systemd timer); the exit
//! code tells the scheduler whether the run committed or aborted.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use scholar_watch::{
    error::{AppError, Result},
    models::Config,
    pipeline,
    services::{ScholarClient, SmtpNotifier},
    storage::HistoryStore,
};

/// Scholar Watch - new-article email notifier
#[derive(Parser, Debug)]
#[command(
    name = "scholar-watch",
    version,
    about = "Emails newly published articles for a Scholar query"
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch the listing, filter against history, and deliver the report
    Run,

    /// Validate the configuration file
    Validate,

    /// Show delivery history statistics
    Info,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load_or_default(&cli.config);

    match cli.command {
        Command::Run => {
            config.validate()?;

            let password = std::env::var(&config.mail.password_env).map_err(|_| {
                AppError::config(format!(
                    "Environment variable {} is not set",
                    config.mail.password_env
                ))
            })?;

            let source = ScholarClient::new(config.search.clone(), &config.fetch)?;
            let notifier = SmtpNotifier::new(&config.mail, password)?;
            let history = HistoryStore::new(&config.history.file);

            match pipeline::run(&config, &source, &notifier, &history).await {
                Ok(report) => {
                    log::info!(
                        "Run complete: {} fetched, {} unique, {} new",
                        report.fetched,
                        report.unique,
                        report.new_count
                    );
                }
                Err(e) => {
                    log::error!("Run aborted: {}", e);
                    std::process::exit(1);
                }
            }
        }

        Command::Validate => {
            log::info!("Validating configuration from {}", cli.config.display());
            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("Config OK");
        }

        Command::Info => {
            let history = HistoryStore::new(&config.history.file);
            let delivered = history.load().await?;
            log::info!("History file: {}", config.history.file.display());
            log::info!("Delivered links: {}", delivered.len());
        }
    }

    Ok(())
}
