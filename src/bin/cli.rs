//! eventcrawl CLI
//!
//! Local execution entry point. Expects the headless render service
//! to be reachable at the configured endpoint.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use eventcrawl::{
    engine::ScrapeEngine,
    error::Result,
    models::{Config, SiteConfig},
    services::RenderClient,
};
use tokio_util::sync::CancellationToken;

/// eventcrawl - city event listing crawler
#[derive(Parser, Debug)]
#[command(name = "eventcrawl", version, about = "City event listing crawler")]
struct Cli {
    /// Path to the configuration file
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
    /// Scrape every configured site and print the extracted events
    Scrape {
        /// Path to the sites file (a list of [[sites]] tables)
        #[arg(long, default_value = "sites.toml")]
        sites: PathBuf,

        /// Write events to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate configuration and sites files
    Validate {
        /// Path to the sites file
        #[arg(long, default_value = "sites.toml")]
        sites: PathBuf,
    },
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
        Command::Scrape { sites, output } => {
            config.validate()?;

            let batch = SiteConfig::load_all(&sites)?;
            log::info!("Loaded {} site configurations from {}", batch.len(), sites.display());

            let renderer = RenderClient::new(&config.renderer)?;
            let engine = ScrapeEngine::new(renderer, config.engine.clone());

            // Ctrl-C cancels the batch; the engine returns whatever it
            // has collected so far.
            let cancel = CancellationToken::new();
            {
                let cancel = cancel.clone();
                tokio::spawn(async move {
                    if tokio::signal::ctrl_c().await.is_ok() {
                        log::warn!("Interrupt received, cancelling the batch...");
                        cancel.cancel();
                    }
                });
            }

            let outcome = engine.run(&batch, &cancel).await;

            log::info!(
                "Scraped {} events ({} of {} jobs failed)",
                outcome.events.len(),
                outcome.job_failures,
                outcome.job_total
            );

            let json = serde_json::to_string_pretty(&outcome.events)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, json)?;
                    log::info!("Events written to {}", path.display());
                }
                None => println!("{json}"),
            }
        }

        Command::Validate { sites } => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {e}");
                return Err(e);
            }
            log::info!("Config OK");

            let batch = SiteConfig::load_all(&sites)?;
            log::info!("Sites OK ({} targets)", batch.len());

            log::info!("All validations passed!");
        }
    }

    Ok(())
}
