//! Site-Harvest main entry point
//!
//! This is the command-line interface for the Site-Harvest mirroring crawler.

use anyhow::Context;
use clap::Parser;
use site_harvest::config::{apply_overrides, load_config_with_hash, Config, ConfigOverrides};
use site_harvest::crawler::run_scrape;
use site_harvest::output::print_statistics;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Site-Harvest: mirror one website onto local disk
///
/// Site-Harvest crawls every HTML page reachable from a seed URL, saves the
/// pages as they load, then downloads and saves every other resource they
/// reference.
#[derive(Parser, Debug)]
#[command(name = "site-harvest")]
#[command(version)]
#[command(about = "Mirror one website onto local disk", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Seed URL, overriding the configuration file
    #[arg(long, value_name = "URL")]
    url: Option<String>,

    /// Destination directory, overriding the configuration file
    #[arg(short, long, value_name = "DIR")]
    output: Option<String>,

    /// Maximum concurrent resource downloads, overriding the configuration file
    #[arg(long, value_name = "N")]
    max_concurrent: Option<usize>,

    /// Validate config and show what would be scraped without fetching anything
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            url: self.url.clone(),
            location_on_disk: self.output.clone(),
            max_concurrent_downloads: self.max_concurrent,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    let config = apply_overrides(config, cli.overrides())
        .context("Invalid command-line override")?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config);
    } else {
        handle_scrape(&config).await;
    }

    tracing::info!("Program terminated");
    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_harvest=info,warn"),
            1 => EnvFilter::new("site_harvest=debug,info"),
            2 => EnvFilter::new("site_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the resolved configuration
fn handle_dry_run(config: &Config) {
    println!("=== Site-Harvest Dry Run ===\n");

    println!("Site:");
    println!("  Seed URL: {}", config.site.url);
    println!("  Location on disk: {}", config.site.location_on_disk);

    println!("\nFetcher:");
    println!(
        "  Max concurrent downloads: {}",
        config.fetcher.max_concurrent_downloads
    );
    println!("  Request timeout: {}s", config.fetcher.request_timeout);
    println!("  Connect timeout: {}s", config.fetcher.connect_timeout);

    println!("\nUser Agent: {}", config.user_agent.header_value());

    println!("\n✓ Configuration is valid");
}

/// Handles the main scrape operation
///
/// Any failure of the run is logged here and goes no further; Ctrl-C stops
/// the run and leaves already written files in place.
async fn handle_scrape(config: &Config) {
    tokio::select! {
        result = run_scrape(config) => match result {
            Ok(stats) => {
                tracing::info!("Scrape completed successfully");
                print_statistics(&stats);
            }
            Err(e) => {
                tracing::error!("Error occurred while scraping web content: {}", e);
            }
        },
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!(
                "Interrupted; files already written under {} are kept",
                config.site.location_on_disk
            );
        }
    }
}
