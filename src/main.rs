//! omarket-scraper main entry point
//!
//! Running without arguments scrapes every built-in category once and exits.

use clap::Parser;
use omarket_scraper::config::{load_config_with_hash, Config};
use omarket_scraper::crawler::{page_path, scrape};
use omarket_scraper::output::print_summary;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// omarket-scraper: catalog scraper for omarket.kz laptop categories
///
/// Fetches every listing page of each configured category, extracts product
/// name, link and price, and upserts them into a SQLite database.
#[derive(Parser, Debug)]
#[command(name = "omarket-scraper")]
#[command(version = "1.0.0")]
#[command(about = "Scrapes catalog listings into a product database", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in catalog when omitted)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be fetched without fetching
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show stored product counts from the database and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            match load_config_with_hash(path) {
                Ok((cfg, hash)) => {
                    tracing::info!("Configuration loaded successfully (hash: {})", hash);
                    cfg
                }
                Err(e) => {
                    tracing::error!("Failed to load configuration: {}", e);
                    return Err(e.into());
                }
            }
        }
        None => {
            tracing::info!("No configuration file given, using the built-in catalog");
            Config::default()
        }
    };

    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.stats {
        handle_stats(&config)?;
    } else {
        handle_scrape(&config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("omarket_scraper=info,warn"),
            1 => EnvFilter::new("omarket_scraper=debug,info"),
            2 => EnvFilter::new("omarket_scraper=trace,debug"),
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

/// Handles the --dry-run mode: shows what would be fetched
fn handle_dry_run(config: &Config) {
    println!("=== omarket-scraper Dry Run ===\n");

    println!("Site:");
    println!("  Base URL: {}", config.site.base_url);

    println!("\nHTTP:");
    println!("  User-Agent: {}", config.http.user_agent);
    println!("  Accept: {}", config.http.accept);
    println!("  Timeout: {}s", config.http.timeout_secs);
    println!("  Max in flight: {}", config.http.max_in_flight);

    println!("\nOutput:");
    println!("  Database: {}", config.output.database_path);

    println!("\nCategories ({}):", config.categories.len());
    for category in &config.categories {
        println!(
            "  - {} (pages {}..={})",
            category.name, category.first_page, category.last_page
        );
        println!(
            "    * {}{}",
            config.site.base_url,
            page_path(&category.url_path, category.first_page)
        );
    }

    let total_pages: usize = config.categories.iter().map(|c| c.page_count()).sum();
    println!("\n✓ Configuration is valid");
    println!("✓ Would fetch {} pages", total_pages);
}

/// Handles the --stats mode: shows statistics from the database
fn handle_stats(config: &Config) -> omarket_scraper::Result<()> {
    use omarket_scraper::output::{load_statistics, print_statistics};
    use omarket_scraper::storage::open_store;
    use std::path::Path;

    println!("Database: {}\n", config.output.database_path);

    let store = open_store(Path::new(&config.output.database_path))?;
    let stats = load_statistics(&store)?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the main scrape operation
async fn handle_scrape(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        "Scraping {} categories into {}",
        config.categories.len(),
        config.output.database_path
    );

    match scrape(config).await {
        Ok(summary) => {
            print_summary(&summary);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Scrape could not start: {}", e);
            Err(e.into())
        }
    }
}
