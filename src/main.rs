//! Doc-Harvest main entry point
//!
//! This is the command-line interface for the Doc-Harvest archive harvester.

use clap::error::ErrorKind;
use clap::Parser;
use doc_harvest::config::{default_config, load_config_with_hash, Config};
use doc_harvest::crawler::harvest;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Exit status for a missing or invalid day count
const USAGE_EXIT_CODE: i32 = 4;

/// Doc-Harvest: a paginated blog archive harvester
///
/// Doc-Harvest walks the listing pages from the front page backwards until
/// it sees an article older than DAYS, downloads every thumbnail, stamps the
/// article title on it, and stores the articles as JSON and in SQLite.
#[derive(Parser, Debug)]
#[command(name = "doc-harvest")]
#[command(version = "1.0.0")]
#[command(about = "A paginated blog archive harvester", long_about = None)]
struct Cli {
    /// Number of days of articles to collect (at least 1)
    #[arg(value_name = "DAYS", value_parser = clap::value_parser!(u32).range(1..))]
    days: Option<u32>,

    /// Path to TOML configuration file (built-in defaults otherwise)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be harvested without fetching anything
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show statistics from the article database and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => exit_with_usage(&e.to_string()),
    };

    let days = match harvest_days(&cli) {
        Ok(days) => days,
        Err(reason) => exit_with_usage(reason),
    };

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    let config = match load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e);
        }
    };

    // Handle different modes
    if cli.dry_run {
        handle_dry_run(&config, cli.days);
    } else if cli.stats {
        handle_stats(&config)?;
    } else if let Some(days) = days {
        handle_harvest(config, days).await?;
    }

    Ok(())
}

/// Message printed when DAYS is missing
const MISSING_DAYS: &str = "error: the following required arguments were not provided: <DAYS>";

/// Decides the day count of this run
///
/// `--dry-run` and `--stats` never need one. A harvest without DAYS is a
/// usage error; range and integer checks already happened in clap.
fn harvest_days(cli: &Cli) -> Result<Option<u32>, &'static str> {
    match (cli.dry_run || cli.stats, cli.days) {
        (true, _) => Ok(None),
        (false, Some(days)) => Ok(Some(days)),
        (false, None) => Err(MISSING_DAYS),
    }
}

/// Builds the usage text shown for a bad command line
fn usage_message(reason: &str) -> String {
    format!(
        "{}\n\nMust supply at least one day. Example: \"doc-harvest 2\" for 2 days of articles\nUsage: doc-harvest [OPTIONS] <DAYS>",
        reason.trim_end()
    )
}

/// Prints the usage message to stdout and exits with status 4
fn exit_with_usage(reason: &str) -> ! {
    println!("{}", usage_message(reason));
    std::process::exit(USAGE_EXIT_CODE)
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("doc_harvest=info,warn"),
            1 => EnvFilter::new("doc_harvest=debug,info"),
            2 => EnvFilter::new("doc_harvest=trace,debug"),
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

/// Loads the configuration file, or the built-in defaults without one
fn load(path: Option<&Path>) -> Result<Config, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            Ok(config)
        }
        None => {
            tracing::debug!("No configuration file given, using built-in defaults");
            Ok(default_config()?)
        }
    }
}

/// Handles the --dry-run mode: validates config and shows what would be harvested
fn handle_dry_run(config: &Config, days: Option<u32>) {
    println!("=== Doc-Harvest Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Start URL: {}", config.crawler.start_url);
    println!(
        "  Allowed domains: {}",
        config.crawler.allowed_domains.join(", ")
    );
    println!(
        "  Delay between pages: {}ms + up to {}ms random",
        config.crawler.delay_ms, config.crawler.random_delay_ms
    );
    println!("  User agent: {}", config.crawler.user_agent);

    println!("\nSelectors:");
    println!("  Article: {}", config.selectors.article);
    println!("  Next page: {}", config.selectors.next_page);
    println!("  Title: {}", config.selectors.title);
    println!("  Image: {}", config.selectors.image);
    println!("  Date: {}", config.selectors.date);
    println!("  Author: {}", config.selectors.author);
    println!("  Category: {}", config.selectors.category);
    println!("  Comments: {}", config.selectors.comments);

    let font_found = Path::new(&config.annotation.font_path).is_file();
    println!("\nAnnotation:");
    println!(
        "  Font: {} ({})",
        config.annotation.font_path,
        if font_found { "found" } else { "MISSING" }
    );
    println!(
        "  Size: {}px at ({}, {}), {} chars per line",
        config.annotation.font_size,
        config.annotation.text_x,
        config.annotation.text_y,
        config.annotation.max_chars_per_line
    );

    println!("\nOutput:");
    println!("  Images: {}", config.output.images_dir);
    println!("  JSON: {}", config.output.json_path);
    println!("  Database: {}", config.output.database_path);

    println!("\n✓ Configuration is valid");
    match days {
        Some(days) => println!("✓ Would harvest articles from the last {} days", days),
        None => println!("  (no DAYS given; a real run requires one)"),
    }
    if !font_found {
        println!("✗ A real run would fail: font file not found");
    }
}

/// Handles the --stats mode: shows statistics from the database
fn handle_stats(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    use doc_harvest::output::{load_statistics, print_statistics};
    use doc_harvest::storage::open_storage;

    println!("Database: {}\n", config.output.database_path);

    // Open the database
    let storage = open_storage(Path::new(&config.output.database_path))?;

    // Load statistics
    let stats = load_statistics(&storage)?;

    // Print statistics
    print_statistics(&stats);

    Ok(())
}

/// Handles the main harvest operation
async fn handle_harvest(config: Config, days: u32) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Running...");
    tracing::info!(
        "Harvesting the last {} days starting at {}",
        days,
        config.crawler.start_url
    );

    match harvest(config, days).await {
        Ok(context) => {
            tracing::info!(
                "Harvest completed successfully: {} articles",
                context.article_count()
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Harvest failed: {}", e);
            Err(e.into())
        }
    }
}
