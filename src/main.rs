//! Site-Gleaner main entry point
//!
//! This is the command-line interface for the Site-Gleaner text harvester.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use site_gleaner::config::{load_config_with_hash, Config, CrawlSession, RendererKind};
use site_gleaner::crawl_domain;
use site_gleaner::output::write_result;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Site-Gleaner: a budgeted single-domain text harvester
///
/// Site-Gleaner crawls one website, follows the links most likely to
/// describe the organisation behind it, and prints the readable text of
/// each visited page as JSON.
#[derive(Parser, Debug)]
#[command(name = "site-gleaner")]
#[command(version = "1.0.0")]
#[command(about = "A budgeted single-domain text harvester", long_about = None)]
struct Cli {
    /// Domain or URL to crawl (`example.com`, `https://example.com/docs`)
    #[arg(value_name = "DOMAIN")]
    domain: String,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Page renderer, overriding the configuration file
    #[arg(long, value_enum)]
    renderer: Option<RendererArg>,

    /// Write the JSON result to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RendererArg {
    Static,
    Chrome,
}

impl From<RendererArg> for RendererKind {
    fn from(arg: RendererArg) -> Self {
        match arg {
            RendererArg::Static => RendererKind::Static,
            RendererArg::Chrome => RendererKind::Chrome,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::info!("No configuration file given, using defaults");
            Config::default()
        }
    };

    if let Some(renderer) = cli.renderer {
        config.renderer.kind = renderer.into();
    }

    if cli.dry_run {
        return handle_dry_run(&cli.domain, &config);
    }

    let result = crawl_domain(&cli.domain, &config).await.map_err(|e| {
        tracing::error!("Crawl failed ({}): {}", e.status_code(), e);
        anyhow::Error::new(e)
    })?;

    write_result(&result, cli.output.as_deref()).context("Failed to write crawl result")?;
    if let Some(path) = &cli.output {
        tracing::info!("Result written to: {}", path.display());
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so stdout carries only the JSON result.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_gleaner=info,warn"),
            1 => EnvFilter::new("site_gleaner=debug,info"),
            2 => EnvFilter::new("site_gleaner=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates the session and shows what would be crawled
fn handle_dry_run(domain: &str, config: &Config) -> Result<()> {
    let session = CrawlSession::new(domain, config).context("Invalid crawl session")?;

    println!("=== Site-Gleaner Dry Run ===\n");

    println!("Target:");
    println!("  Base URL: {}", session.base_url);
    println!("  Start URL: {}", session.start_url);

    println!("\nBudgets:");
    println!("  Max depth: {}", session.max_depth);
    println!("  Max pages: {}", session.max_pages);
    println!("  Visited cap: {}", session.visited_cap);
    println!("  Workers: {}", session.concurrency);
    println!("  Page timeout: {:?}", session.page_timeout);
    println!("  Total timeout: {:?}", session.total_timeout);
    println!("  Idle timeout: {:?}", session.idle_timeout);

    println!("\nRenderer: {:?}", config.renderer.kind);
    println!("User Agent: {}", config.user_agent.header_value());

    println!("\nFilters:");
    println!(
        "  Ignored keywords ({}): {}",
        config.filters.ignore_path_keywords.len(),
        config.filters.ignore_path_keywords.join(", ")
    );
    println!(
        "  Priority keywords ({}): {}",
        config.filters.priority_path_keywords.len(),
        config.filters.priority_path_keywords.join(", ")
    );
    println!("  Noise pattern: {}", config.filters.noise_pattern);
    println!(
        "  Language prefixes skipped: {}",
        config.filters.skip_language_prefixes
    );

    println!("\n✓ Configuration is valid");

    Ok(())
}
