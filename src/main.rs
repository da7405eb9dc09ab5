//! Trawl main entry point
//!
//! Command-line front end: crawls one locator and prints one line per item.

use anyhow::Context;
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;
use trawl::config::{load_config, validate, Config};
use trawl::output::{summary_line, write_item, ItemFormat};
use trawl::state::{CrawlBudget, CrawlOutcome};
use trawl::{classify, CrawlTarget, Crawler};

/// Trawl: a bounded content crawler
///
/// Crawls a web site inside a URL prefix (`http://site.com/docs/*intro`
/// starts at `/docs/intro` and stays under `/docs/`), or the issues, pull
/// requests and files of a GitHub repository (`github.com/org/repo`, with
/// optional `user:password@` or `token@` credentials).
#[derive(Parser, Debug)]
#[command(name = "trawl")]
#[command(version)]
#[command(about = "A bounded content crawler", long_about = None)]
struct Cli {
    /// Web URL (with optional `*` scope marker) or repository locator
    #[arg(value_name = "LOCATOR")]
    locator: String,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Maximum link depth from the seed (web crawls)
    #[arg(long)]
    max_depth: Option<u32>,

    /// Byte budget across all items
    #[arg(long)]
    max_total_size: Option<usize>,

    /// Byte cap for a single item
    #[arg(long)]
    max_page_size: Option<usize>,

    /// Maximum number of items
    #[arg(long)]
    max_pages: Option<usize>,

    /// Fallback GitHub token when the locator has no credential
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    github_token: Option<String>,

    /// Print one JSON object per item instead of tab-separated lines
    #[arg(long)]
    jsonl: bool,

    /// Show the classified target and budget without crawling
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{:#}", e);
            eprintln!("error: {:#}", e);
            return ExitCode::from(2);
        }
    };

    if cli.dry_run {
        handle_dry_run(&cli.locator, &config);
        return ExitCode::SUCCESS;
    }

    match handle_crawl(&cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            eprintln!("error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr; stdout carries only items and the summary.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("trawl=info,warn"),
            1 => EnvFilter::new("trawl=debug,info"),
            2 => EnvFilter::new("trawl=trace,debug"),
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

/// Loads the configuration file (if any) and applies command-line overrides
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("failed to load configuration from {}", path.display()))?
        }
        None => Config::default(),
    };

    if let Some(max_depth) = cli.max_depth {
        config.crawler.max_depth = max_depth;
    }
    if let Some(max_total_size) = cli.max_total_size {
        config.crawler.max_total_size = max_total_size;
    }
    if let Some(max_page_size) = cli.max_page_size {
        config.crawler.max_page_size = max_page_size;
    }
    if let Some(max_pages) = cli.max_pages {
        config.crawler.max_pages = max_pages;
    }
    if let Some(token) = &cli.github_token {
        if !token.trim().is_empty() {
            config.github.token = Some(token.clone());
        }
    }

    validate(&config).context("invalid settings")?;
    Ok(config)
}

/// Handles the --dry-run mode: shows what would be crawled
fn handle_dry_run(locator: &str, config: &Config) {
    let budget = CrawlBudget::from(&config.crawler);

    println!("=== Trawl Dry Run ===\n");
    match classify(locator) {
        CrawlTarget::Web(scope) => {
            println!("Web crawl");
            println!("  Seed: {}", scope.seed_url);
            println!("  Scope prefix: {}", scope.scope_prefix);
            println!("  Max depth: {}", budget.max_depth);
        }
        CrawlTarget::Repo(repo) => {
            println!("Repository crawl");
            println!("  Repository: {}", repo);
            println!("  Host: {}", repo.provider.host());
            println!(
                "  Credentials: {}",
                if repo.auth.is_some() {
                    "from locator"
                } else if config.github.token.is_some() {
                    "fallback token"
                } else {
                    "anonymous"
                }
            );
            println!("  API base: {}", config.github.api_base);
        }
    }
    println!("\nBudget:");
    println!("  Max items: {}", budget.max_items);
    println!("  Max total bytes: {}", budget.max_total_bytes);
    println!("  Max item bytes: {}", budget.max_item_bytes);
}

/// Runs the crawl, printing items as they arrive; Ctrl-C stops it cleanly
async fn handle_crawl(cli: &Cli, config: Config) -> anyhow::Result<()> {
    let crawler = Crawler::new(config).context("failed to set up crawler")?;
    let format = if cli.jsonl {
        ItemFormat::JsonLines
    } else {
        ItemFormat::Tsv
    };

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("Interrupt received, stopping crawl");
                cancel.cancel();
            }
        });
    }

    let mut stream = crawler.crawl_with_cancellation(&cli.locator, cancel);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    while let Some(item) = stream.next_item().await {
        write_item(&mut out, &item, format).context("failed to write item")?;
    }

    let outcome = stream
        .outcome()
        .cloned()
        .unwrap_or_else(CrawlOutcome::faulted);
    writeln!(out, "{}", summary_line(&outcome))?;
    out.flush()?;

    Ok(())
}
