//! dead-link-checker main entry point
//!
//! This is the command-line interface for the dead link checker.

use anyhow::Context;
use clap::Parser;
use dead_link_checker::config::{load_config, Config};
use dead_link_checker::crawler::{Coordinator, ProgressHandle};
use dead_link_checker::output::{print_broken_links, print_summary, write_report, ReportFormat};
use std::io::{IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;
use tracing_subscriber::EnvFilter;

const SPINNER_FRAMES: [char; 4] = ['|', '/', '-', '\\'];

const USAGE: &str = "Usage: dead-link-checker <URL> [--concurrency N] [--output json|csv]";

/// Crawl a site and report its broken links
///
/// Every page reachable from the start URL on the same host is fetched once,
/// and every link found on those pages is checked once.
#[derive(Parser, Debug)]
#[command(name = "dead-link-checker")]
#[command(version)]
#[command(about = "Crawl a site and report its broken links", long_about = None)]
struct Cli {
    /// URL to start crawling from
    #[arg(value_name = "URL")]
    url: Option<String>,

    /// Number of concurrent workers
    #[arg(short, long, value_parser = clap::value_parser!(u16).range(1..))]
    concurrency: Option<u16>,

    /// Save a report in the given format
    #[arg(short, long, value_enum)]
    output: Option<ReportFormat>,

    /// Path to TOML configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv)
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

    let Some(target_url) = cli.url.clone() else {
        eprintln!("Error: No URL provided.");
        eprintln!("{}", USAGE);
        return ExitCode::FAILURE;
    };

    match handle_crawl(&cli, &target_url).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\nFatal Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so stdout carries only the summary.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("dead_link_checker=info,warn"),
            1 => EnvFilter::new("dead_link_checker=debug,info"),
            _ => EnvFilter::new("dead_link_checker=trace,debug"),
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

    if let Some(concurrency) = cli.concurrency {
        config.crawler.concurrency = usize::from(concurrency);
    }

    Ok(config)
}

/// Runs the crawl and reports the results
async fn handle_crawl(cli: &Cli, target_url: &str) -> anyhow::Result<()> {
    let config = build_config(cli)?;

    let format = match cli.output {
        Some(format) => Some(format),
        None if std::io::stdin().is_terminal() && std::io::stdout().is_terminal() => {
            prompt_for_format().await?
        }
        None => None,
    };

    println!("\nDead Link Checker");
    println!(
        "Target: {} | Concurrency: {}",
        target_url, config.crawler.concurrency
    );
    if let Some(format) = format {
        println!("Output format: {}", format);
    }

    let results_dir = PathBuf::from(&config.output.results_dir);
    let coordinator = Coordinator::new(config, target_url)?;

    let ticker = (!cli.quiet && cli.verbose == 0 && std::io::stderr().is_terminal())
        .then(|| spawn_progress_ticker(coordinator.progress()));

    let result = coordinator.run_until(shutdown_signal()).await;

    if let Some(ticker) = ticker {
        ticker.abort();
        eprint!("\r{}\r", " ".repeat(60));
    }

    let result = result?;

    if result.interrupted {
        println!("\nCrawl interrupted; results are partial.");
    }

    print_summary(&result.summary());

    match format {
        Some(format) => {
            let path = write_report(format, target_url, &result, &results_dir)
                .context("failed to save report")?;
            println!("\nReport saved to {}", display_path(&path));
        }
        None => print_broken_links(&result),
    }

    Ok(())
}

/// Asks which report format to save
async fn prompt_for_format() -> anyhow::Result<Option<ReportFormat>> {
    print!("Would you like to save the results? (json/csv/enter for console only): ");
    std::io::stdout().flush()?;

    let mut answer = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut answer)
        .await?;

    let answer = answer.trim();
    if answer.is_empty() {
        println!("Proceeding with console output only...");
        return Ok(None);
    }

    match answer.parse::<ReportFormat>() {
        Ok(format) => {
            println!("Using format: {}", format);
            Ok(Some(format))
        }
        Err(_) => {
            println!("Proceeding with console output only...");
            Ok(None)
        }
    }
}

/// Resolves on Ctrl-C; never resolves if the handler cannot be installed
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Cannot listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

/// Redraws a one-line progress indicator on stderr every 100ms
fn spawn_progress_ticker(progress: ProgressHandle) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_millis(100));
        let mut frame = 0;

        loop {
            interval.tick().await;

            let line = match progress.snapshot() {
                Ok(snapshot) => format!(
                    "[ {} ] Crawling... ({:.1}s) pages: {} links: {}",
                    SPINNER_FRAMES[frame],
                    snapshot.elapsed.as_secs_f64(),
                    snapshot.frontier.pages_seen,
                    snapshot.links_checked
                ),
                Err(_) => format!("[ {} ] Crawling...", SPINNER_FRAMES[frame]),
            };

            let mut stderr = std::io::stderr();
            let _ = write!(stderr, "\r{}", line);
            let _ = stderr.flush();

            frame = (frame + 1) % SPINNER_FRAMES.len();
        }
    })
}

/// Shows `path` relative to the working directory when possible
fn display_path(path: &Path) -> String {
    std::env::current_dir()
        .ok()
        .and_then(|cwd| path.strip_prefix(cwd).ok().map(Path::to_path_buf))
        .unwrap_or_else(|| path.to_path_buf())
        .display()
        .to_string()
}
