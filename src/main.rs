// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Create the output directory and launch the browser
// 3. Let the operator log in by hand
// 4. Crawl the documentation section, saving every page
// 5. Close the browser, write _index.txt and print a summary
// 6. Exit with proper code (0 = success, 2 = error)
//
// Rust concepts used:
// - async/await: The browser is driven over an async protocol
// - Result<T, E>: For error handling (T = success type, E = error type)
// =============================================================================

// Module declarations - tells Rust about our other source files
mod browser;       // src/browser/ - the PageDriver trait and Chrome
mod cli;           // src/cli.rs - command-line parsing
mod crawl;         // src/crawl/ - the breadth-first crawl
mod extract;       // src/extract/ - finding links on a page
mod login;         // src/login.rs - the manual login pause
mod output;        // src/output/ - saved pages and the index file
mod report;        // src/report.rs - the final summary

use browser::ChromeDriver;
use clap::Parser;  // Parser trait enables the parse() method
use cli::Cli;
use crawl::{CrawlOutcome, Crawler};
use output::PageStore;
use report::CrawlSummary;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Diagnostics go to stderr; RUST_LOG=debug shows everything
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let exit_code = match run().await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.crawl_config();

    info!(
        "Crawling {} under '{}' into {}",
        config.filter.domain(),
        config.filter.path_marker(),
        config.output_dir.display()
    );

    // Setup failures (no output dir, no browser) are fatal
    let store = PageStore::create(&config.output_dir).await?;
    let mut driver = ChromeDriver::launch(&cli.launch_options())
        .await
        .context("Failed to start the browser")?;

    // The browser is closed however the crawl ended
    let result = harvest(&cli, &driver, store).await;
    let outcome = browser::close_after(&mut driver, result).await?;

    let index_path = output::write_index(&outcome.visited, &config.output_dir).await?;
    let summary = CrawlSummary::new(&outcome, &config.output_dir, &index_path);
    report::print_summary(&summary, cli.json)
}

// Login, then crawl; everything that needs the browser open
async fn harvest(cli: &Cli, driver: &ChromeDriver, store: PageStore) -> Result<CrawlOutcome> {
    if !cli.no_login_pause {
        login::authenticate(driver, &cli.start_url, cli.navigation_timeout(), cli.settle_delay())
            .await?;
    }

    let mut crawler = Crawler::new(driver, store, cli.crawl_config());
    crawler.crawl(&cli.start_url).await?;
    Ok(crawler.finish())
}
