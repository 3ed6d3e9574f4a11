// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (stderr, so JSON on stdout stays clean)
// 3. Run a single-page audit or a deep crawl
// 4. Print the report and save it as a JSON file
// 5. Exit with proper code (0 = no broken links, 1 = broken links, 2 = error)
//
// Ctrl+C during a crawl doesn't kill the process: it sets a CancelToken, the
// crawler stops after the current page, and the partial report is still
// printed and saved (with an "-interrupted" file name suffix).
// =============================================================================

mod audit;
mod checker;
mod cli;
mod config;
mod crawl;
mod error;
mod report;
mod urls;

#[cfg(test)]
mod fake_site;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use checker::HttpChecker;
use cli::{Cli, Commands, OutputArgs};
use config::HttpConfig;
use crawl::{CancelToken, SiteCrawler};
use report::AuditReport;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = no broken links
//   Ok(1) = broken links found
//   Ok(2) = the crawl could not start (invalid seed URL)
//   Err = unexpected error
async fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let checker = HttpChecker::new(HttpConfig::default())?;
    let output = cli.command.output().clone();

    let report = match cli.command {
        Commands::Page { url, output } => {
            eprintln!("🔍 Checking for broken links on: {}", url);
            let report = audit::audit_page(&checker, &checker, &url, output.concurrency).await;
            AuditReport::SinglePage(report)
        }
        Commands::Crawl {
            url,
            max_depth,
            max_pages,
            timeout,
            delay_ms,
            output,
        } => {
            let config = cli::crawl_config(max_depth, max_pages, timeout, delay_ms, output.concurrency);
            eprintln!(
                "🔍 Deep crawl of {} (max depth: {}, max pages: {}, max time: {}s)",
                url, max_depth, max_pages, timeout
            );

            let cancel = CancelToken::new();
            spawn_interrupt_listener(cancel.clone());

            let result = SiteCrawler::new(&checker, &checker, config)
                .with_cancel_token(cancel)
                .crawl(&url)
                .await;
            AuditReport::DeepCrawl(result)
        }
    };

    finish(&report, &output)
}

// Prints and saves the report, then picks the exit code
fn finish(report: &AuditReport, output: &OutputArgs) -> Result<i32> {
    report::print_report(report, output.format)?;

    if !output.no_save {
        match report::save_report(report, &output.report_dir) {
            Ok(path) => eprintln!("💾 Report saved to '{}'", path.display()),
            Err(e) => eprintln!("Error saving report: {:#}", e),
        }
    }

    if let AuditReport::DeepCrawl(result) = report {
        if result.error.is_some() {
            return Ok(2);
        }
    }

    Ok(if report.broken_count() > 0 { 1 } else { 0 })
}

// Logs go to stderr; RUST_LOG wins over -v when set
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// First Ctrl+C asks the crawl to stop after the current page; a second one
// exits immediately.
fn spawn_interrupt_listener(cancel: CancelToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\n⏹️  Stop signal received. Crawl will stop after the current page...");
            eprintln!("Press Ctrl+C again to quit without a report");
            cancel.cancel();

            if tokio::signal::ctrl_c().await.is_ok() {
                std::process::exit(130);
            }
        }
    });
}
