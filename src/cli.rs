// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Two subcommands:
//   link-auditor page  <URL>   check every link on one page
//   link-auditor crawl <URL>   crawl the site breadth-first and check
//                              every link on every page reached
//
// Rust concepts:
// - Derive macros: clap generates the parser from these structs
// - #[command(flatten)]: Reuse one group of flags in several subcommands
// =============================================================================

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use crate::config::CrawlConfig;
use crate::report::OutputFormat;

#[derive(Parser, Debug)]
#[command(
    name = "link-auditor",
    version,
    about = "Find broken links on a page or across a whole site",
    long_about = "link-auditor checks every link on a web page, or crawls a site breadth-first \
                  from a starting URL, and reports links that are broken (HTTP 4xx/5xx) or \
                  unreachable. Reports are printed and saved as JSON."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log detail on stderr (-v info, -vv debug). RUST_LOG overrides this.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check all links on a single page
    ///
    /// Example: link-auditor page https://example.com/
    Page {
        /// Page URL to audit (e.g., https://example.com/)
        url: String,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Crawl a site and check the links on every page reached
    ///
    /// Example: link-auditor crawl https://example.com --max-pages 100 --timeout 120
    Crawl {
        /// Starting URL; only pages on the same base domain are followed
        url: String,

        /// Deepest link level to follow (the starting page is depth 0)
        #[arg(long, default_value_t = 5)]
        max_depth: usize,

        /// Maximum number of pages to crawl
        #[arg(long, default_value_t = 60)]
        max_pages: usize,

        /// Maximum crawl time in seconds (checked between pages)
        #[arg(long, default_value_t = 60)]
        timeout: u64,

        /// Pause before each page fetch, in milliseconds
        #[arg(long, default_value_t = 100)]
        delay_ms: u64,

        #[command(flatten)]
        output: OutputArgs,
    },
}

// Flags shared by both subcommands
#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Output format printed to stdout
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Directory where JSON reports are saved
    #[arg(long, default_value = "reports")]
    pub report_dir: PathBuf,

    /// Don't save a report file
    #[arg(long)]
    pub no_save: bool,

    /// How many links are probed at the same time
    #[arg(long, default_value_t = 8)]
    pub concurrency: usize,
}

impl Commands {
    pub fn output(&self) -> &OutputArgs {
        match self {
            Commands::Page { output, .. } | Commands::Crawl { output, .. } => output,
        }
    }
}

// Builds the crawl budgets from the `crawl` subcommand's flags
pub fn crawl_config(
    max_depth: usize,
    max_pages: usize,
    timeout: u64,
    delay_ms: u64,
    concurrency: usize,
) -> CrawlConfig {
    CrawlConfig {
        max_depth,
        max_pages,
        timeout: Duration::from_secs(timeout),
        page_delay: Duration::from_millis(delay_ms),
        probe_concurrency: concurrency,
    }
}
