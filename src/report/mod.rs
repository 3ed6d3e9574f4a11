// src/report/mod.rs
// =============================================================================
// The structured results produced by the tool, and the helpers that turn them
// into files and terminal output.
//
// Two report shapes exist, one per scan type:
// - PageReport: a single-page audit ("scan_type": "single_page")
// - CrawlResult: a deep crawl ("scan_type": "deep_crawl")
//
// Field names are part of the JSON contract, so they are spelled out exactly
// as they appear in saved reports.
//
// Submodules:
// - persist: Saves a report as a timestamped JSON file
// - render: Prints a report as colored text or pretty JSON
// =============================================================================

mod persist;
mod render;

pub use persist::save_report;
pub use render::{print_report, OutputFormat};

use serde::{Serialize, Serializer};
use std::fmt;
use std::time::Duration;

use crate::checker::LinkProbeResult;

pub const FETCH_FAILED_NOTE: &str = "Failed to fetch content or connection error.";
pub const INVALID_SEED_ERROR: &str = "Invalid starting URL or base domain could not be extracted.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanType {
    SinglePage,
    DeepCrawl,
}

impl ScanType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanType::SinglePage => "single_page",
            ScanType::DeepCrawl => "deep_crawl",
        }
    }
}

/// Result of auditing one page without following any links
#[derive(Debug, Clone, Serialize)]
pub struct PageReport {
    pub audited_url: String,
    pub scan_type: ScanType,
    /// Every http(s) link on the page, duplicates included
    pub total_links_found: usize,
    pub total_broken_links: usize,
    pub broken_links: Vec<LinkProbeResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// One crawled page. Created once per dequeued frontier entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageSummary {
    pub url: String,
    pub depth: usize,
    /// Only present (as 0) when the page itself could not be fetched
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    pub links_found_on_page: usize,
    pub broken_links_on_page: Vec<LinkProbeResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl PageSummary {
    pub fn fetched(
        url: String,
        depth: usize,
        links_found_on_page: usize,
        broken_links_on_page: Vec<LinkProbeResult>,
    ) -> Self {
        Self {
            url,
            depth,
            status_code: None,
            links_found_on_page,
            broken_links_on_page,
            note: None,
        }
    }

    pub fn fetch_failed(url: String, depth: usize) -> Self {
        Self {
            url,
            depth,
            status_code: Some(0),
            links_found_on_page: 0,
            broken_links_on_page: Vec::new(),
            note: Some(FETCH_FAILED_NOTE.to_string()),
        }
    }
}

/// A broken link in the site-wide list, with where it was first seen
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrokenLinkRecord {
    #[serde(flatten)]
    pub probe: LinkProbeResult,
    pub source_page: String,
    pub depth_found: usize,
}

/// Why a crawl stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionStatus {
    Completed,
    TimedOut(Duration),
    UserStopped,
}

impl fmt::Display for CompletionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompletionStatus::Completed => write!(f, "Crawl completed."),
            CompletionStatus::TimedOut(limit) => write!(
                f,
                "Crawl stopped due to timeout ({} seconds).",
                limit.as_secs()
            ),
            CompletionStatus::UserStopped => write!(f, "Crawl stopped by user."),
        }
    }
}

// Reports carry the human-readable message, not the enum variant name
impl Serialize for CompletionStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Result of a deep crawl
#[derive(Debug, Clone, Serialize)]
pub struct CrawlResult {
    pub audited_url: String,
    pub scan_type: ScanType,
    /// Set only when the crawl could not start (bad seed URL)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub total_pages_crawled: usize,
    pub total_unique_links_checked: usize,
    pub total_broken_links_across_site: usize,
    pub crawled_pages_summary: Vec<PageSummary>,
    pub all_broken_links_detailed: Vec<BrokenLinkRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crawl_completion_status: Option<CompletionStatus>,
}

impl CrawlResult {
    /// The result for a seed whose base domain can't be determined
    pub fn invalid_seed(audited_url: &str) -> Self {
        Self {
            audited_url: audited_url.to_string(),
            scan_type: ScanType::DeepCrawl,
            error: Some(INVALID_SEED_ERROR.to_string()),
            total_pages_crawled: 0,
            total_unique_links_checked: 0,
            total_broken_links_across_site: 0,
            crawled_pages_summary: Vec::new(),
            all_broken_links_detailed: Vec::new(),
            crawl_completion_status: None,
        }
    }

    pub fn was_interrupted(&self) -> bool {
        self.crawl_completion_status == Some(CompletionStatus::UserStopped)
    }
}

// Builds the final crawl result from the crawler's accumulated state
//
// Pure reshaping: the counts are derived from the lists so they can never
// disagree with them.
pub fn assemble(
    audited_url: &str,
    pages: Vec<PageSummary>,
    broken: Vec<BrokenLinkRecord>,
    unique_links_checked: usize,
    status: CompletionStatus,
) -> CrawlResult {
    CrawlResult {
        audited_url: audited_url.to_string(),
        scan_type: ScanType::DeepCrawl,
        error: None,
        total_pages_crawled: pages.len(),
        total_unique_links_checked: unique_links_checked,
        total_broken_links_across_site: broken.len(),
        crawled_pages_summary: pages,
        all_broken_links_detailed: broken,
        crawl_completion_status: Some(status),
    }
}

/// Either kind of report, for code that saves or prints both
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum AuditReport {
    SinglePage(PageReport),
    DeepCrawl(CrawlResult),
}

impl AuditReport {
    pub fn audited_url(&self) -> &str {
        match self {
            AuditReport::SinglePage(report) => &report.audited_url,
            AuditReport::DeepCrawl(result) => &result.audited_url,
        }
    }

    pub fn scan_type(&self) -> ScanType {
        match self {
            AuditReport::SinglePage(report) => report.scan_type,
            AuditReport::DeepCrawl(result) => result.scan_type,
        }
    }

    pub fn broken_count(&self) -> usize {
        match self {
            AuditReport::SinglePage(report) => report.total_broken_links,
            AuditReport::DeepCrawl(result) => result.total_broken_links_across_site,
        }
    }

    pub fn was_interrupted(&self) -> bool {
        match self {
            AuditReport::SinglePage(_) => false,
            AuditReport::DeepCrawl(result) => result.was_interrupted(),
        }
    }
}
