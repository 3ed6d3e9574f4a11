// src/config.rs
// =============================================================================
// Runtime settings for the auditor and the crawler.
//
// The CLI (src/cli.rs) fills these in from flags; Default gives the same
// values the CLI uses when a flag is omitted, which is also what tests start
// from before overriding single fields.
// =============================================================================

use std::time::Duration;

// Browser-like User-Agent; some servers reject obvious bots outright
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Settings for the HTTP layer (see checker::HttpChecker)
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub user_agent: String,
    /// Per-request timeout when downloading a page
    pub fetch_timeout: Duration,
    /// Per-request timeout when probing a link's status
    pub probe_timeout: Duration,
    pub max_redirects: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: BROWSER_USER_AGENT.to_string(),
            fetch_timeout: Duration::from_secs(15),
            probe_timeout: Duration::from_secs(10),
            max_redirects: 10,
        }
    }
}

/// Budgets and pacing for a deep crawl (see crawl::SiteCrawler)
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Deepest link level to fetch; the seed is depth 0
    pub max_depth: usize,
    /// Hard cap on the number of page summaries produced
    pub max_pages: usize,
    /// Wall-clock budget, checked between pages
    pub timeout: Duration,
    /// Pause before each page fetch
    pub page_delay: Duration,
    /// How many of one page's links are probed at the same time
    pub probe_concurrency: usize,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            max_depth: 5,
            max_pages: 60,
            timeout: Duration::from_secs(60),
            page_delay: Duration::from_millis(100),
            probe_concurrency: 8,
        }
    }
}
