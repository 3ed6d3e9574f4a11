// src/crawl/mod.rs
// =============================================================================
// This module handles deep website crawling.
//
// Features:
// - Breadth-first crawling starting from a seed URL
// - Visited-set dedup keyed by canonical URL (see urls::canonicalize)
// - Same-site restriction via base domain (external links are probed, not
//   followed)
// - Depth, page-count and wall-clock budgets
// - Cooperative cancellation (Ctrl+C) through a CancelToken
// - Polite crawling with a delay before each page fetch
//
// Submodules:
// - cancel: The stop flag shared between the signal handler and the crawl
// - frontier: The FIFO queue of pages to visit plus the visited set
// - engine: The crawl loop itself (SiteCrawler)
// =============================================================================

mod cancel;
mod engine;
mod frontier;

pub use cancel::CancelToken;
pub use engine::SiteCrawler;
