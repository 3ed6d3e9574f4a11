// src/urls/mod.rs
// =============================================================================
// This module holds the pure URL helpers used by the auditor and the crawler.
//
// Submodules:
// - canonical: Turns a URL into a comparison-stable string (dedup key)
// - domain: Extracts the "base domain" used for internal/external checks
//
// Neither function ever fails: bad input degrades to a fallback value so a
// single malformed href can't take down a whole crawl.
// =============================================================================

mod canonical;
mod domain;

pub use canonical::canonicalize;
pub use domain::base_domain;
