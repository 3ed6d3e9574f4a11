// src/checker/mod.rs
// =============================================================================
// This module contains the "edges" of the tool: everything that touches HTML
// or the network.
//
// Submodules:
// - http: Fetches pages and probes link status (reqwest)
// - html: Extracts links from HTML pages (scraper)
//
// The auditor and crawler only see the re-exported items below.
// =============================================================================

mod html;
mod http;

pub use html::extract_html_links;
pub use http::{
    probe_links, FetchError, HttpChecker, LinkClass, LinkProbeResult, PageFetcher,
    StatusProber,
};
