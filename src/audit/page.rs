// src/audit/page.rs
// =============================================================================
// Audits one page for broken links.
//
// How it works:
// 1. Fetch the page HTML
// 2. Extract all <a href> links, resolved against the page URL
// 3. Drop exact duplicates (each distinct URL is probed once)
// 4. Probe every remaining link and keep the broken ones
//
// A page that can't be fetched is not an error: the report simply says zero
// links were found and carries a note explaining why.
// =============================================================================

use std::collections::HashSet;
use tracing::info;

use crate::checker::{extract_html_links, probe_links, PageFetcher, StatusProber};
use crate::report::{PageReport, ScanType, FETCH_FAILED_NOTE};

// Audits a single page
//
// Parameters:
//   fetcher: downloads the page
//   prober: checks each link's status
//   url: the page to audit (used as-is, not canonicalized)
//   probe_concurrency: how many links are probed at once
pub async fn audit_page<F, P>(
    fetcher: &F,
    prober: &P,
    url: &str,
    probe_concurrency: usize,
) -> PageReport
where
    F: PageFetcher + ?Sized,
    P: StatusProber + ?Sized,
{
    info!("Checking for broken links on {}", url);

    let html = match fetcher.fetch_document(url).await {
        Ok(html) => html,
        Err(_) => {
            return PageReport {
                audited_url: url.to_string(),
                scan_type: ScanType::SinglePage,
                total_links_found: 0,
                total_broken_links: 0,
                broken_links: Vec::new(),
                note: Some(FETCH_FAILED_NOTE.to_string()),
            };
        }
    };

    let links = extract_html_links(&html, url);
    let total_links_found = links.len();

    // HashSet::insert returns false for values already seen
    let mut seen = HashSet::new();
    let unique_links: Vec<String> = links
        .into_iter()
        .filter(|link| seen.insert(link.clone()))
        .collect();

    let broken_links: Vec<_> = probe_links(prober, unique_links, probe_concurrency)
        .await
        .into_iter()
        .filter(|result| result.is_broken())
        .collect();

    info!(
        "{}: {} link(s) found, {} broken",
        url,
        total_links_found,
        broken_links.len()
    );

    PageReport {
        audited_url: url.to_string(),
        scan_type: ScanType::SinglePage,
        total_links_found,
        total_broken_links: broken_links.len(),
        broken_links,
        note: None,
    }
}
