// src/crawl/engine.rs
// =============================================================================
// The deep crawl loop.
//
// How it works:
// 1. Canonicalize the seed and work out its base domain (bad seed = stop)
// 2. Put the seed in the frontier at depth 0
// 3. Until the frontier is empty or max_pages summaries exist:
//    a. Stop early on timeout or Ctrl+C (checked only here, between pages)
//    b. Pop the oldest entry and fetch it
//    c. For each distinct link on the page (by canonical form):
//       - internal, unseen and within budget -> queue it at depth + 1
//       - probe it either way, and record it if it's broken
//    d. Record the page summary
// 4. Hand everything to report::assemble
//
// Pages are processed one at a time. Only the links of a single page are
// probed concurrently, after all queueing decisions for that page are made,
// so crawl order and budgets don't depend on network timing.
// =============================================================================

use std::collections::HashSet;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::cancel::CancelToken;
use super::frontier::{Frontier, FrontierEntry};
use crate::checker::{extract_html_links, probe_links, LinkProbeResult, PageFetcher, StatusProber};
use crate::config::CrawlConfig;
use crate::error::{AuditError, Result};
use crate::report::{self, BrokenLinkRecord, CompletionStatus, CrawlResult, PageSummary};
use crate::urls::{base_domain, canonicalize};

// Everything one crawl run accumulates. Built fresh per crawl() call and
// consumed by the report assembler at the end.
struct CrawlState {
    frontier: Frontier,
    pages: Vec<PageSummary>,
    summarized: HashSet<String>,
    broken: Vec<BrokenLinkRecord>,
    // (canonical link, status code) pairs already in `broken`
    broken_keys: HashSet<(String, u16)>,
    unique_links_checked: usize,
}

impl CrawlState {
    fn new(seed: String) -> Self {
        Self {
            frontier: Frontier::with_seed(seed),
            pages: Vec::new(),
            summarized: HashSet::new(),
            broken: Vec::new(),
            broken_keys: HashSet::new(),
            unique_links_checked: 0,
        }
    }

    fn record_page(&mut self, summary: PageSummary) {
        self.summarized.insert(summary.url.clone());
        self.pages.push(summary);
    }

    // Adds a broken link to the site-wide list unless the same canonical link
    // with the same status is already there (first sighting wins)
    fn record_broken(&mut self, canonical: String, probe: &LinkProbeResult, found_on: &FrontierEntry) {
        if !self.broken_keys.insert((canonical, probe.status_code)) {
            return;
        }
        warn!(
            "Broken link found: {} (Code: {}) from {}",
            probe.link, probe.status_code, found_on.url
        );
        self.broken.push(BrokenLinkRecord {
            probe: probe.clone(),
            source_page: found_on.url.clone(),
            depth_found: found_on.depth,
        });
    }
}

// Breadth-first crawler over a site
//
// Generic over the fetch/probe capabilities so tests can run it against an
// in-memory site.
pub struct SiteCrawler<'a, F: ?Sized, P: ?Sized> {
    fetcher: &'a F,
    prober: &'a P,
    config: CrawlConfig,
    cancel: CancelToken,
}

impl<'a, F, P> SiteCrawler<'a, F, P>
where
    F: PageFetcher + ?Sized,
    P: StatusProber + ?Sized,
{
    pub fn new(fetcher: &'a F, prober: &'a P, config: CrawlConfig) -> Self {
        Self {
            fetcher,
            prober,
            config,
            cancel: CancelToken::new(),
        }
    }

    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Crawls the site starting at `start_url` and returns the full result
    ///
    /// Never fails: an unusable seed yields a result with `error` set.
    pub async fn crawl(&self, start_url: &str) -> CrawlResult {
        let (seed, seed_domain) = match resolve_seed(start_url) {
            Ok(resolved) => resolved,
            Err(e) => {
                warn!("{}", e);
                return CrawlResult::invalid_seed(start_url);
            }
        };

        info!(
            "Starting deep crawl of {} (domain: {}, max depth: {}, max pages: {}, timeout: {}s)",
            seed,
            seed_domain,
            self.config.max_depth,
            self.config.max_pages,
            self.config.timeout.as_secs()
        );

        let started = Instant::now();
        let mut state = CrawlState::new(seed);

        let status = loop {
            if state.frontier.is_empty() || state.pages.len() >= self.config.max_pages {
                break CompletionStatus::Completed;
            }
            if started.elapsed() > self.config.timeout {
                break CompletionStatus::TimedOut(self.config.timeout);
            }
            if self.cancel.is_cancelled() {
                break CompletionStatus::UserStopped;
            }

            let Some(entry) = state.frontier.pop() else {
                break CompletionStatus::Completed;
            };

            // The visited set should make both of these impossible
            if state.summarized.contains(&entry.url) {
                warn!("{} was dequeued twice; skipping", entry.url);
                continue;
            }
            if entry.depth > self.config.max_depth {
                debug!(
                    "Skipping {} (depth {} > max depth {})",
                    entry.url, entry.depth, self.config.max_depth
                );
                continue;
            }

            self.crawl_page(&mut state, entry, &seed_domain).await;
        };

        info!(
            "{} Pages crawled: {}, broken links found: {}",
            status,
            state.pages.len(),
            state.broken.len()
        );

        report::assemble(
            start_url,
            state.pages,
            state.broken,
            state.unique_links_checked,
            status,
        )
    }

    async fn crawl_page(&self, state: &mut CrawlState, entry: FrontierEntry, seed_domain: &str) {
        info!(
            "Crawling (depth {}, page {} of {}): {}",
            entry.depth,
            state.pages.len() + 1,
            self.config.max_pages,
            entry.url
        );

        if !self.config.page_delay.is_zero() {
            tokio::time::sleep(self.config.page_delay).await;
        }

        let html = match self.fetcher.fetch_document(&entry.url).await {
            Ok(html) => html,
            Err(e) => {
                debug!("Recording {} as unreachable: {}", entry.url, e);
                state.record_page(PageSummary::fetch_failed(entry.url, entry.depth));
                return;
            }
        };

        // Relative links resolve against the canonical page URL
        let links = extract_html_links(&html, &entry.url);
        let links_found_on_page = links.len();

        let mut seen_on_page = HashSet::new();
        let mut raw_links = Vec::new();
        let mut canonical_links = Vec::new();

        for raw in links {
            let canonical = canonicalize(&raw);
            if !seen_on_page.insert(canonical.clone()) {
                continue;
            }

            let is_internal = base_domain(&canonical).as_deref() == Some(seed_domain);
            if is_internal {
                self.try_enqueue(state, &canonical, entry.depth + 1);
            } else {
                debug!("Not following {} (external)", canonical);
            }

            raw_links.push(raw);
            canonical_links.push(canonical);
        }

        // Every distinct link is probed, internal or not, queued or not
        let results = probe_links(self.prober, raw_links, self.config.probe_concurrency).await;
        state.unique_links_checked += results.len();

        let mut broken_on_page = Vec::new();
        for (result, canonical) in results.into_iter().zip(canonical_links) {
            if !result.is_broken() {
                debug!("OK: {} (Code: {})", result.link, result.status_code);
                continue;
            }
            state.record_broken(canonical, &result, &entry);
            broken_on_page.push(result);
        }

        state.record_page(PageSummary::fetched(
            entry.url,
            entry.depth,
            links_found_on_page,
            broken_on_page,
        ));
    }

    // Queues an internal link if it is new and fits the depth/page budgets
    //
    // The page check counts pages already summarized plus everything still
    // queued, so the frontier never promises more pages than max_pages.
    fn try_enqueue(&self, state: &mut CrawlState, canonical: &str, depth: usize) {
        if state.frontier.has_visited(canonical) {
            debug!("Not queueing {} (already visited/queued)", canonical);
            return;
        }
        if depth > self.config.max_depth {
            debug!("Not queueing {} (exceeds max depth)", canonical);
            return;
        }
        if state.pages.len() + state.frontier.len() + 1 > self.config.max_pages {
            debug!(
                "Not queueing {} (max pages limit {})",
                canonical, self.config.max_pages
            );
            return;
        }

        state.frontier.push(canonical.to_string(), depth);
        debug!("Queued {} at depth {}", canonical, depth);
    }
}

// Canonicalizes the starting URL and extracts the base domain that decides
// which links are followed
fn resolve_seed(start_url: &str) -> Result<(String, String)> {
    let seed = canonicalize(start_url);
    debug!("Normalized start URL: {} -> {}", start_url, seed);

    let domain = base_domain(&seed).ok_or_else(|| AuditError::InvalidSeed(start_url.to_string()))?;
    Ok((seed, domain))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake_site::FakeSite;
    use crate::report::FETCH_FAILED_NOTE;
    use std::time::Duration;

    fn config() -> CrawlConfig {
        CrawlConfig {
            page_delay: Duration::ZERO,
            ..CrawlConfig::default()
        }
    }

    fn links(hrefs: &[&str]) -> String {
        hrefs
            .iter()
            .map(|href| format!(r#"<a href="{}">link</a>"#, href))
            .collect()
    }

    fn page_urls(result: &CrawlResult) -> Vec<&str> {
        result
            .crawled_pages_summary
            .iter()
            .map(|page| page.url.as_str())
            .collect()
    }

    #[tokio::test]
    async fn test_self_loop_fetched_once() {
        let site = FakeSite::new().page(
            "https://a.test/",
            &links(&["/", "https://a.test", "http://www.a.test/#top"]),
        );

        let result = SiteCrawler::new(&site, &site, config())
            .crawl("https://a.test")
            .await;

        assert_eq!(page_urls(&result), vec!["https://a.test/"]);
        assert_eq!(site.fetched(), vec!["https://a.test/"]);
        // the three spellings collapse to one probed link
        assert_eq!(result.total_unique_links_checked, 1);
        assert_eq!(result.crawled_pages_summary[0].links_found_on_page, 3);
        assert_eq!(result.crawl_completion_status, Some(CompletionStatus::Completed));
    }

    #[tokio::test]
    async fn test_two_page_cycle_fetched_once_each() {
        let site = FakeSite::new()
            .page("https://a.test/", &links(&["/b"]))
            .page(
                "https://a.test/b/",
                &links(&["https://a.test/", "http://www.a.test/b#x"]),
            );

        let result = SiteCrawler::new(&site, &site, config())
            .crawl("https://a.test/")
            .await;

        assert_eq!(site.fetched(), vec!["https://a.test/", "https://a.test/b/"]);
        assert_eq!(page_urls(&result), vec!["https://a.test/", "https://a.test/b/"]);
        assert_eq!(result.total_broken_links_across_site, 0);
        assert_eq!(result.crawl_completion_status, Some(CompletionStatus::Completed));
    }

    #[test]
    fn test_resolve_seed() {
        let (seed, domain) = resolve_seed("http://www.A.test/docs#intro").unwrap();
        assert_eq!(seed, "https://a.test/docs/");
        assert_eq!(domain, "a.test");

        assert!(matches!(
            resolve_seed("not a url"),
            Err(AuditError::InvalidSeed(url)) if url == "not a url"
        ));
    }

    #[tokio::test]
    async fn test_max_pages_one() {
        let site = FakeSite::new()
            .page("https://a.test/", &links(&["/1", "/2", "/3", "/4", "/5"]))
            .page("https://a.test/1/", "")
            .page("https://a.test/2/", "");

        let config = CrawlConfig {
            max_pages: 1,
            ..config()
        };
        let result = SiteCrawler::new(&site, &site, config)
            .crawl("https://a.test/")
            .await;

        assert_eq!(result.total_pages_crawled, 1);
        assert_eq!(site.fetched(), vec!["https://a.test/"]);
        // links are still probed even though none can be queued
        assert_eq!(result.total_unique_links_checked, 5);
    }

    #[tokio::test]
    async fn test_breadth_first_order() {
        let site = FakeSite::new()
            .page("https://a.test/", &links(&["/a", "/b"]))
            .page("https://a.test/a/", &links(&["/c"]))
            .page("https://a.test/b/", &links(&["/d"]))
            .page("https://a.test/c/", "")
            .page("https://a.test/d/", "");

        let result = SiteCrawler::new(&site, &site, config())
            .crawl("https://a.test/")
            .await;

        assert_eq!(
            page_urls(&result),
            vec![
                "https://a.test/",
                "https://a.test/a/",
                "https://a.test/b/",
                "https://a.test/c/",
                "https://a.test/d/",
            ]
        );
        let depths: Vec<usize> = result
            .crawled_pages_summary
            .iter()
            .map(|page| page.depth)
            .collect();
        assert_eq!(depths, vec![0, 1, 1, 2, 2]);
    }

    #[tokio::test]
    async fn test_max_depth_respected() {
        let site = FakeSite::new()
            .page("https://a.test/", &links(&["/a"]))
            .page("https://a.test/a/", &links(&["/b"]))
            .page("https://a.test/b/", "");

        let config = CrawlConfig {
            max_depth: 1,
            ..config()
        };
        let result = SiteCrawler::new(&site, &site, config)
            .crawl("https://a.test/")
            .await;

        assert_eq!(page_urls(&result), vec!["https://a.test/", "https://a.test/a/"]);
        assert!(result.crawled_pages_summary.iter().all(|page| page.depth <= 1));
        assert!(!site.fetched().contains(&"https://a.test/b/".to_string()));
        // the too-deep page is still probed as a link
        assert!(site.probed().contains(&"https://a.test/b".to_string()));
    }

    #[tokio::test]
    async fn test_page_budget_caps_reachable_site() {
        // /4 fails the admission check; /1 to /3 are queued but only two of
        // them fit once the seed is summarized
        let site = FakeSite::new()
            .page("https://a.test/", &links(&["/1", "/2", "/3", "/4"]))
            .page("https://a.test/1/", "")
            .page("https://a.test/2/", "")
            .page("https://a.test/3/", "");

        let config = CrawlConfig {
            max_pages: 3,
            ..config()
        };
        let result = SiteCrawler::new(&site, &site, config)
            .crawl("https://a.test/")
            .await;

        assert_eq!(
            page_urls(&result),
            vec!["https://a.test/", "https://a.test/1/", "https://a.test/2/"]
        );
        assert_eq!(site.fetched().len(), 3);
    }

    #[tokio::test]
    async fn test_external_links_probed_not_followed() {
        let site = FakeSite::new()
            .page(
                "https://a.test/",
                &links(&["https://blog.a.test/post", "https://other.test/"]),
            )
            .page("https://blog.a.test/post/", "")
            .page("https://other.test/", &links(&["https://other.test/deeper"]));

        let result = SiteCrawler::new(&site, &site, config())
            .crawl("https://www.a.test/")
            .await;

        // subdomains share the base domain, so they count as internal
        assert_eq!(
            page_urls(&result),
            vec!["https://a.test/", "https://blog.a.test/post/"]
        );
        assert!(site.probed().contains(&"https://other.test/".to_string()));
        assert!(!site.fetched().contains(&"https://other.test/".to_string()));
        assert_eq!(result.audited_url, "https://www.a.test/");
    }

    #[tokio::test]
    async fn test_broken_links_deduplicated_site_wide() {
        let shared = links(&[
            "https://x.test/dead",
            "http://www.x.test/dead/#frag",
            "https://x.test/down",
        ]);
        let site = FakeSite::new()
            .page("https://a.test/", &links(&["/a", "/b", "https://x.test/dead"]))
            .page("https://a.test/a/", &shared)
            .page("https://a.test/b/", &shared)
            .status("https://x.test/dead", 404)
            .status("http://www.x.test/dead/#frag", 404);

        let result = SiteCrawler::new(&site, &site, config())
            .crawl("https://a.test/")
            .await;

        let detailed: Vec<(&str, u16, &str)> = result
            .all_broken_links_detailed
            .iter()
            .map(|r| (r.probe.link.as_str(), r.probe.status_code, r.source_page.as_str()))
            .collect();
        assert_eq!(
            detailed,
            vec![
                ("https://x.test/dead", 404, "https://a.test/"),
                ("https://x.test/down", 0, "https://a.test/a/"),
            ]
        );
        assert_eq!(result.total_broken_links_across_site, 2);
        assert_eq!(result.all_broken_links_detailed[1].depth_found, 1);

        // each page still reports what it links to
        let page_b = &result.crawled_pages_summary[2];
        assert_eq!(page_b.url, "https://a.test/b/");
        assert_eq!(page_b.links_found_on_page, 3);
        assert_eq!(page_b.broken_links_on_page.len(), 2);

        let mut keys = HashSet::new();
        for record in &result.all_broken_links_detailed {
            assert!(keys.insert((canonicalize(&record.probe.link), record.probe.status_code)));
        }
    }

    #[tokio::test]
    async fn test_fetch_failure_recorded_and_crawl_continues() {
        let site = FakeSite::new()
            .page("https://a.test/", &links(&["/gone", "/ok"]))
            .page("https://a.test/ok/", "")
            .status("https://a.test/gone", 404);

        let result = SiteCrawler::new(&site, &site, config())
            .crawl("https://a.test/")
            .await;

        assert_eq!(result.total_pages_crawled, 3);
        let failed = &result.crawled_pages_summary[1];
        assert_eq!(failed.url, "https://a.test/gone/");
        assert_eq!(failed.status_code, Some(0));
        assert_eq!(failed.links_found_on_page, 0);
        assert_eq!(failed.note.as_deref(), Some(FETCH_FAILED_NOTE));
        assert_eq!(result.crawled_pages_summary[2].url, "https://a.test/ok/");
    }

    #[tokio::test]
    async fn test_invalid_seed() {
        let site = FakeSite::new();

        let result = SiteCrawler::new(&site, &site, config())
            .crawl("not a url")
            .await;

        assert!(result.error.is_some());
        assert_eq!(result.total_pages_crawled, 0);
        assert!(result.crawl_completion_status.is_none());
        assert!(site.fetched().is_empty());
    }

    #[tokio::test]
    async fn test_cancel_stops_at_next_page() {
        let token = CancelToken::new();
        let site = FakeSite::new()
            .page("https://a.test/", &links(&["/a", "/b"]))
            .page("https://a.test/a/", "")
            .page("https://a.test/b/", "")
            .cancel_on_fetch(token.clone());

        let result = SiteCrawler::new(&site, &site, config())
            .with_cancel_token(token)
            .crawl("https://a.test/")
            .await;

        // the in-flight page finishes, nothing after it starts
        assert_eq!(page_urls(&result), vec!["https://a.test/"]);
        assert_eq!(result.total_unique_links_checked, 2);
        assert_eq!(result.crawl_completion_status, Some(CompletionStatus::UserStopped));
        assert!(result.was_interrupted());
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let token = CancelToken::new();
        token.cancel();
        let site = FakeSite::new().page("https://a.test/", "");

        let result = SiteCrawler::new(&site, &site, config())
            .with_cancel_token(token)
            .crawl("https://a.test/")
            .await;

        assert_eq!(result.total_pages_crawled, 0);
        assert_eq!(result.crawl_completion_status, Some(CompletionStatus::UserStopped));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_checked_between_pages() {
        let site = FakeSite::new()
            .page("https://a.test/", &links(&["/a", "/b", "/c"]))
            .page("https://a.test/a/", "")
            .page("https://a.test/b/", "")
            .page("https://a.test/c/", "")
            .fetch_delay(Duration::from_secs(2));

        let config = CrawlConfig {
            timeout: Duration::from_secs(3),
            ..config()
        };
        let result = SiteCrawler::new(&site, &site, config)
            .crawl("https://a.test/")
            .await;

        // t=2s after the seed (under budget), t=4s after /a (over budget)
        assert_eq!(result.total_pages_crawled, 2);
        assert_eq!(
            result.crawl_completion_status,
            Some(CompletionStatus::TimedOut(Duration::from_secs(3)))
        );
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json["crawl_completion_status"],
            "Crawl stopped due to timeout (3 seconds)."
        );
    }

    #[tokio::test]
    async fn test_sequential_probing_matches_concurrent() {
        let build = || {
            FakeSite::new()
                .page("https://a.test/", &links(&["/a", "https://x.test/1", "https://x.test/2"]))
                .page("https://a.test/a/", &links(&["https://x.test/2", "https://x.test/3"]))
                .status("https://x.test/1", 500)
                .status("https://x.test/3", 410)
        };

        let site = build();
        let sequential = SiteCrawler::new(&site, &site, CrawlConfig {
            probe_concurrency: 1,
            ..config()
        })
        .crawl("https://a.test/")
        .await;

        let site = build();
        let concurrent = SiteCrawler::new(&site, &site, CrawlConfig {
            probe_concurrency: 16,
            ..config()
        })
        .crawl("https://a.test/")
        .await;

        assert_eq!(sequential.crawled_pages_summary, concurrent.crawled_pages_summary);
        assert_eq!(
            sequential.all_broken_links_detailed,
            concurrent.all_broken_links_detailed
        );
    }
}
