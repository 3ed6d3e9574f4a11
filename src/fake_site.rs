// src/fake_site.rs
// =============================================================================
// An in-memory website for tests.
//
// Implements PageFetcher and StatusProber so the auditor and crawler can be
// exercised without a network. Pages are keyed by the exact URL the caller
// fetches (canonical URLs, for the crawler); link statuses by raw URL.
// =============================================================================

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use crate::checker::{FetchError, PageFetcher, StatusProber};
use crate::crawl::CancelToken;
use crate::urls::canonicalize;

#[derive(Debug, Default)]
pub struct FakeSite {
    pages: HashMap<String, String>,
    statuses: HashMap<String, u16>,
    fetch_delay: Duration,
    cancel_on_fetch: Option<CancelToken>,
    fetched: Mutex<Vec<String>>,
    probed: Mutex<Vec<String>>,
}

impl FakeSite {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves `html` when `url` is fetched
    pub fn page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), html.to_string());
        self
    }

    /// Answers probes of `url` with `status`
    pub fn status(mut self, url: &str, status: u16) -> Self {
        self.statuses.insert(url.to_string(), status);
        self
    }

    /// Makes every fetch take `delay` (on tokio's clock)
    pub fn fetch_delay(mut self, delay: Duration) -> Self {
        self.fetch_delay = delay;
        self
    }

    /// Cancels `token` as soon as the first page is fetched
    pub fn cancel_on_fetch(mut self, token: CancelToken) -> Self {
        self.cancel_on_fetch = Some(token);
        self
    }

    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }

    pub fn probed(&self) -> Vec<String> {
        self.probed.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageFetcher for FakeSite {
    async fn fetch_document(&self, url: &str) -> Result<String, FetchError> {
        self.fetched.lock().unwrap().push(url.to_string());

        if !self.fetch_delay.is_zero() {
            tokio::time::sleep(self.fetch_delay).await;
        }
        if let Some(token) = &self.cancel_on_fetch {
            token.cancel();
        }

        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::Connect(format!("no page at {}", url)))
    }
}

#[async_trait]
impl StatusProber for FakeSite {
    // Unlisted links answer 200 if they are a known page, otherwise 0
    async fn probe_status(&self, url: &str) -> u16 {
        self.probed.lock().unwrap().push(url.to_string());

        if let Some(status) = self.statuses.get(url) {
            return *status;
        }
        if self.pages.contains_key(url) || self.pages.contains_key(&canonicalize(url)) {
            200
        } else {
            0
        }
    }
}
