// src/checker/http.rs
// =============================================================================
// This module talks to the network: it downloads pages and checks whether
// links are alive.
//
// Key functionality:
// - PageFetcher / StatusProber: the two capabilities the auditor and crawler
//   need. They are traits so tests can swap in an in-memory fake site.
// - HttpChecker: the real implementation, built on one shared reqwest Client
// - LinkProbeResult: a probed link plus its classification
//
// Status rules:
//   0        -> Connection Error (timeout, DNS, refused, TLS, ...)
//   400..    -> Broken
//   anything else (2xx, 3xx) -> OK
//
// Rust concepts:
// - Traits: Shared behavior that several types can implement
// - async-trait: Lets trait methods be async
// - thiserror: Derives std::error::Error for our error enum
// =============================================================================

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use reqwest::{header, Client};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::HttpConfig;
use crate::error::Result;

// How a probed link is classified
//
// Serialized as the "status_message" field of a link entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LinkClass {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "Broken")]
    Broken,
    #[serde(rename = "Connection Error")]
    ConnectionError,
}

impl LinkClass {
    /// Classifies a probe status code (0 means the request never completed)
    pub fn from_status(status_code: u16) -> Self {
        match status_code {
            0 => LinkClass::ConnectionError,
            code if code >= 400 => LinkClass::Broken,
            _ => LinkClass::Ok,
        }
    }
}

// Represents the result of probing a single link
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkProbeResult {
    /// The resolved URL as it was found on the page (not canonicalized)
    pub link: String,
    /// HTTP status code, or 0 for a connection-level failure
    pub status_code: u16,
    #[serde(rename = "status_message")]
    pub class: LinkClass,
}

impl LinkProbeResult {
    pub fn new(link: String, status_code: u16) -> Self {
        Self {
            link,
            status_code,
            class: LinkClass::from_status(status_code),
        }
    }

    /// Broken links and connection errors both count as "broken" in reports
    pub fn is_broken(&self) -> bool {
        self.class != LinkClass::Ok
    }
}

// Why fetching a page failed
//
// The crawler only cares that it failed; the variants exist so the log
// line says something useful.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP {0}")]
    Status(u16),

    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request failed: {0}")]
    Request(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            FetchError::Timeout
        } else if error.is_connect() {
            FetchError::Connect(error.to_string())
        } else {
            FetchError::Request(error.to_string())
        }
    }
}

/// Downloads a document so its links can be extracted
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_document(&self, url: &str) -> std::result::Result<String, FetchError>;
}

/// Checks whether a URL exists, returning its HTTP status (0 on failure)
#[async_trait]
pub trait StatusProber: Send + Sync {
    async fn probe_status(&self, url: &str) -> u16;
}

// The reqwest-backed implementation of both capabilities
//
// One Client is shared for every request so connections are pooled.
// Timeouts are set per request because fetches and probes use different ones.
#[derive(Debug, Clone)]
pub struct HttpChecker {
    client: Client,
    config: HttpConfig,
}

impl HttpChecker {
    pub fn new(config: HttpConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()?;

        Ok(Self { client, config })
    }

    async fn get_document(&self, url: &str) -> std::result::Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .timeout(self.config.fetch_timeout)
            .send()
            .await?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            return Err(FetchError::Status(status.as_u16()));
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl PageFetcher for HttpChecker {
    async fn fetch_document(&self, url: &str) -> std::result::Result<String, FetchError> {
        let result = self.get_document(url).await;

        match &result {
            Ok(body) => debug!("Fetched {} ({} bytes)", url, body.len()),
            Err(FetchError::Status(403)) => warn!(
                "Failed to fetch {}: HTTP 403 (the server may be blocking automated requests)",
                url
            ),
            Err(e) => warn!("Failed to fetch {}: {}", url, e),
        }

        result
    }
}

#[async_trait]
impl StatusProber for HttpChecker {
    async fn probe_status(&self, url: &str) -> u16 {
        // HEAD is enough to learn the status without downloading the body
        let result = self
            .client
            .head(url)
            .header(header::ACCEPT, "*/*")
            .timeout(self.config.probe_timeout)
            .send()
            .await;

        match result {
            Ok(response) => response.status().as_u16(),
            Err(e) => {
                debug!("Probe of {} failed: {}", url, e);
                0
            }
        }
    }
}

// Probes many links concurrently and classifies each result
//
// Up to `concurrency` probes are in flight at once, but results come back in
// the same order as `urls` (.buffered, not .buffer_unordered), so callers can
// fold them into reports in discovery order.
pub async fn probe_links<P>(prober: &P, urls: Vec<String>, concurrency: usize) -> Vec<LinkProbeResult>
where
    P: StatusProber + ?Sized,
{
    let probes = urls.into_iter().map(|url| async move {
        let status_code = prober.probe_status(&url).await;
        LinkProbeResult::new(url, status_code)
    });

    stream::iter(probes)
        .buffered(concurrency.max(1))
        .collect()
        .await
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why traits for fetching and probing?
//    - The crawler is written against PageFetcher/StatusProber, not reqwest
//    - Production passes an HttpChecker; tests pass a fake in-memory site
//    - No network needed to test the crawl logic itself
//
// 2. What does #[async_trait] do?
//    - Rewrites `async fn` in the trait into a method returning a boxed future
//    - That makes the trait usable behind &dyn or generics alike
//
// 3. buffered vs buffer_unordered?
//    - Both run up to N futures at once
//    - buffered(N) yields results in input order, buffer_unordered(N) as
//      they finish. Report order matters here, so we use buffered.
//
// 4. Why implement From<reqwest::Error> for FetchError?
//    - So the ? operator converts reqwest errors automatically
//    - We sort them into timeout/connect/other once, in one place
// -----------------------------------------------------------------------------
