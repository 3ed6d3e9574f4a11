// src/checker/html.rs
// =============================================================================
// This module extracts links from HTML pages.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever (Mozilla's HTML parser)
//
// We also use the `url` crate to resolve relative links (like "/docs" or
// "../about") against the URL of the page they were found on.
//
// Only http/https links survive: mailto:, tel:, javascript:, data: and
// anything else we can't probe with an HTTP request are dropped here.
// =============================================================================

use scraper::{Html, Selector};
use url::Url;

// Extracts all checkable links from HTML content
//
// Parameters:
//   html: the HTML content to parse
//   base_url: the URL of the page (for resolving relative links)
//
// Returns: absolute http(s) URLs in document order, duplicates included.
// Callers decide how to deduplicate (the auditor and crawler differ).
//
// Example:
//   html = "<a href='/docs'>Docs</a>"
//   base_url = "https://example.com"
//   result = ["https://example.com/docs"]
pub fn extract_html_links(html: &str, base_url: &str) -> Vec<String> {
    let mut links = Vec::new();

    let base = match Url::parse(base_url) {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!("Invalid base URL {}: {}", base_url, e);
            return links;
        }
    };

    let Ok(selector) = Selector::parse("a[href]") else {
        return links;
    };

    let document = Html::parse_document(html);

    for element in document.select(&selector) {
        if let Some(href) = element.value().attr("href") {
            if let Some(absolute_url) = resolve_url(&base, href) {
                links.push(absolute_url);
            }
        }
    }

    links
}

// Resolves a possibly-relative href to an absolute, checkable URL
//
// Examples:
//   base = "https://example.com/page/"
//   href = "/docs" -> Some("https://example.com/docs")
//   href = "../other" -> Some("https://example.com/other")
//   href = "https://other.com" -> Some("https://other.com/")
//   href = "javascript:void(0)" -> None (not HTTP)
//
// Url::join handles both cases: an absolute href replaces the base entirely
fn resolve_url(base: &Url, href: &str) -> Option<String> {
    let resolved = base.join(href).ok()?;

    if is_checkable_link(&resolved) {
        Some(resolved.to_string())
    } else {
        None
    }
}

fn is_checkable_link(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}
