// src/urls/canonical.rs
// =============================================================================
// This module normalizes URLs so that two spellings of the same page compare
// equal.
//
// Rules (applied in order):
// 1. Scheme is always https
// 2. Host is lowercased and leading "www." labels are removed
// 3. Path is never empty and always ends with '/'
// 4. Tracking query parameters are dropped, the rest are sorted by key
// 5. The fragment (#section) is dropped
//
// Example:
//   "http://WWW.Example.com/a?utm_source=x&b=2&b=1"
//   -> "https://example.com/a/?b=2&b=1"
//
// The crawler's visited set is keyed by this string, so the output must be
// stable: canonicalize(canonicalize(u)) == canonicalize(u).
//
// Rust concepts:
// - BTreeMap: A map that keeps its keys sorted
// - Early returns with let-else: Bail out to a fallback value
// =============================================================================

use std::collections::BTreeMap;
use url::{form_urlencoded, Url};

// Query parameters that only exist for analytics and never change the page
const TRACKING_PARAMS: &[&str] = &[
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_term",
    "utm_content",
    "gclid",
    "fbclid",
    "ref",
    "_ga",
];

// Normalizes a URL into its canonical comparison form
//
// Parameters:
//   url: any URL string (absolute, possibly with tracking params/fragment)
//
// Returns: the canonical string, or the input unchanged if it can't be parsed
pub fn canonicalize(url: &str) -> String {
    let Ok(parsed) = Url::parse(url) else {
        return url.to_string();
    };

    // URLs like mailto:someone@x.com have no host to normalize
    let Some(host) = parsed.host_str() else {
        return url.to_string();
    };

    let host = host.to_lowercase();
    let host = strip_www(&host);

    let mut canonical = String::from("https://");

    // Keep credentials if present (rare, but they are part of the authority)
    if !parsed.username().is_empty() {
        canonical.push_str(parsed.username());
        if let Some(password) = parsed.password() {
            canonical.push(':');
            canonical.push_str(password);
        }
        canonical.push('@');
    }

    canonical.push_str(host);

    // 443 is implied by https, so writing it out would not survive a re-parse.
    // The parser already drops a scheme's default port (":80" on http://).
    if let Some(port) = parsed.port().filter(|&p| p != 443) {
        canonical.push(':');
        canonical.push_str(&port.to_string());
    }

    let path = parsed.path();
    canonical.push_str(if path.is_empty() { "/" } else { path });
    if !canonical.ends_with('/') {
        canonical.push('/');
    }

    if let Some(query) = parsed.query().and_then(canonical_query) {
        canonical.push('?');
        canonical.push_str(&query);
    }

    canonical
}

// Removes leading "www." labels, but never the whole host
fn strip_www(host: &str) -> &str {
    let mut host = host;
    while let Some(rest) = host.strip_prefix("www.") {
        if rest.is_empty() {
            break;
        }
        host = rest;
    }
    host
}

// Rebuilds a query string without tracking parameters, sorted by key
//
// Repeated keys keep their values in their original order:
//   "b=2&a=1&b=1" -> "a=1&b=2&b=1"
//
// Returns None when nothing is left (so the caller omits the '?')
fn canonical_query(query: &str) -> Option<String> {
    let mut params: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        if TRACKING_PARAMS.contains(&&*key) {
            continue;
        }
        params
            .entry(key.into_owned())
            .or_default()
            .push(value.into_owned());
    }

    if params.is_empty() {
        return None;
    }

    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, values) in &params {
        for value in values {
            serializer.append_pair(key, value);
        }
    }
    Some(serializer.finish())
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is let-else?
//    - let Ok(parsed) = Url::parse(url) else { return ... };
//    - Binds the value if the pattern matches, otherwise runs the else block
//    - The else block must leave the function (return, break, panic, ...)
//
// 2. Why BTreeMap instead of HashMap?
//    - BTreeMap iterates its keys in sorted order
//    - That is exactly the "sort parameters by key" rule we need
//    - HashMap iteration order is random, which would break stable output
//
// 3. What is form_urlencoded?
//    - The url crate's helper for "key=value&key2=value2" strings
//    - parse() decodes (%20 and + become spaces)
//    - Serializer re-encodes consistently, so output is stable on re-parse
// -----------------------------------------------------------------------------
