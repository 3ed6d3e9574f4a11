// src/urls/domain.rs
// =============================================================================
// Works out the "base domain" of a URL so we can tell internal links
// (same site as the seed) from external ones.
//
// The rule is deliberately simple: take the last two dot-separated labels of
// the host.
//   blog.example.com -> example.com
//   example.com      -> example.com
//   localhost        -> localhost
//
// Known limitation: multi-part public suffixes are not recognized, so
// foo.co.uk -> co.uk. Every site under co.uk therefore counts as "internal"
// to every other. A public-suffix list would fix this but is out of scope.
// =============================================================================

use url::Url;

// Extracts the base domain from a URL
//
// Returns None when the URL can't be parsed or has no host
pub fn base_domain(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;

    // host_str() never includes the port, so "example.com:8080" is handled
    let host = parsed.host_str()?;
    if host.is_empty() {
        return None;
    }

    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() >= 2 {
        Some(labels[labels.len() - 2..].join("."))
    } else {
        Some(host.to_string())
    }
}
