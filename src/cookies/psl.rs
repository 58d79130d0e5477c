//! Host normalization and Public Suffix List (PSL) validation.
//!
//! Tracked hosts are compared as exact, case-normalized strings, so every
//! host that enters the cache goes through [`normalize_host`] first.
//!
//! `Domain=` attributes written from the DOM are rejected when they name a
//! public suffix like `.com` or `.co.uk` (supercookie protection), using
//! Mozilla's Public Suffix List via the `psl` crate.

use psl::{List, Psl};

/// Normalize a host for use as a tracking key.
///
/// Lowercases ASCII and strips a single trailing dot, so `Example.COM.` and
/// `example.com` name the same tracked host. Returns `None` for an empty host.
pub fn normalize_host(host: &str) -> Option<String> {
    let host = host.strip_suffix('.').unwrap_or(host);
    if host.is_empty() {
        return None;
    }
    Some(host.to_ascii_lowercase())
}

/// Check if a domain is a public suffix (e.g., "com", "co.uk").
pub fn is_public_suffix(domain: &str) -> bool {
    let domain = domain.to_ascii_lowercase();
    match List.suffix(domain.as_bytes()) {
        Some(suffix) => suffix.as_bytes() == domain.as_bytes(),
        // Unknown TLD: nothing to compare against
        None => false,
    }
}

/// Check whether a `Domain=` attribute may be set from `url_host`.
///
/// The cookie domain must be the host itself or one of its parents, and must
/// not be a public suffix (unless it is exactly the host, as for a private
/// registry entry addressed directly).
pub fn is_valid_cookie_domain(cookie_domain: &str, url_host: &str) -> bool {
    let cookie_domain = cookie_domain
        .strip_prefix('.')
        .unwrap_or(cookie_domain)
        .to_ascii_lowercase();
    let url_host = url_host.to_ascii_lowercase();

    if is_public_suffix(&cookie_domain) {
        return false;
    }

    url_host == cookie_domain || url_host.ends_with(&format!(".{}", cookie_domain))
}
