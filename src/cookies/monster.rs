//! In-memory cookie jar backing the DOM cookie cache.
//!
//! Cookies are bucketed by the tracked host they were mirrored for, so a
//! host can be dropped as a unit without touching any other bucket. Within a
//! bucket the jar applies the same matching rules the authoritative store
//! does: RFC 6265 domain and path matching, `Secure`, `HttpOnly`, SameSite and
//! expiry.

use crate::base::neterror::NetError;
use crate::cookies::canonical_cookie::{CanonicalCookie, CookiePriority, SameSite};
use crate::cookies::psl;
use crate::cookies::same_site::{is_secure_scheme, IncludeSecureCookies, SameSiteInfo};
use std::collections::HashMap;
use time::{OffsetDateTime, PrimitiveDateTime};
use url::Url;

/// Maximum cookies per host (Chromium's per-domain default).
const MAX_COOKIES_PER_HOST: usize = 50;

/// The mirror cookie jar.
/// Modeled after Chromium's `net::CookieMonster`, reduced to a single owner.
#[derive(Debug, Default)]
pub struct CookieMonster {
    // Map<tracked host, cookies mirrored for that host>
    store: HashMap<String, Vec<CanonicalCookie>>,
}

impl CookieMonster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a cookie in `host`'s bucket.
    ///
    /// An already-expired cookie deletes its equivalent instead, which is how
    /// both `document.cookie` and the authoritative store express deletion.
    pub fn set_cookie(&mut self, host: &str, cookie: CanonicalCookie) {
        if cookie.is_expired(OffsetDateTime::now_utc()) {
            self.delete_cookie(host, &cookie);
            return;
        }

        let entry = self.store.entry(host.to_string()).or_default();
        entry.retain(|c| !c.is_equivalent(&cookie));

        // Enforce per-host limit by evicting the oldest cookie
        while entry.len() >= MAX_COOKIES_PER_HOST {
            let oldest = entry
                .iter()
                .enumerate()
                .min_by_key(|(_, c)| c.creation_time)
                .map(|(i, _)| i);
            match oldest {
                Some(idx) => {
                    entry.remove(idx);
                }
                None => break,
            }
        }

        entry.push(cookie);
    }

    /// Remove the cookie equivalent to `cookie` from `host`'s bucket.
    /// Returns whether anything was removed.
    pub fn delete_cookie(&mut self, host: &str, cookie: &CanonicalCookie) -> bool {
        let Some(entry) = self.store.get_mut(host) else {
            return false;
        };
        let before = entry.len();
        entry.retain(|c| !c.is_equivalent(cookie));
        let removed = entry.len() != before;
        if entry.is_empty() {
            self.store.remove(host);
        }
        removed
    }

    /// Drop every cookie mirrored for the given hosts. Returns the number removed.
    pub fn delete_cookies_for_hosts<'a>(&mut self, hosts: impl IntoIterator<Item = &'a str>) -> usize {
        hosts
            .into_iter()
            .filter_map(|host| self.store.remove(host))
            .map(|cookies| cookies.len())
            .sum()
    }

    /// Clear all cookies.
    pub fn delete_all(&mut self) {
        self.store.clear();
    }

    /// Cookies mirrored for `host`, in insertion order.
    pub fn cookies_for_host(&self, host: &str) -> &[CanonicalCookie] {
        self.store.get(host).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Build the `document.cookie` string for `url` from `host`'s bucket.
    ///
    /// HttpOnly cookies are never visible here. Secure cookies need
    /// `include_secure`, SameSite cookies need a context `same_site_info`
    /// admits, and expired cookies are skipped.
    pub fn cookies_for_dom(
        &self,
        host: &str,
        url: &Url,
        same_site_info: &SameSiteInfo,
        include_secure: IncludeSecureCookies,
    ) -> String {
        let request_host = url.host_str().and_then(psl::normalize_host).unwrap_or_default();
        let now = OffsetDateTime::now_utc();

        let mut matched: Vec<&CanonicalCookie> = self
            .cookies_for_host(host)
            .iter()
            .filter(|c| !c.http_only)
            .filter(|c| Self::domain_matches(&c.domain, &request_host, c.host_only))
            .filter(|c| Self::path_matches(&c.path, url.path()))
            .filter(|c| !c.secure || include_secure == IncludeSecureCookies::Yes)
            .filter(|c| same_site_info.allows_read(c.same_site))
            .filter(|c| !c.is_expired(now))
            .collect();

        // Sort by path length (longest first) then creation time
        matched.sort_by(|a, b| {
            b.path
                .len()
                .cmp(&a.path.len())
                .then_with(|| a.creation_time.cmp(&b.creation_time))
        });

        matched
            .iter()
            .map(|c| c.header_pair())
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Parse a `document.cookie` assignment and store it under `host`.
    pub fn set_cookie_from_dom_line(
        &mut self,
        host: &str,
        url: &Url,
        same_site_info: &SameSiteInfo,
        cookie_line: &str,
    ) -> Result<(), NetError> {
        let cookie = Self::parse_dom_cookie(url, same_site_info, cookie_line)?;

        // Script may not clobber a cookie it cannot see
        let shadows_http_only = self
            .cookies_for_host(host)
            .iter()
            .any(|c| c.http_only && c.is_equivalent(&cookie));
        if shadows_http_only {
            return Err(NetError::CookieHttpOnlyFromDom);
        }

        self.set_cookie(host, cookie);
        Ok(())
    }

    fn parse_dom_cookie(
        url: &Url,
        same_site_info: &SameSiteInfo,
        cookie_line: &str,
    ) -> Result<CanonicalCookie, NetError> {
        let parsed = cookie::Cookie::parse(cookie_line).map_err(|_| NetError::CookieParseFailed)?;
        // Same host form the tracking keys use
        let url_host = url
            .host_str()
            .and_then(psl::normalize_host)
            .ok_or(NetError::InvalidUrl)?;
        let secure_origin = is_secure_scheme(url);
        let now = OffsetDateTime::now_utc();

        if parsed.http_only().unwrap_or(false) {
            return Err(NetError::CookieHttpOnlyFromDom);
        }

        let secure = parsed.secure().unwrap_or(false);
        if secure && !secure_origin {
            return Err(NetError::CookieSecureFromInsecure);
        }

        let (domain, host_only) = match parsed.domain().filter(|d| !d.is_empty()) {
            Some(d) => {
                let d = d.trim_start_matches('.').to_ascii_lowercase();
                if !psl::is_valid_cookie_domain(&d, &url_host) {
                    return Err(if psl::is_public_suffix(&d) {
                        NetError::CookiePublicSuffix
                    } else {
                        NetError::CookieDomainMismatch
                    });
                }
                (d, false)
            }
            None => (url_host, true),
        };

        let path = match parsed.path() {
            Some(p) if p.starts_with('/') => p.to_string(),
            _ => Self::default_path(url),
        };

        // Max-Age wins over Expires. Out-of-range ages clamp to the far future.
        let expiration_time = match parsed.max_age() {
            Some(max_age) => Some(
                now.checked_add(max_age)
                    .unwrap_or_else(|| PrimitiveDateTime::MAX.assume_utc()),
            ),
            None => parsed.expires_datetime(),
        };

        let same_site = parsed
            .same_site()
            .map(SameSite::from)
            .unwrap_or(SameSite::Unspecified);
        if !same_site_info.allows_write(same_site) {
            return Err(NetError::CookieSameSiteMismatch);
        }

        let cookie = CanonicalCookie {
            name: parsed.name().to_string(),
            value: parsed.value().to_string(),
            domain,
            path,
            creation_time: now,
            expiration_time,
            last_access_time: now,
            secure,
            http_only: false,
            host_only,
            same_site,
            priority: CookiePriority::Medium,
        };
        cookie.validate_prefix(secure_origin)?;

        Ok(cookie)
    }

    /// RFC 6265 §5.1.4 default-path: the request path up to (not including)
    /// its last '/', or "/" when that would be empty.
    fn default_path(url: &Url) -> String {
        let path = url.path();
        match path.rfind('/') {
            Some(0) | None => "/".to_string(),
            Some(idx) => path[..idx].to_string(),
        }
    }

    /// Check if cookie domain matches request host.
    /// Implements RFC 6265 domain matching.
    fn domain_matches(cookie_domain: &str, request_host: &str, host_only: bool) -> bool {
        if host_only {
            return cookie_domain.eq_ignore_ascii_case(request_host);
        }

        let cookie_domain = cookie_domain.trim_start_matches('.');
        if request_host.eq_ignore_ascii_case(cookie_domain) {
            return true;
        }

        // request_host must end with ".cookie_domain"
        let (host_len, domain_len) = (request_host.len(), cookie_domain.len());
        host_len > domain_len
            && request_host.is_char_boundary(host_len - domain_len)
            && request_host[host_len - domain_len..].eq_ignore_ascii_case(cookie_domain)
            && request_host.as_bytes()[host_len - domain_len - 1] == b'.'
    }

    /// Check if request path matches cookie path.
    /// Implements RFC 6265 path matching.
    fn path_matches(cookie_path: &str, request_path: &str) -> bool {
        if request_path == cookie_path {
            return true;
        }

        if let Some(rest) = request_path.strip_prefix(cookie_path) {
            return cookie_path.ends_with('/') || rest.starts_with('/');
        }

        false
    }

    /// Get total cookie count.
    pub fn total_cookie_count(&self) -> usize {
        self.store.values().map(Vec::len).sum()
    }

    /// Number of hosts with at least one mirrored cookie.
    pub fn host_count(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    fn read(jar: &CookieMonster, host: &str, u: &str) -> String {
        jar.cookies_for_dom(
            host,
            &url(u),
            &SameSiteInfo::same_site(),
            IncludeSecureCookies::Yes,
        )
    }

    fn write(jar: &mut CookieMonster, u: &str, line: &str) -> Result<(), NetError> {
        let u = url(u);
        let host = u.host_str().unwrap().to_string();
        jar.set_cookie_from_dom_line(&host, &u, &SameSiteInfo::same_site(), line)
    }

    #[test]
    fn test_write_then_read() {
        let mut jar = CookieMonster::new();
        write(&mut jar, "https://example.com/", "a=1").unwrap();
        write(&mut jar, "https://example.com/", "b=2").unwrap();
        assert_eq!(read(&jar, "example.com", "https://example.com/"), "a=1; b=2");
    }

    #[test]
    fn test_overwrite_equivalent() {
        let mut jar = CookieMonster::new();
        write(&mut jar, "https://example.com/", "a=1").unwrap();
        write(&mut jar, "https://example.com/", "a=2").unwrap();
        assert_eq!(jar.total_cookie_count(), 1);
        assert_eq!(read(&jar, "example.com", "https://example.com/"), "a=2");
    }

    #[test]
    fn test_expired_write_deletes() {
        let mut jar = CookieMonster::new();
        write(&mut jar, "https://example.com/", "a=1").unwrap();
        write(&mut jar, "https://example.com/", "a=; Max-Age=0").unwrap();
        assert_eq!(read(&jar, "example.com", "https://example.com/"), "");
        assert!(jar.is_empty());
    }

    #[test]
    fn test_huge_max_age_clamps_to_far_future() {
        let mut jar = CookieMonster::new();
        write(&mut jar, "https://example.com/", "a=1; Max-Age=99999999999999").unwrap();

        let stored = &jar.cookies_for_host("example.com")[0];
        assert_eq!(stored.expiration_time, Some(PrimitiveDateTime::MAX.assume_utc()));
        assert_eq!(read(&jar, "example.com", "https://example.com/"), "a=1");
    }

    #[test]
    fn test_max_age_sets_expiry() {
        let mut jar = CookieMonster::new();
        let before = OffsetDateTime::now_utc();
        write(&mut jar, "https://example.com/", "a=1; Max-Age=3600").unwrap();

        let expiry = jar.cookies_for_host("example.com")[0].expiration_time.unwrap();
        assert!(expiry >= before + time::Duration::seconds(3600));
        assert!(expiry <= OffsetDateTime::now_utc() + time::Duration::seconds(3600));
    }

    #[test]
    fn test_negative_max_age_deletes() {
        let mut jar = CookieMonster::new();
        write(&mut jar, "https://example.com/", "a=1").unwrap();
        write(&mut jar, "https://example.com/", "a=1; Max-Age=-5").unwrap();
        assert!(jar.is_empty());
    }

    #[test]
    fn test_expires_attribute() {
        let mut jar = CookieMonster::new();
        write(&mut jar, "https://example.com/", "a=1; Expires=Wed, 21 Oct 2099 07:28:00 GMT").unwrap();
        let expiry = jar.cookies_for_host("example.com")[0].expiration_time.unwrap();
        assert_eq!(expiry.year(), 2099);
        assert_eq!(read(&jar, "example.com", "https://example.com/"), "a=1");

        write(&mut jar, "https://example.com/", "a=1; Expires=Thu, 01 Jan 1970 00:00:00 GMT").unwrap();
        assert!(jar.is_empty());
    }

    #[test]
    fn test_max_age_wins_over_expires() {
        let mut jar = CookieMonster::new();
        write(
            &mut jar,
            "https://example.com/",
            "a=1; Expires=Thu, 01 Jan 1970 00:00:00 GMT; Max-Age=3600",
        )
        .unwrap();
        assert_eq!(read(&jar, "example.com", "https://example.com/"), "a=1");
    }

    #[test]
    fn test_trailing_dot_host_matches_bare_host() {
        let mut jar = CookieMonster::new();
        let dotted = url("https://Example.COM./");
        jar.set_cookie_from_dom_line("example.com", &dotted, &SameSiteInfo::same_site(), "a=1")
            .unwrap();

        assert_eq!(jar.cookies_for_host("example.com")[0].domain, "example.com");
        assert_eq!(read(&jar, "example.com", "https://example.com/"), "a=1");
        assert_eq!(read(&jar, "example.com", "https://example.com./"), "a=1");
    }

    #[test]
    fn test_path_ordering_and_default_path() {
        let mut jar = CookieMonster::new();
        write(&mut jar, "https://example.com/docs/page", "deep=1").unwrap();
        write(&mut jar, "https://example.com/", "root=1").unwrap();

        // default path of /docs/page is /docs
        assert_eq!(jar.cookies_for_host("example.com")[0].path, "/docs");
        assert_eq!(
            read(&jar, "example.com", "https://example.com/docs/page"),
            "deep=1; root=1"
        );
        assert_eq!(read(&jar, "example.com", "https://example.com/other"), "root=1");
    }

    #[test]
    fn test_path_matches() {
        assert!(CookieMonster::path_matches("/", "/anything"));
        assert!(CookieMonster::path_matches("/foo", "/foo/bar"));
        assert!(!CookieMonster::path_matches("/foo", "/foobar"));
        assert!(CookieMonster::path_matches("/foo/", "/foo/bar"));
    }

    #[test]
    fn test_domain_matches() {
        assert!(CookieMonster::domain_matches("example.com", "a.example.com", false));
        assert!(!CookieMonster::domain_matches("example.com", "a.example.com", true));
        assert!(!CookieMonster::domain_matches("example.com", "badexample.com", false));
        assert!(CookieMonster::domain_matches("Example.com", "example.COM", true));
    }

    #[test]
    fn test_http_only_rules() {
        let mut jar = CookieMonster::new();
        assert_eq!(
            write(&mut jar, "https://example.com/", "a=1; HttpOnly"),
            Err(NetError::CookieHttpOnlyFromDom)
        );

        jar.set_cookie(
            "example.com",
            CanonicalCookie::new("sid", "secret", "example.com", "/").with_http_only(true),
        );
        assert_eq!(read(&jar, "example.com", "https://example.com/"), "");
        assert_eq!(
            write(&mut jar, "https://example.com/", "sid=forged"),
            Err(NetError::CookieHttpOnlyFromDom)
        );
        assert_eq!(jar.cookies_for_host("example.com")[0].value, "secret");
    }

    #[test]
    fn test_secure_rules() {
        let mut jar = CookieMonster::new();
        assert_eq!(
            write(&mut jar, "http://example.com/", "s=1; Secure"),
            Err(NetError::CookieSecureFromInsecure)
        );
        write(&mut jar, "https://example.com/", "s=1; Secure").unwrap();

        let u = url("https://example.com/");
        let hidden = jar.cookies_for_dom(
            "example.com",
            &u,
            &SameSiteInfo::same_site(),
            IncludeSecureCookies::No,
        );
        assert_eq!(hidden, "");
        assert_eq!(read(&jar, "example.com", "https://example.com/"), "s=1");
    }

    #[test]
    fn test_same_site_rules() {
        let mut jar = CookieMonster::new();
        let u = url("https://example.com/");
        assert_eq!(
            jar.set_cookie_from_dom_line("example.com", &u, &SameSiteInfo::cross_site(), "a=1; SameSite=Strict"),
            Err(NetError::CookieSameSiteMismatch)
        );

        write(&mut jar, "https://example.com/", "strict=1; SameSite=Strict").unwrap();
        write(&mut jar, "https://example.com/", "open=1").unwrap();
        let cross = jar.cookies_for_dom(
            "example.com",
            &u,
            &SameSiteInfo::cross_site(),
            IncludeSecureCookies::Yes,
        );
        assert_eq!(cross, "open=1");
    }

    #[test]
    fn test_domain_attribute_validation() {
        let mut jar = CookieMonster::new();
        assert_eq!(
            write(&mut jar, "https://a.example.com/", "x=1; Domain=com"),
            Err(NetError::CookiePublicSuffix)
        );
        assert_eq!(
            write(&mut jar, "https://a.example.com/", "x=1; Domain=other.com"),
            Err(NetError::CookieDomainMismatch)
        );
        write(&mut jar, "https://a.example.com/", "x=1; Domain=example.com").unwrap();
        let stored = &jar.cookies_for_host("a.example.com")[0];
        assert_eq!(stored.domain, "example.com");
        assert!(!stored.host_only);
    }

    #[test]
    fn test_malformed_line_rejected() {
        let mut jar = CookieMonster::new();
        assert_eq!(
            write(&mut jar, "https://example.com/", "no-equals-sign"),
            Err(NetError::CookieParseFailed)
        );
        assert!(jar.is_empty());
    }

    #[test]
    fn test_per_host_limit() {
        let mut jar = CookieMonster::new();
        for i in 0..(MAX_COOKIES_PER_HOST + 10) {
            jar.set_cookie(
                "example.com",
                CanonicalCookie::new(format!("c{}", i), "v", "example.com", "/"),
            );
        }
        assert_eq!(jar.total_cookie_count(), MAX_COOKIES_PER_HOST);
    }

    #[test]
    fn test_host_buckets_are_isolated() {
        let mut jar = CookieMonster::new();
        write(&mut jar, "https://a.example/", "a=1").unwrap();
        write(&mut jar, "https://b.example/", "b=1").unwrap();

        assert_eq!(jar.delete_cookies_for_hosts(["a.example"]), 1);
        assert_eq!(read(&jar, "a.example", "https://a.example/"), "");
        assert_eq!(read(&jar, "b.example", "https://b.example/"), "b=1");
        assert_eq!(jar.host_count(), 1);
    }

    #[test]
    fn test_delete_cookie() {
        let mut jar = CookieMonster::new();
        let c = CanonicalCookie::new("a", "1", "example.com", "/");
        jar.set_cookie("example.com", c.clone());
        assert!(jar.delete_cookie("example.com", &c));
        assert!(!jar.delete_cookie("example.com", &c));
        assert_eq!(jar.host_count(), 0);
    }
}
