use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Represents a cookie.
/// Modeled after Chromium's `net::CanonicalCookie`.
///
/// This is the record carried by authoritative change notifications as well
/// as the unit stored in the in-memory mirror.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalCookie {
    pub name: String,
    pub value: String,
    pub domain: String,
    pub path: String,
    pub creation_time: OffsetDateTime,
    pub expiration_time: Option<OffsetDateTime>,
    pub last_access_time: OffsetDateTime,
    pub secure: bool,
    pub http_only: bool,
    pub host_only: bool,
    pub same_site: SameSite,
    pub priority: CookiePriority,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SameSite {
    Unspecified,
    NoRestriction,
    Lax,
    Strict,
}

impl From<cookie::SameSite> for SameSite {
    fn from(value: cookie::SameSite) -> Self {
        match value {
            cookie::SameSite::Lax => SameSite::Lax,
            cookie::SameSite::Strict => SameSite::Strict,
            cookie::SameSite::None => SameSite::NoRestriction,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CookiePriority {
    Low,
    Medium,
    High,
}

impl CanonicalCookie {
    /// Create a host-only session cookie with default attributes.
    pub fn new(
        name: impl Into<String>,
        value: impl Into<String>,
        domain: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            name: name.into(),
            value: value.into(),
            domain: domain.into(),
            path: path.into(),
            creation_time: now,
            expiration_time: None,
            last_access_time: now,
            secure: false,
            http_only: false,
            host_only: true,
            same_site: SameSite::Unspecified,
            priority: CookiePriority::Medium,
        }
    }

    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    pub fn with_http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }

    pub fn with_same_site(mut self, same_site: SameSite) -> Self {
        self.same_site = same_site;
        self
    }

    pub fn with_expiration(mut self, expiration_time: Option<OffsetDateTime>) -> Self {
        self.expiration_time = expiration_time;
        self
    }

    /// Mark as a domain cookie (sent to subdomains too).
    pub fn with_domain_scope(mut self) -> Self {
        self.host_only = false;
        self
    }

    pub fn is_expired(&self, current_time: OffsetDateTime) -> bool {
        match self.expiration_time {
            Some(expiry) => expiry <= current_time,
            None => false,
        }
    }

    /// Two cookies are equivalent when a write of one replaces the other.
    pub fn is_equivalent(&self, other: &CanonicalCookie) -> bool {
        self.name == other.name
            && self.path == other.path
            && self.domain.eq_ignore_ascii_case(&other.domain)
    }

    /// The `name=value` form used in a `Cookie` header or `document.cookie`.
    /// Nameless cookies serialize as just their value.
    pub fn header_pair(&self) -> String {
        if self.name.is_empty() {
            self.value.clone()
        } else {
            format!("{}={}", self.name, self.value)
        }
    }

    /// Validate __Secure- and __Host- cookie prefixes per RFC 6265bis.
    /// - __Secure- cookies MUST have the Secure attribute
    /// - __Host- cookies MUST have Secure, Path="/", and no Domain attribute
    pub fn validate_prefix(
        &self,
        secure_origin: bool,
    ) -> Result<(), crate::base::neterror::NetError> {
        use crate::base::neterror::NetError;

        if self.name.starts_with("__Secure-") && (!self.secure || !secure_origin) {
            return Err(NetError::CookieInvalidPrefix);
        }

        if self.name.starts_with("__Host-")
            && (!self.secure || self.path != "/" || !self.host_only || !secure_origin)
        {
            return Err(NetError::CookieInvalidPrefix);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::neterror::NetError;

    #[test]
    fn test_header_pair() {
        let c = CanonicalCookie::new("a", "1", "example.com", "/");
        assert_eq!(c.header_pair(), "a=1");

        let nameless = CanonicalCookie::new("", "token", "example.com", "/");
        assert_eq!(nameless.header_pair(), "token");
    }

    #[test]
    fn test_expiry() {
        let now = OffsetDateTime::now_utc();
        let session = CanonicalCookie::new("a", "1", "example.com", "/");
        assert!(!session.is_expired(now));

        let past = session
            .clone()
            .with_expiration(Some(now - time::Duration::hours(1)));
        assert!(past.is_expired(now));
        assert!(!past.is_expired(now - time::Duration::hours(2)));
    }

    #[test]
    fn test_equivalence_ignores_value_and_domain_case() {
        let a = CanonicalCookie::new("sid", "1", "Example.com", "/");
        let b = CanonicalCookie::new("sid", "2", "example.com", "/");
        let c = CanonicalCookie::new("sid", "1", "example.com", "/app");
        assert!(a.is_equivalent(&b));
        assert!(!a.is_equivalent(&c));
    }

    #[test]
    fn test_host_prefix_requires_host_only() {
        let c = CanonicalCookie::new("__Host-id", "1", "example.com", "/")
            .with_secure(true)
            .with_domain_scope();
        assert_eq!(c.validate_prefix(true), Err(NetError::CookieInvalidPrefix));

        let ok = CanonicalCookie::new("__Host-id", "1", "example.com", "/").with_secure(true);
        assert!(ok.validate_prefix(true).is_ok());
        assert_eq!(ok.validate_prefix(false), Err(NetError::CookieInvalidPrefix));
    }

    #[test]
    fn test_secure_prefix() {
        let c = CanonicalCookie::new("__Secure-id", "1", "example.com", "/");
        assert_eq!(c.validate_prefix(true), Err(NetError::CookieInvalidPrefix));
        assert!(c.with_secure(true).validate_prefix(true).is_ok());
    }

    #[test]
    fn test_serde_notification_shape() {
        let c = CanonicalCookie::new("a", "1", "example.com", "/")
            .with_same_site(SameSite::Lax)
            .with_http_only(true);
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["name"], "a");
        assert_eq!(json["same_site"], "Lax");
        assert_eq!(json["http_only"], true);
    }
}
