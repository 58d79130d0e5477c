//! Boundary to the authoritative cookie store.
//!
//! The DOM cache never answers for a host it does not track. Callers that
//! want read-through behavior hand it a [`CookieAuthority`] to populate the
//! mirror from on a miss.

use crate::base::neterror::NetError;
use crate::cookies::canonical_cookie::CanonicalCookie;
use std::collections::HashMap;

/// Source of ground-truth cookies for a host.
pub trait CookieAuthority {
    /// All cookies the DOM of `host` may ever observe.
    fn cookies_for_host(&self, host: &str) -> Result<Vec<CanonicalCookie>, NetError>;
}

impl<F> CookieAuthority for F
where
    F: Fn(&str) -> Result<Vec<CanonicalCookie>, NetError>,
{
    fn cookies_for_host(&self, host: &str) -> Result<Vec<CanonicalCookie>, NetError> {
        self(host)
    }
}

/// Fixed per-host cookie lists, for embedders with a snapshot and for tests.
#[derive(Debug, Default, Clone)]
pub struct StaticCookieAuthority {
    cookies: HashMap<String, Vec<CanonicalCookie>>,
}

impl StaticCookieAuthority {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cookie(mut self, host: &str, cookie: CanonicalCookie) -> Self {
        self.insert(host, cookie);
        self
    }

    pub fn insert(&mut self, host: &str, cookie: CanonicalCookie) {
        self.cookies
            .entry(host.to_ascii_lowercase())
            .or_default()
            .push(cookie);
    }
}

impl CookieAuthority for StaticCookieAuthority {
    fn cookies_for_host(&self, host: &str) -> Result<Vec<CanonicalCookie>, NetError> {
        Ok(self.cookies.get(host).cloned().unwrap_or_default())
    }
}
