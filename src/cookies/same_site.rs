//! Request context passed through DOM cookie access.
//!
//! These types are computed by the embedder (same-site policy, frame and page
//! attribution) and handed to the cache as opaque inputs.

use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

use crate::cookies::canonical_cookie::SameSite;

/// Relationship between the requesting document and the first party.
/// Modeled after WebCore's `SameSiteInfo`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SameSiteInfo {
    /// Request URL is same-site with the site for cookies.
    pub is_same_site: bool,
    /// Request is for the top-level document.
    pub is_top_site: bool,
    /// Request method is safe (GET/HEAD); relevant to `SameSite=Lax`.
    pub is_safe_http_method: bool,
}

impl SameSiteInfo {
    /// A same-site, top-level context: every SameSite class is admitted.
    pub fn same_site() -> Self {
        Self {
            is_same_site: true,
            is_top_site: true,
            is_safe_http_method: true,
        }
    }

    /// A fully cross-site subresource context.
    pub fn cross_site() -> Self {
        Self::default()
    }

    /// Whether a cookie with `same_site` may be read in this context.
    pub fn allows_read(&self, same_site: SameSite) -> bool {
        match same_site {
            SameSite::Strict => self.is_same_site,
            SameSite::Lax => self.is_same_site || (self.is_top_site && self.is_safe_http_method),
            SameSite::Unspecified | SameSite::NoRestriction => true,
        }
    }

    /// Whether a cookie with `same_site` may be written in this context.
    pub fn allows_write(&self, same_site: SameSite) -> bool {
        match same_site {
            SameSite::Strict | SameSite::Lax => self.is_same_site,
            SameSite::Unspecified | SameSite::NoRestriction => true,
        }
    }
}

/// Whether `Secure` cookies are eligible for a read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IncludeSecureCookies {
    No,
    Yes,
}

impl IncludeSecureCookies {
    /// Derive the flag from the request URL's scheme.
    pub fn for_url(url: &Url) -> Self {
        if is_secure_scheme(url) {
            IncludeSecureCookies::Yes
        } else {
            IncludeSecureCookies::No
        }
    }
}

impl From<bool> for IncludeSecureCookies {
    fn from(include: bool) -> Self {
        if include {
            IncludeSecureCookies::Yes
        } else {
            IncludeSecureCookies::No
        }
    }
}

pub(crate) fn is_secure_scheme(url: &Url) -> bool {
    matches!(url.scheme(), "https" | "wss")
}

/// Opaque frame identifier, passed through for attribution only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameId(pub u64);

/// Opaque page identifier, passed through for attribution only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageId(pub u64);

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "frame-{}", self.0)
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "page-{}", self.0)
    }
}
