use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
pub enum NetError {
    // URL Errors
    #[error("Invalid URL")]
    InvalidUrl,

    // Cookie Errors
    #[error("Cookie prefix validation failed")]
    CookieInvalidPrefix,
    #[error("Cookie domain is a public suffix")]
    CookiePublicSuffix,
    #[error("Cookie domain does not match the request host")]
    CookieDomainMismatch,
    #[error("Cookie line could not be parsed")]
    CookieParseFailed,
    #[error("HttpOnly cookie cannot be written from the DOM")]
    CookieHttpOnlyFromDom,
    #[error("Secure cookie cannot be written from an insecure URL")]
    CookieSecureFromInsecure,
    #[error("SameSite cookie cannot be written from a cross-site context")]
    CookieSameSiteMismatch,

    // DOM cookie cache errors
    #[error("DOM cookie cache is not supported in this context")]
    CookieCacheUnsupported,
    #[error("DOM cookie cache owner has shut down")]
    CookieCacheClosed,
    #[error("Authoritative cookie store unavailable")]
    CookieAuthorityUnavailable,
    #[error("DOM cookie cache command queue is full")]
    CookieCacheQueueFull,

    #[error("Unknown error: {0}")]
    Unknown(i32),
}

impl NetError {
    pub fn as_i32(&self) -> i32 {
        match self {
            NetError::InvalidUrl => -300,
            // Cookie errors (custom codes starting at -10100)
            NetError::CookieInvalidPrefix => -10100,
            NetError::CookiePublicSuffix => -10101,
            NetError::CookieDomainMismatch => -10102,
            NetError::CookieParseFailed => -10103,
            NetError::CookieHttpOnlyFromDom => -10104,
            NetError::CookieSecureFromInsecure => -10105,
            NetError::CookieSameSiteMismatch => -10106,
            // Cache errors
            NetError::CookieCacheUnsupported => -10200,
            NetError::CookieCacheClosed => -10201,
            NetError::CookieAuthorityUnavailable => -10202,
            NetError::CookieCacheQueueFull => -10203,
            NetError::Unknown(code) => *code,
        }
    }

    /// Whether the error is a per-cookie rejection rather than a cache-level failure.
    pub fn is_cookie_rejection(&self) -> bool {
        (-10199..=-10100).contains(&self.as_i32())
    }
}

impl From<i32> for NetError {
    fn from(code: i32) -> Self {
        match code {
            -300 => NetError::InvalidUrl,
            -10100 => NetError::CookieInvalidPrefix,
            -10101 => NetError::CookiePublicSuffix,
            -10102 => NetError::CookieDomainMismatch,
            -10103 => NetError::CookieParseFailed,
            -10104 => NetError::CookieHttpOnlyFromDom,
            -10105 => NetError::CookieSecureFromInsecure,
            -10106 => NetError::CookieSameSiteMismatch,
            -10200 => NetError::CookieCacheUnsupported,
            -10201 => NetError::CookieCacheClosed,
            -10202 => NetError::CookieAuthorityUnavailable,
            -10203 => NetError::CookieCacheQueueFull,
            _ => NetError::Unknown(code),
        }
    }
}
