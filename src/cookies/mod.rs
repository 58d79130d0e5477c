//! DOM cookie cache and the cookie primitives it is built on.
//!
//! This module provides a per-page mirror of authoritative cookie state:
//!
//! - **Cache**: [`DomCookieCache`](dom_cache::DomCookieCache) answers
//!   `document.cookie` for tracked hosts
//! - **Storage**: In-memory cookie jar ([`CookieMonster`](monster::CookieMonster))
//! - **Notifications**: [`CookieChangeObserver`](events::CookieChangeObserver)
//!   applies authoritative add/delete/clear events
//! - **Read-through**: [`CookieAuthority`](authority::CookieAuthority) populates
//!   the mirror on a miss
//! - **Hand-off**: [`dispatch`] queues work to the owning task
//!
//! # Architecture
//!
//! | Browser component | domcookies (Rust) | Responsibility |
//! |-------------------|-------------------|----------------|
//! | `WebCookieCache` | [`DomCookieCache`](dom_cache::DomCookieCache) | Host-scoped DOM cookie mirror |
//! | `net::CookieMonster` | [`CookieMonster`](monster::CookieMonster) | In-memory cookie jar |
//! | `net::CanonicalCookie` | [`CanonicalCookie`](canonical_cookie::CanonicalCookie) | Single cookie representation |
//! | `SameSiteInfo` | [`SameSiteInfo`](same_site::SameSiteInfo) | Same-site request context |
//!
//! # Mirroring a page's cookies
//!
//! ```rust
//! use domcookies::cookies::canonical_cookie::CanonicalCookie;
//! use domcookies::cookies::dom_cache::{CookieLookup, DomCookieCache};
//! use domcookies::cookies::events::CookieChangeObserver;
//! use domcookies::cookies::same_site::{FrameId, IncludeSecureCookies, PageId, SameSiteInfo};
//! use url::Url;
//!
//! let mut cache = DomCookieCache::default();
//! let url = Url::parse("https://shop.example/cart").unwrap();
//! let info = SameSiteInfo::same_site();
//!
//! cache.set_cookies_from_dom(&url, &info, &url, FrameId(1), PageId(1), "theme=dark")?;
//!
//! // The network layer reports a cookie set by a response.
//! cache.cookies_added(
//!     "shop.example",
//!     &[CanonicalCookie::new("cart", "3", "shop.example", "/")],
//! );
//!
//! let lookup = cache.cookies_for_dom(&url, &info, &url, FrameId(1), PageId(1), IncludeSecureCookies::Yes);
//! assert_eq!(lookup, CookieLookup::Cached("theme=dark; cart=3".to_string()));
//! # Ok::<(), domcookies::base::neterror::NetError>(())
//! ```

pub mod authority;
pub mod canonical_cookie;
pub mod config;
#[cfg(feature = "dispatch")]
pub mod dispatch;
pub mod dom_cache;
pub mod events;
pub mod monster;
pub mod psl;
pub mod same_site;
pub mod tracking;
