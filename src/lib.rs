//! # domcookies
//!
//! A per-page DOM cookie cache with Chromium-style cookie semantics.
//!
//! `domcookies` lets a rendering context answer `document.cookie` reads and
//! writes for a bounded set of hosts without a round trip to the
//! authoritative cookie store, while applying that store's change
//! notifications as they arrive.
//!
//! ## Features
//!
//! - **Host-scoped mirror**: only hosts the page wrote to (or fetched) are cached
//! - **Notification filtering**: changes for untracked hosts never create state
//! - **Bounded memory**: least-recently-used hosts are evicted past a fixed count
//! - **Cookie semantics**: RFC 6265 matching, `Secure`, `HttpOnly`, SameSite, prefixes
//! - **Owner hand-off**: optional tokio queue for cross-thread delivery
//!
//! ## Quick Start
//!
//! ```rust
//! use domcookies::cookies::dom_cache::DomCookieCache;
//! use domcookies::cookies::same_site::{FrameId, IncludeSecureCookies, PageId, SameSiteInfo};
//! use url::Url;
//!
//! let mut cache = DomCookieCache::default();
//! let url = Url::parse("https://example.com/").unwrap();
//! let info = SameSiteInfo::same_site();
//!
//! cache.set_cookies_from_dom(&url, &info, &url, FrameId(1), PageId(1), "a=1").unwrap();
//! let cookies = cache
//!     .cookies_for_dom(&url, &info, &url, FrameId(1), PageId(1), IncludeSecureCookies::Yes)
//!     .into_cached();
//! assert_eq!(cookies.as_deref(), Some("a=1"));
//! ```
//!
//! ## Modules
//!
//! - [`base`] - Error definitions
//! - [`cookies`] - The DOM cookie cache, cookie jar, and notification types
//!
//! ## Security
//!
//! A host's cookies are only ever served while that host is tracked, and
//! cookies are bucketed per tracked host so eviction of one host never
//! changes answers for another. HttpOnly cookies are never exposed to or
//! writable from the DOM, and `Domain=` attributes naming a public suffix
//! are rejected.

pub mod base;
pub mod cookies;
