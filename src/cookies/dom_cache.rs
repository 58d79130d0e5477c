//! Per-page DOM cookie cache.
//!
//! Answers `document.cookie` reads and writes for a bounded set of hosts
//! without a round trip to the authoritative cookie store, while applying the
//! store's change notifications for those hosts as they arrive.
//!
//! # Model
//!
//! - **Tracked hosts**: hosts mirrored in memory. A host is enrolled by its
//!   first DOM write (or by a read-through fetch), and leaves only through
//!   eviction, [`DomCookieCache::clear_for_host`] or [`DomCookieCache::clear`].
//! - **Mirror store**: a [`CookieMonster`] created on first use and destroyed
//!   by `clear()`. It only ever holds cookies for tracked hosts.
//! - **Notifications**: [`CookieChangeObserver`] calls for untracked hosts are
//!   dropped, so passive traffic never grows the cache.
//! - **Pruning**: after any enrollment, least-recently-used hosts are evicted
//!   until at most `max_tracked_hosts` remain.
//!
//! The cache is owned by a single page context and is not internally
//! synchronized. See [`crate::cookies::dispatch`] for handing work to the
//! owner from other threads.
//!
//! # Example
//!
//! ```rust
//! use domcookies::cookies::dom_cache::{CookieLookup, DomCookieCache};
//! use domcookies::cookies::same_site::{FrameId, IncludeSecureCookies, PageId, SameSiteInfo};
//! use url::Url;
//!
//! let mut cache = DomCookieCache::default();
//! let url = Url::parse("https://example.com/").unwrap();
//! let info = SameSiteInfo::same_site();
//!
//! cache
//!     .set_cookies_from_dom(&url, &info, &url, FrameId(1), PageId(1), "a=1")
//!     .unwrap();
//! let lookup = cache.cookies_for_dom(&url, &info, &url, FrameId(1), PageId(1), IncludeSecureCookies::Yes);
//! assert_eq!(lookup, CookieLookup::Cached("a=1".to_string()));
//! ```

use crate::base::neterror::NetError;
use crate::cookies::authority::CookieAuthority;
use crate::cookies::canonical_cookie::CanonicalCookie;
use crate::cookies::config::DomCookieCacheConfig;
use crate::cookies::events::CookieChangeObserver;
use crate::cookies::monster::CookieMonster;
use crate::cookies::psl::normalize_host;
use crate::cookies::same_site::{FrameId, IncludeSecureCookies, PageId, SameSiteInfo};
use crate::cookies::tracking::TrackedHosts;
use url::Url;

/// Outcome of a cached `document.cookie` read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CookieLookup {
    /// The host is tracked; this is the cookie string.
    Cached(String),
    /// The host is not mirrored. Ask the authoritative store.
    NotCached,
}

impl CookieLookup {
    pub fn is_cached(&self) -> bool {
        matches!(self, CookieLookup::Cached(_))
    }

    /// The cookie string, if the read was served from the cache.
    pub fn into_cached(self) -> Option<String> {
        match self {
            CookieLookup::Cached(s) => Some(s),
            CookieLookup::NotCached => None,
        }
    }
}

/// Lifecycle of the mirror store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    /// No mirror store exists.
    Uninitialized,
    /// The mirror store exists and at least one host is tracked.
    Active,
}

/// The per-page cookie mirror.
pub struct DomCookieCache {
    config: DomCookieCacheConfig,
    tracked: TrackedHosts,
    store: Option<CookieMonster>,
}

impl Default for DomCookieCache {
    fn default() -> Self {
        Self::new(DomCookieCacheConfig::default())
    }
}

impl DomCookieCache {
    pub fn new(config: DomCookieCacheConfig) -> Self {
        Self {
            tracked: TrackedHosts::new(config.max_tracked_hosts),
            config,
            store: None,
        }
    }

    pub fn config(&self) -> &DomCookieCacheConfig {
        &self.config
    }

    /// Whether the cache may be used at all in this context.
    pub fn is_supported(&self) -> bool {
        self.config.supported
    }

    /// Re-evaluate the platform gate. Losing support drops all cached state.
    pub fn set_supported(&mut self, supported: bool) {
        if self.config.supported && !supported {
            self.clear();
        }
        self.config.supported = supported;
    }

    /// Serve a `document.cookie` read from the mirror.
    ///
    /// Returns [`CookieLookup::NotCached`] for untracked hosts; no call is made
    /// to the authoritative store.
    pub fn cookies_for_dom(
        &mut self,
        first_party: &Url,
        same_site_info: &SameSiteInfo,
        url: &Url,
        frame_id: FrameId,
        page_id: PageId,
        include_secure: IncludeSecureCookies,
    ) -> CookieLookup {
        if !self.is_supported() {
            tracing::warn!(url = %url, "cookies_for_dom called on unsupported cookie cache");
            return CookieLookup::NotCached;
        }

        let Some(host) = url.host_str().and_then(normalize_host) else {
            return CookieLookup::NotCached;
        };
        if !self.tracked.contains(&host) {
            tracing::debug!(host = %host, frame = %frame_id, page = %page_id, "cookie cache miss");
            return CookieLookup::NotCached;
        }

        self.tracked.touch(&host);
        tracing::debug!(
            host = %host,
            first_party = %first_party,
            frame = %frame_id,
            page = %page_id,
            "cookie cache hit"
        );
        CookieLookup::Cached(self.read(&host, url, same_site_info, include_secure))
    }

    /// Like [`cookies_for_dom`](Self::cookies_for_dom), but populates the
    /// mirror from `authority` when the host is not tracked yet.
    ///
    /// On authority failure nothing is enrolled and the error is returned.
    #[allow(clippy::too_many_arguments)]
    pub fn cookies_for_dom_or_fetch<A: CookieAuthority + ?Sized>(
        &mut self,
        authority: &A,
        first_party: &Url,
        same_site_info: &SameSiteInfo,
        url: &Url,
        frame_id: FrameId,
        page_id: PageId,
        include_secure: IncludeSecureCookies,
    ) -> Result<String, NetError> {
        let lookup = self.cookies_for_dom(
            first_party,
            same_site_info,
            url,
            frame_id,
            page_id,
            include_secure,
        );
        if let CookieLookup::Cached(cookies) = lookup {
            return Ok(cookies);
        }
        if !self.is_supported() {
            return Err(NetError::CookieCacheUnsupported);
        }

        let host = url
            .host_str()
            .and_then(normalize_host)
            .ok_or(NetError::InvalidUrl)?;
        let cookies = authority.cookies_for_host(&host)?;
        tracing::debug!(host = %host, count = cookies.len(), "populating cookie cache from authority");

        self.enroll(&host);
        let store = self.in_memory_store();
        for cookie in cookies {
            store.set_cookie(&host, cookie);
        }
        self.prune_cache_if_necessary();

        Ok(self.read(&host, url, same_site_info, include_secure))
    }

    /// Apply a `document.cookie` assignment, enrolling the host if needed.
    ///
    /// Cookie lines the mirror rejects (bad syntax, HttpOnly, cross-site
    /// SameSite, ...) are dropped silently as in a browser; the host stays
    /// enrolled either way.
    pub fn set_cookies_from_dom(
        &mut self,
        first_party: &Url,
        same_site_info: &SameSiteInfo,
        url: &Url,
        frame_id: FrameId,
        page_id: PageId,
        cookie_string: &str,
    ) -> Result<(), NetError> {
        if !self.is_supported() {
            tracing::warn!(url = %url, "set_cookies_from_dom called on unsupported cookie cache");
            return Err(NetError::CookieCacheUnsupported);
        }

        let host = url
            .host_str()
            .and_then(normalize_host)
            .ok_or(NetError::InvalidUrl)?;

        self.enroll(&host);
        if let Err(e) =
            self.in_memory_store()
                .set_cookie_from_dom_line(&host, url, same_site_info, cookie_string)
        {
            tracing::debug!(
                host = %host,
                first_party = %first_party,
                frame = %frame_id,
                page = %page_id,
                error = %e,
                "DOM cookie write rejected"
            );
        }

        self.prune_cache_if_necessary();
        Ok(())
    }

    /// Destroy the mirror store and forget every tracked host.
    pub fn clear(&mut self) {
        if self.store.take().is_some() {
            tracing::debug!("cookie cache store destroyed");
        }
        self.tracked.clear();
    }

    /// Stop mirroring `host` and drop its cookies. Other hosts are untouched.
    pub fn clear_for_host(&mut self, host: &str) {
        let Some(host) = normalize_host(host) else {
            return;
        };
        if !self.tracked.remove(&host) {
            return;
        }
        self.drop_hosts(&[host]);
    }

    pub fn is_tracked(&self, host: &str) -> bool {
        normalize_host(host).is_some_and(|h| self.tracked.contains(&h))
    }

    /// Tracked hosts, most recently used first.
    pub fn tracked_hosts(&self) -> Vec<String> {
        self.tracked.iter().map(str::to_string).collect()
    }

    pub fn tracked_host_count(&self) -> usize {
        self.tracked.len()
    }

    pub fn has_store(&self) -> bool {
        self.store.is_some()
    }

    /// `Active` means a store exists for at least one tracked host. It stays
    /// `Active` with zero cookies after `all_cookies_deleted`, since the
    /// tracked hosts are still answered from the (empty) store.
    pub fn state(&self) -> CacheState {
        if self.store.is_some() && !self.tracked.is_empty() {
            CacheState::Active
        } else {
            CacheState::Uninitialized
        }
    }

    /// Number of cookies currently mirrored across all hosts.
    pub fn cached_cookie_count(&self) -> usize {
        self.store
            .as_ref()
            .map_or(0, CookieMonster::total_cookie_count)
    }

    fn read(
        &self,
        host: &str,
        url: &Url,
        same_site_info: &SameSiteInfo,
        include_secure: IncludeSecureCookies,
    ) -> String {
        self.store
            .as_ref()
            .map(|store| store.cookies_for_dom(host, url, same_site_info, include_secure))
            .unwrap_or_default()
    }

    fn enroll(&mut self, host: &str) {
        if self.tracked.enroll(host) {
            tracing::debug!(host = %host, "tracking host in cookie cache");
        }
    }

    fn in_memory_store(&mut self) -> &mut CookieMonster {
        self.store.get_or_insert_with(|| {
            tracing::debug!("cookie cache store created");
            CookieMonster::new()
        })
    }

    fn prune_cache_if_necessary(&mut self) {
        let evicted = self.tracked.prune();
        if evicted.is_empty() {
            return;
        }
        tracing::debug!(
            evicted = ?evicted,
            capacity = self.tracked.capacity(),
            "pruned cookie cache"
        );
        self.drop_hosts(&evicted);
    }

    fn drop_hosts(&mut self, hosts: &[String]) {
        if let Some(store) = self.store.as_mut() {
            store.delete_cookies_for_hosts(hosts.iter().map(String::as_str));
        }
        if self.tracked.is_empty() {
            self.store = None;
        }
    }

    /// Common entry for notification callbacks: normalized host if it is
    /// tracked and the cache is usable.
    fn tracked_host_for_event(&self, host: &str, kind: &str) -> Option<String> {
        if !self.is_supported() {
            tracing::warn!(host = %host, kind, "cookie notification on unsupported cookie cache");
            return None;
        }
        let host = normalize_host(host)?;
        if !self.tracked.contains(&host) {
            tracing::debug!(host = %host, kind, "ignoring notification for untracked host");
            return None;
        }
        Some(host)
    }
}

impl CookieChangeObserver for DomCookieCache {
    fn cookies_added(&mut self, host: &str, cookies: &[CanonicalCookie]) {
        let Some(host) = self.tracked_host_for_event(host, "added") else {
            return;
        };
        self.tracked.touch(&host);
        let store = self.in_memory_store();
        for cookie in cookies {
            store.set_cookie(&host, cookie.clone());
        }
    }

    fn cookies_deleted(&mut self, host: &str, cookies: &[CanonicalCookie]) {
        let Some(host) = self.tracked_host_for_event(host, "deleted") else {
            return;
        };
        self.tracked.touch(&host);
        if let Some(store) = self.store.as_mut() {
            for cookie in cookies {
                store.delete_cookie(&host, cookie);
            }
        }
    }

    fn all_cookies_deleted(&mut self) {
        if !self.is_supported() {
            tracing::warn!("all_cookies_deleted on unsupported cookie cache");
            return;
        }
        // Tracking survives so later additions are mirrored again. The
        // emptied store is kept and the cache stays Active.
        if let Some(store) = self.store.as_mut() {
            store.delete_all();
        }
    }
}
