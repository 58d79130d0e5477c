//! Hand-off of cookie cache work to the owning task.
//!
//! [`DomCookieCache`] has no internal locking. When DOM calls or change
//! notifications originate on other threads, they are queued to the task
//! that owns the cache and applied there one at a time, in arrival order.

use crate::base::neterror::NetError;
use crate::cookies::dom_cache::{CookieLookup, DomCookieCache};
use crate::cookies::events::{CookieChange, CookieChangeObserver};
use crate::cookies::same_site::{FrameId, IncludeSecureCookies, PageId, SameSiteInfo};
use tokio::sync::{mpsc, oneshot};
use url::Url;

/// Default depth of the command queue.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// Work item for the owning task.
#[derive(Debug)]
pub enum CacheCommand {
    CookiesForDom {
        first_party: Url,
        same_site_info: SameSiteInfo,
        url: Url,
        frame_id: FrameId,
        page_id: PageId,
        include_secure: IncludeSecureCookies,
        reply: oneshot::Sender<CookieLookup>,
    },
    SetCookiesFromDom {
        first_party: Url,
        same_site_info: SameSiteInfo,
        url: Url,
        frame_id: FrameId,
        page_id: PageId,
        cookie_string: String,
        reply: oneshot::Sender<Result<(), NetError>>,
    },
    Change(CookieChange),
    ClearForHost(String),
    Clear,
    SetSupported(bool),
}

/// Owns a [`DomCookieCache`] and drains its command queue.
pub struct DomCookieCacheTask {
    cache: DomCookieCache,
    cmd_rx: mpsc::Receiver<CacheCommand>,
}

impl DomCookieCacheTask {
    /// Wrap `cache` with a queue of `capacity` commands.
    pub fn new(cache: DomCookieCache, capacity: usize) -> (Self, DomCookieCacheHandle) {
        let (cmd_tx, cmd_rx) = mpsc::channel(capacity.max(1));
        (Self { cache, cmd_rx }, DomCookieCacheHandle { cmd_tx })
    }

    /// Wrap `cache` with a queue of [`DEFAULT_CHANNEL_CAPACITY`] commands.
    pub fn with_default_capacity(cache: DomCookieCache) -> (Self, DomCookieCacheHandle) {
        Self::new(cache, DEFAULT_CHANNEL_CAPACITY)
    }

    /// Process commands until every handle is dropped, then give the cache back.
    pub async fn run(mut self) -> DomCookieCache {
        while let Some(cmd) = self.cmd_rx.recv().await {
            self.handle_command(cmd);
        }
        tracing::debug!("cookie cache task stopped");
        self.cache
    }

    fn handle_command(&mut self, cmd: CacheCommand) {
        match cmd {
            CacheCommand::CookiesForDom {
                first_party,
                same_site_info,
                url,
                frame_id,
                page_id,
                include_secure,
                reply,
            } => {
                let lookup = self.cache.cookies_for_dom(
                    &first_party,
                    &same_site_info,
                    &url,
                    frame_id,
                    page_id,
                    include_secure,
                );
                // Caller may have gone away
                let _ = reply.send(lookup);
            }
            CacheCommand::SetCookiesFromDom {
                first_party,
                same_site_info,
                url,
                frame_id,
                page_id,
                cookie_string,
                reply,
            } => {
                let result = self.cache.set_cookies_from_dom(
                    &first_party,
                    &same_site_info,
                    &url,
                    frame_id,
                    page_id,
                    &cookie_string,
                );
                // Caller may have gone away
                let _ = reply.send(result);
            }
            CacheCommand::Change(change) => self.cache.apply(&change),
            CacheCommand::ClearForHost(host) => self.cache.clear_for_host(&host),
            CacheCommand::Clear => self.cache.clear(),
            CacheCommand::SetSupported(supported) => self.cache.set_supported(supported),
        }
    }
}

/// Cloneable sender side for a [`DomCookieCacheTask`].
#[derive(Clone)]
pub struct DomCookieCacheHandle {
    cmd_tx: mpsc::Sender<CacheCommand>,
}

impl DomCookieCacheHandle {
    async fn send(&self, cmd: CacheCommand) -> Result<(), NetError> {
        self.cmd_tx
            .send(cmd)
            .await
            .map_err(|_| NetError::CookieCacheClosed)
    }

    pub async fn cookies_for_dom(
        &self,
        first_party: Url,
        same_site_info: SameSiteInfo,
        url: Url,
        frame_id: FrameId,
        page_id: PageId,
        include_secure: IncludeSecureCookies,
    ) -> Result<CookieLookup, NetError> {
        let (reply, rx) = oneshot::channel();
        self.send(CacheCommand::CookiesForDom {
            first_party,
            same_site_info,
            url,
            frame_id,
            page_id,
            include_secure,
            reply,
        })
        .await?;
        rx.await.map_err(|_| NetError::CookieCacheClosed)
    }

    pub async fn set_cookies_from_dom(
        &self,
        first_party: Url,
        same_site_info: SameSiteInfo,
        url: Url,
        frame_id: FrameId,
        page_id: PageId,
        cookie_string: impl Into<String>,
    ) -> Result<(), NetError> {
        let (reply, rx) = oneshot::channel();
        self.send(CacheCommand::SetCookiesFromDom {
            first_party,
            same_site_info,
            url,
            frame_id,
            page_id,
            cookie_string: cookie_string.into(),
            reply,
        })
        .await?;
        rx.await.map_err(|_| NetError::CookieCacheClosed)?
    }

    /// Queue an authoritative change notification.
    pub async fn notify(&self, change: CookieChange) -> Result<(), NetError> {
        self.send(CacheCommand::Change(change)).await
    }

    /// Queue a notification without waiting, for callers outside async code.
    pub fn try_notify(&self, change: CookieChange) -> Result<(), NetError> {
        self.cmd_tx
            .try_send(CacheCommand::Change(change))
            .map_err(|e| match e {
                mpsc::error::TrySendError::Closed(_) => NetError::CookieCacheClosed,
                mpsc::error::TrySendError::Full(_) => NetError::CookieCacheQueueFull,
            })
    }

    pub async fn clear_for_host(&self, host: impl Into<String>) -> Result<(), NetError> {
        self.send(CacheCommand::ClearForHost(host.into())).await
    }

    pub async fn clear(&self) -> Result<(), NetError> {
        self.send(CacheCommand::Clear).await
    }

    pub async fn set_supported(&self, supported: bool) -> Result<(), NetError> {
        self.send(CacheCommand::SetSupported(supported)).await
    }
}
