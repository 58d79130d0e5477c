//! Authoritative cookie change notifications.

use serde::{Deserialize, Serialize};

use crate::cookies::canonical_cookie::CanonicalCookie;

/// A change pushed by the authoritative store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CookieChange {
    Added {
        host: String,
        cookies: Vec<CanonicalCookie>,
    },
    Deleted {
        host: String,
        cookies: Vec<CanonicalCookie>,
    },
    AllDeleted,
}

impl CookieChange {
    /// Host the change is scoped to, if any.
    pub fn host(&self) -> Option<&str> {
        match self {
            CookieChange::Added { host, .. } | CookieChange::Deleted { host, .. } => Some(host),
            CookieChange::AllDeleted => None,
        }
    }
}

/// Receiver of authoritative cookie change notifications.
///
/// Implementations must apply changes for one host in delivery order.
pub trait CookieChangeObserver {
    fn cookies_added(&mut self, host: &str, cookies: &[CanonicalCookie]);
    fn cookies_deleted(&mut self, host: &str, cookies: &[CanonicalCookie]);
    fn all_cookies_deleted(&mut self);

    /// Route a change record to the matching callback.
    fn apply(&mut self, change: &CookieChange) {
        match change {
            CookieChange::Added { host, cookies } => self.cookies_added(host, cookies),
            CookieChange::Deleted { host, cookies } => self.cookies_deleted(host, cookies),
            CookieChange::AllDeleted => self.all_cookies_deleted(),
        }
    }
}
