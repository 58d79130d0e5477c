//! The set of hosts mirrored in memory, ordered by recency of use.

use lru::LruCache;
use std::num::NonZeroUsize;

/// Tracked hosts with least-recently-used ordering.
///
/// The set itself is unbounded; [`TrackedHosts::prune`] enforces the
/// capacity so callers decide when eviction happens.
pub struct TrackedHosts {
    hosts: LruCache<String, ()>,
    capacity: NonZeroUsize,
}

impl TrackedHosts {
    /// A capacity of 0 is clamped to 1.
    pub fn new(capacity: usize) -> Self {
        Self {
            hosts: LruCache::unbounded(),
            capacity: NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    /// Membership test that does not count as a use.
    pub fn contains(&self, host: &str) -> bool {
        self.hosts.contains(host)
    }

    /// Add `host` (or refresh it) as the most recently used.
    /// Returns true if it was newly added.
    pub fn enroll(&mut self, host: &str) -> bool {
        if self.hosts.get(host).is_some() {
            return false;
        }
        self.hosts.put(host.to_string(), ());
        true
    }

    /// Mark a tracked host as used. No-op for untracked hosts.
    pub fn touch(&mut self, host: &str) {
        self.hosts.promote(host);
    }

    pub fn remove(&mut self, host: &str) -> bool {
        self.hosts.pop(host).is_some()
    }

    /// Evict least-recently-used hosts until the set fits its capacity.
    /// Returns the evicted hosts, oldest first.
    pub fn prune(&mut self) -> Vec<String> {
        let mut evicted = Vec::new();
        while self.hosts.len() > self.capacity.get() {
            match self.hosts.pop_lru() {
                Some((host, ())) => evicted.push(host),
                None => break,
            }
        }
        evicted
    }

    pub fn clear(&mut self) {
        self.hosts.clear();
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    /// Hosts from most to least recently used.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.hosts.iter().map(|(host, _)| host.as_str())
    }
}
