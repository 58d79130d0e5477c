//! DOM cookie cache configuration.

use serde::Deserialize;

/// Default bound on mirrored hosts per page.
pub const DEFAULT_MAX_TRACKED_HOSTS: usize = 5;

/// DOM cookie cache configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DomCookieCacheConfig {
    /// Maximum hosts mirrored at once (least recently used are evicted)
    pub max_tracked_hosts: usize,
    /// Platform/policy gate; when false the cache must be bypassed
    pub supported: bool,
}

impl Default for DomCookieCacheConfig {
    fn default() -> Self {
        Self {
            max_tracked_hosts: DEFAULT_MAX_TRACKED_HOSTS,
            supported: true,
        }
    }
}

impl DomCookieCacheConfig {
    /// Create a new config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the tracked host bound. Zero is treated as one.
    pub fn max_tracked_hosts(mut self, max: usize) -> Self {
        self.max_tracked_hosts = max;
        self
    }

    /// Set whether the cache may be used.
    pub fn supported(mut self, supported: bool) -> Self {
        self.supported = supported;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DomCookieCacheConfig::new();
        assert_eq!(config.max_tracked_hosts, 5);
        assert!(config.supported);
    }

    #[test]
    fn test_builder() {
        let config = DomCookieCacheConfig::new()
            .max_tracked_hosts(2)
            .supported(false);
        assert_eq!(config.max_tracked_hosts, 2);
        assert!(!config.supported);
    }

    #[test]
    fn test_deserialize_partial() {
        let config: DomCookieCacheConfig =
            serde_json::from_str(r#"{ "max_tracked_hosts": 12 }"#).unwrap();
        assert_eq!(config.max_tracked_hosts, 12);
        assert!(config.supported);
    }
}
