//! Resolver configuration.

use serde::{Deserialize, Serialize};

/// Query behaviour settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Reuse the materialized access closure across calls while the store
    /// revision is unchanged.
    pub cache_closure: bool,
}

impl ResolverConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `ACL_CACHE_CLOSURE`: Cache the access closure between calls (default: false)
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            cache_closure: std::env::var("ACL_CACHE_CLOSURE")
                .map(|s| s == "true" || s == "1")
                .unwrap_or(default.cache_closure),
        }
    }

    /// Enable or disable the closure cache.
    pub fn with_closure_cache(mut self, enabled: bool) -> Self {
        self.cache_closure = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ResolverConfig::default();
        assert!(!config.cache_closure);
        assert!(config.with_closure_cache(true).cache_closure);
    }
}
