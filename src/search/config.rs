// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Configuration for source adapters and the popular-results cache

use std::env;

/// Configuration for searching the model sites
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Thingiverse API token; enables the REST API strategy
    pub thingiverse_api_token: Option<String>,
    /// Per outbound request timeout in seconds
    pub upstream_timeout_secs: u64,
    /// Popular-results cache TTL in seconds
    pub popular_cache_ttl_secs: u64,
    /// Number of results when the caller gives none
    pub default_limit: usize,
    /// Hard cap on results per source
    pub max_limit: usize,
}

impl SearchConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            thingiverse_api_token: env::var("THINGIVERSE_API_TOKEN")
                .ok()
                .filter(|t| !t.trim().is_empty()),
            upstream_timeout_secs: env::var("UPSTREAM_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.upstream_timeout_secs),
            popular_cache_ttl_secs: env::var("POPULAR_CACHE_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.popular_cache_ttl_secs),
            ..defaults
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.upstream_timeout_secs == 0 {
            return Err("Upstream timeout must be greater than 0".to_string());
        }
        if self.popular_cache_ttl_secs == 0 {
            return Err("Popular cache TTL must be greater than 0".to_string());
        }
        if self.default_limit == 0 || self.default_limit > self.max_limit {
            return Err("Default limit must be between 1 and the max limit".to_string());
        }
        Ok(())
    }

    pub fn upstream_timeout_ms(&self) -> u64 {
        self.upstream_timeout_secs * 1000
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            thingiverse_api_token: None,
            upstream_timeout_secs: 20,
            popular_cache_ttl_secs: 300,
            default_limit: 10,
            max_limit: 20,
        }
    }
}
