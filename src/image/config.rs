// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Configuration for the image proxy

use std::env;
use std::time::Duration;

/// Image proxy configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageProxyConfig {
    /// Cache TTL in seconds
    pub cache_ttl_secs: u64,
    /// Cache size above which expired entries are swept after an insert
    pub sweep_threshold: usize,
}

impl ImageProxyConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            cache_ttl_secs: env::var("IMAGE_CACHE_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.cache_ttl_secs),
            sweep_threshold: env::var("IMAGE_CACHE_SWEEP_THRESHOLD")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.sweep_threshold),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.cache_ttl_secs == 0 {
            return Err("Image cache TTL must be greater than 0".to_string());
        }
        Ok(())
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

impl Default for ImageProxyConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: 1800,
            sweep_threshold: 100,
        }
    }
}
