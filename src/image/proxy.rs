// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Caching image proxy
//!
//! Thumbnails from the model sites are fetched server-side with the right
//! referer so browsers can display them, then cached for the TTL.

use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::Arc;

use tracing::{debug, info};
use url::{Host, Url};

use super::config::ImageProxyConfig;
use super::fetcher::ImageFetcher;
use super::referer::referer_for;
use super::types::{CachedImage, ImageProxyError};
use crate::search::cache::{CacheStats, Clock, SystemClock, TtlCache};

/// Image proxy with a TTL cache keyed by URL
pub struct ImageProxy {
    fetcher: Arc<dyn ImageFetcher>,
    cache: TtlCache<String, CachedImage>,
    sweep_threshold: usize,
}

impl ImageProxy {
    pub fn new(fetcher: Arc<dyn ImageFetcher>, config: &ImageProxyConfig) -> Self {
        Self::with_clock(fetcher, config, Arc::new(SystemClock))
    }

    pub fn with_clock(
        fetcher: Arc<dyn ImageFetcher>,
        config: &ImageProxyConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            fetcher,
            cache: TtlCache::with_clock(config.cache_ttl(), clock),
            sweep_threshold: config.sweep_threshold,
        }
    }

    /// Return the image at `raw_url`, from cache when fresh
    ///
    /// # Errors
    /// * `InvalidUrl` - not an absolute http(s) URL, or an internal host
    /// * `Upstream` - the image host answered with a non-success status
    /// * `Timeout` / `Network` - the fetch itself failed
    pub async fn proxy_image(&self, raw_url: &str) -> Result<CachedImage, ImageProxyError> {
        let key = raw_url.trim();
        let url = validate_image_url(key)?;

        if let Some(image) = self.cache.get(key) {
            debug!("Image cache hit for {}", key);
            return Ok(image);
        }

        let referer = url.host_str().map(referer_for).unwrap_or("");
        debug!("Image cache miss for {}, referer '{}'", key, referer);

        let image: CachedImage = self.fetcher.fetch(url.as_str(), referer).await?.into();
        self.cache.put(key.to_string(), image.clone());

        if self.cache.len() > self.sweep_threshold {
            let evicted = self.cache.evict_expired();
            let stats = self.cache.stats();
            info!(
                "Image cache sweep evicted {} entries ({} remaining, {} expired)",
                evicted, stats.total, stats.expired
            );
        }

        Ok(image)
    }

    /// Browser cache lifetime to advertise, matching the cache TTL
    pub fn max_age_secs(&self) -> u64 {
        self.cache.ttl().as_secs()
    }

    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

/// Parse and vet a client supplied image URL.
///
/// Accepts absolute http(s) URLs with a host, excluding loopback, private,
/// link-local and unspecified addresses.
pub fn validate_image_url(raw: &str) -> Result<Url, ImageProxyError> {
    let invalid = |reason: &str| ImageProxyError::InvalidUrl {
        reason: reason.to_string(),
    };

    let raw = raw.trim();
    if raw.is_empty() {
        return Err(invalid("url is required"));
    }

    let url = Url::parse(raw).map_err(|e| invalid(&e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("only http and https URLs are allowed"));
    }

    let internal = match url.host() {
        None => return Err(invalid("url has no host")),
        Some(Host::Domain(domain)) => {
            let domain = domain.to_ascii_lowercase();
            domain == "localhost" || domain.ends_with(".localhost")
        }
        Some(Host::Ipv4(ip)) => is_internal_v4(ip),
        Some(Host::Ipv6(ip)) => is_internal_v6(ip),
    };
    if internal {
        return Err(invalid("internal addresses are not allowed"));
    }

    Ok(url)
}

fn is_internal_v4(ip: Ipv4Addr) -> bool {
    ip.is_loopback() || ip.is_private() || ip.is_link_local() || ip.is_unspecified()
}

fn is_internal_v6(ip: Ipv6Addr) -> bool {
    if let Some(v4) = ip.to_ipv4_mapped() {
        return is_internal_v4(v4);
    }
    let first = ip.segments()[0];
    ip.is_loopback()
        || ip.is_unspecified()
        || (first & 0xfe00) == 0xfc00 // unique local
        || (first & 0xffc0) == 0xfe80 // link-local
}
