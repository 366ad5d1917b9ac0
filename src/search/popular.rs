// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Popular-results cache
//!
//! Memoizes popular listings per (site set, limit) so repeated home page
//! loads do not hit the upstream sites.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use super::cache::{CacheStats, Clock, SystemClock, TtlCache};
use super::service::Aggregator;
use super::types::{AggregateMode, SiteResults, SourceId};

/// TTL cache in front of popular-mode aggregation
pub struct PopularCache {
    aggregator: Arc<Aggregator>,
    cache: TtlCache<String, SiteResults>,
}

impl PopularCache {
    pub fn new(aggregator: Arc<Aggregator>, ttl: Duration) -> Self {
        Self::with_clock(aggregator, ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(aggregator: Arc<Aggregator>, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            aggregator,
            cache: TtlCache::with_clock(ttl, clock),
        }
    }

    /// Cached popular listing for the given sites
    ///
    /// A live entry is returned as stored; otherwise the adapters run in
    /// popular mode and the result replaces the entry. Concurrent misses on
    /// the same key may both fetch.
    pub async fn get_or_fetch(&self, site_ids: &[SourceId], limit: usize) -> SiteResults {
        let limit = self.aggregator.effective_limit(limit);
        let key = cache_key(site_ids, limit);

        if let Some(results) = self.cache.get(key.as_str()) {
            debug!("Popular cache hit for {}", key);
            return results;
        }
        debug!("Popular cache miss for {}", key);

        // Popular mode never fails validation
        let results = self
            .aggregator
            .aggregate(site_ids, &AggregateMode::Popular, limit, 1)
            .await
            .unwrap_or_default();

        self.cache.put(key, results.clone());
        results
    }

    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn clear(&self) {
        self.cache.clear();
    }
}

/// `"printables,thingiverse|5"`: sorted, deduplicated ids then the limit
pub fn cache_key(site_ids: &[SourceId], limit: usize) -> String {
    let mut ids: Vec<&str> = site_ids.iter().map(SourceId::as_str).collect();
    ids.sort_unstable();
    ids.dedup();
    format!("{}|{}", ids.join(","), limit)
}
