// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Aggregation across source adapters
//!
//! Fans a search or popular request out to the selected adapters
//! concurrently and collects one result list per site.

use std::collections::BTreeMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use futures::FutureExt;
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, error, info};

use super::config::SearchConfig;
use super::cults3d::Cults3dAdapter;
use super::makerworld::MakerWorldAdapter;
use super::myminifactory::MyMiniFactoryAdapter;
use super::printables::PrintablesAdapter;
use super::provider::SourceAdapter;
use super::thangs::ThangsAdapter;
use super::thingiverse::ThingiverseAdapter;
use super::types::{AggregateMode, NormalizedRecord, SiteResults, SourceId};

/// Aggregate request rejected before any adapter ran
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AggregateError {
    #[error("Search query is required")]
    MissingQuery,
}

/// Fans requests out to the registered source adapters
pub struct Aggregator {
    adapters: BTreeMap<SourceId, Arc<dyn SourceAdapter>>,
    default_limit: usize,
    max_limit: usize,
}

impl Aggregator {
    /// Create an aggregator over the given adapters.
    ///
    /// A later adapter with the same id replaces an earlier one.
    pub fn new(adapters: Vec<Arc<dyn SourceAdapter>>, config: &SearchConfig) -> Self {
        let adapters = adapters.into_iter().map(|a| (a.id(), a)).collect();
        Self {
            adapters,
            default_limit: config.default_limit,
            max_limit: config.max_limit,
        }
    }

    /// Register the six production adapters sharing one HTTP client
    pub fn from_config(config: &SearchConfig, client: Client) -> Self {
        let timeout_ms = config.upstream_timeout_ms();
        let adapters: Vec<Arc<dyn SourceAdapter>> = vec![
            Arc::new(ThingiverseAdapter::new(
                client.clone(),
                config.thingiverse_api_token.clone(),
                timeout_ms,
            )),
            Arc::new(PrintablesAdapter::new(client.clone(), timeout_ms)),
            Arc::new(MakerWorldAdapter::new()),
            Arc::new(Cults3dAdapter::new(client.clone(), timeout_ms)),
            Arc::new(MyMiniFactoryAdapter::new(client.clone(), timeout_ms)),
            Arc::new(ThangsAdapter::new(client, timeout_ms)),
        ];
        debug!("Registered {} source adapters", adapters.len());

        Self::new(adapters, config)
    }

    /// Ids of the registered adapters, in response order
    pub fn sources(&self) -> Vec<SourceId> {
        self.adapters.keys().copied().collect()
    }

    /// Clamp a requested limit to `[1, max_limit]`; zero selects the default
    pub fn effective_limit(&self, limit: usize) -> usize {
        if limit == 0 {
            self.default_limit
        } else {
            limit.min(self.max_limit)
        }
    }

    /// Run every selected adapter concurrently and collect their results
    ///
    /// # Arguments
    /// * `site_ids` - Requested sources; duplicates collapse and ids without
    ///   a registered adapter are skipped
    /// * `mode` - Search with a query, or popular listing
    /// * `limit` - Requested records per source, clamped
    /// * `page` - One-based page, clamped to at least 1
    ///
    /// # Returns
    /// One entry per requested, registered source. Adapter failures (and
    /// panics) show up as empty lists, never as an error.
    pub async fn aggregate(
        &self,
        site_ids: &[SourceId],
        mode: &AggregateMode,
        limit: usize,
        page: usize,
    ) -> Result<SiteResults, AggregateError> {
        if let AggregateMode::Search { query } = mode {
            if query.trim().is_empty() {
                return Err(AggregateError::MissingQuery);
            }
        }

        let limit = self.effective_limit(limit);
        let page = page.max(1);
        let start = Instant::now();

        let mut selected: Vec<(SourceId, &Arc<dyn SourceAdapter>)> = Vec::new();
        for id in site_ids {
            if selected.iter().any(|(seen, _)| seen == id) {
                continue;
            }
            match self.adapters.get(id) {
                Some(adapter) => selected.push((*id, adapter)),
                None => debug!("No adapter registered for {}", id),
            }
        }

        let runs = selected
            .into_iter()
            .map(|(id, adapter)| run_adapter(id, adapter.as_ref(), mode, limit, page));
        let results: SiteResults = futures::future::join_all(runs).await.into_iter().collect();

        let counts: Vec<String> = results
            .iter()
            .map(|(id, records)| format!("{}={}", id, records.len()))
            .collect();
        info!(
            "Aggregation complete ({}): [{}] in {}ms",
            match mode {
                AggregateMode::Search { .. } => "search",
                AggregateMode::Popular => "popular",
            },
            counts.join(", "),
            start.elapsed().as_millis()
        );

        Ok(results)
    }

    /// Deep links to each registered site's own search page
    pub fn search_urls(&self, query: &str) -> BTreeMap<SourceId, String> {
        self.adapters
            .iter()
            .map(|(id, adapter)| (*id, adapter.search_url(query)))
            .collect()
    }
}

async fn run_adapter(
    id: SourceId,
    adapter: &dyn SourceAdapter,
    mode: &AggregateMode,
    limit: usize,
    page: usize,
) -> (SourceId, Vec<NormalizedRecord>) {
    let run = async {
        match mode {
            AggregateMode::Search { query } => adapter.search(query, limit, page).await,
            AggregateMode::Popular => adapter.fetch_popular(limit).await,
        }
    };

    match AssertUnwindSafe(run).catch_unwind().await {
        Ok(records) => (id, records),
        Err(_) => {
            error!("{} adapter panicked, returning no records", id);
            (id, Vec::new())
        }
    }
}
