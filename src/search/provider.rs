// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Source adapter trait definition

use async_trait::async_trait;
use futures::future::BoxFuture;
use tracing::{debug, warn};

use super::types::{NormalizedRecord, SourceError, SourceId};

/// One acquisition strategy of an adapter, not yet started
pub type Attempt<'a> = BoxFuture<'a, Result<Vec<NormalizedRecord>, SourceError>>;

/// Trait implemented by every model site adapter
///
/// Implementors provide the fallible `try_*` operations. Callers use the
/// provided `search` and `fetch_popular`, which never fail: errors are logged
/// and become an empty list, results are truncated to `limit` and stamped
/// with the adapter's id.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Identity of the site this adapter talks to
    fn id(&self) -> SourceId;

    /// Search the site
    ///
    /// # Arguments
    /// * `query` - Free text query
    /// * `limit` - Maximum number of records wanted
    /// * `page` - One-based page number
    async fn try_search(
        &self,
        query: &str,
        limit: usize,
        page: usize,
    ) -> Result<Vec<NormalizedRecord>, SourceError>;

    /// Fetch the site's popular / trending models
    async fn try_popular(&self, limit: usize) -> Result<Vec<NormalizedRecord>, SourceError>;

    /// Direct link to the site's own search page, for client-side fallback
    fn search_url(&self, query: &str) -> String;

    /// Fail-open search
    async fn search(&self, query: &str, limit: usize, page: usize) -> Vec<NormalizedRecord> {
        match self.try_search(query, limit, page).await {
            Ok(records) => conform(self.id(), records, limit),
            Err(e) => {
                warn!("{} search failed for '{}': {}", self.id(), query, e);
                Vec::new()
            }
        }
    }

    /// Fail-open popular listing
    async fn fetch_popular(&self, limit: usize) -> Vec<NormalizedRecord> {
        match self.try_popular(limit).await {
            Ok(records) => conform(self.id(), records, limit),
            Err(e) => {
                warn!("{} popular fetch failed: {}", self.id(), e);
                Vec::new()
            }
        }
    }
}

fn conform(id: SourceId, mut records: Vec<NormalizedRecord>, limit: usize) -> Vec<NormalizedRecord> {
    records.truncate(limit);
    for record in &mut records {
        record.source = id;
    }
    records
}

/// Records to skip for a one-based `page`, saturating instead of overflowing
pub fn page_offset(page: usize, limit: usize) -> usize {
    page.max(1).saturating_sub(1).saturating_mul(limit)
}

/// Run strategies in order until one yields records.
///
/// Errors and empty results fall through to the next strategy. When every
/// strategy comes up empty the last error is returned, or an empty list if
/// none failed outright.
pub async fn first_non_empty(
    source: SourceId,
    attempts: Vec<(&'static str, Attempt<'_>)>,
) -> Result<Vec<NormalizedRecord>, SourceError> {
    let mut last_error = None;

    for (strategy, attempt) in attempts {
        match attempt.await {
            Ok(records) if !records.is_empty() => {
                debug!("{} {} strategy returned {} records", source, strategy, records.len());
                return Ok(records);
            }
            Ok(_) => debug!("{} {} strategy returned no records", source, strategy),
            Err(e) => {
                debug!("{} {} strategy failed: {}, trying next", source, strategy, e);
                last_error = Some(e);
            }
        }
    }

    match last_error {
        Some(e) => Err(e),
        None => Ok(Vec::new()),
    }
}
