// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Search API endpoint handlers

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use tracing::debug;

use super::request::{required, SearchParams, SearchUrlsParams};
use super::response::{SearchApiResponse, SiteSearchResponse};
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::search::{AggregateMode, SiteResults, SourceId};

/// GET /api/search - Search every selected site
///
/// # Query
/// - `q`: Search query (required)
/// - `sites`: Comma separated site ids (default: all)
/// - `limit`: Records per site (1-20, default 10)
/// - `page`: One-based page (default 1)
///
/// # Errors
/// - 400 Bad Request: `q` missing or blank
pub async fn search_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchApiResponse>, ApiError> {
    let query = params.query()?;
    let sites = params.site_ids();
    let limit = state.aggregator.effective_limit(params.requested_limit());
    let page = params.page();
    debug!("Search '{}' on {:?} (limit {}, page {})", query, sites, limit, page);

    let results = state
        .aggregator
        .aggregate(&sites, &AggregateMode::Search { query }, limit, page)
        .await?;

    Ok(Json(SearchApiResponse {
        page,
        limit,
        results,
    }))
}

/// GET /api/search/:site - Search a single site
///
/// # Errors
/// - 400 Bad Request: unknown site (valid ids listed), or `q` missing
pub async fn site_search_handler(
    State(state): State<Arc<AppState>>,
    Path(site): Path<String>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SiteSearchResponse>, ApiError> {
    let source: SourceId = site.parse().map_err(|_| ApiError::unknown_site(&site))?;
    let query = params.query()?;
    let limit = state.aggregator.effective_limit(params.requested_limit());
    let page = params.page();

    let mut results = state
        .aggregator
        .aggregate(&[source], &AggregateMode::Search { query }, limit, page)
        .await?;

    Ok(Json(SiteSearchResponse {
        site: source,
        page,
        results: results.remove(&source).unwrap_or_default(),
    }))
}

/// GET /api/popular - Cached popular listings per site
pub async fn popular_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Json<SiteResults> {
    let results = state
        .popular
        .get_or_fetch(&params.site_ids(), params.requested_limit())
        .await;
    Json(results)
}

/// GET /api/search-urls - Deep links to each site's own search page
pub async fn search_urls_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchUrlsParams>,
) -> Result<Json<BTreeMap<SourceId, String>>, ApiError> {
    let query = required(params.q.as_deref(), "q")?;
    Ok(Json(state.aggregator.search_urls(&query)))
}
