// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Search API query parameters
//!
//! Numeric parameters are taken as strings so malformed values fall back to
//! defaults instead of rejecting the request.

use serde::Deserialize;

use crate::api::errors::ApiError;
use crate::search::SourceId;

/// Query string of `/api/search`, `/api/search/:site` and `/api/popular`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    /// Free text query
    pub q: Option<String>,
    /// Comma separated site ids; blank or absent selects every site
    pub sites: Option<String>,
    pub limit: Option<String>,
    pub page: Option<String>,
}

impl SearchParams {
    /// Trimmed, non-empty query
    pub fn query(&self) -> Result<String, ApiError> {
        required(self.q.as_deref(), "q")
    }

    pub fn site_ids(&self) -> Vec<SourceId> {
        SourceId::parse_list(self.sites.as_deref())
    }

    /// Requested limit; 0 means "use the default"
    pub fn requested_limit(&self) -> usize {
        requested_limit(self.limit.as_deref())
    }

    /// One-based page
    pub fn page(&self) -> usize {
        parse_page(self.page.as_deref())
    }
}

/// Query string of `/api/search-urls`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchUrlsParams {
    pub q: Option<String>,
}

/// A required string parameter, trimmed
pub fn required(raw: Option<&str>, name: &str) -> Result<String, ApiError> {
    raw.map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ApiError::MissingParameter(name.to_string()))
}

/// Missing, non-numeric or zero limits yield 0 (the default); negative
/// limits yield 1. The upper clamp is applied by the aggregator.
pub fn requested_limit(raw: Option<&str>) -> usize {
    match raw.and_then(|r| r.trim().parse::<i64>().ok()) {
        None | Some(0) => 0,
        Some(n) if n < 0 => 1,
        Some(n) => usize::try_from(n).unwrap_or(usize::MAX),
    }
}

/// Missing, non-numeric or zero pages yield 1; otherwise `max(page, 1)`
pub fn parse_page(raw: Option<&str>) -> usize {
    match raw.and_then(|r| r.trim().parse::<i64>().ok()) {
        None | Some(0) => 1,
        Some(n) => usize::try_from(n.max(1)).unwrap_or(usize::MAX),
    }
}
