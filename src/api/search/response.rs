// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Search API response types

use serde::{Deserialize, Serialize};

use crate::search::{NormalizedRecord, SiteResults, SourceId};

/// Response body for GET /api/search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchApiResponse {
    /// Effective page
    pub page: usize,
    /// Effective per-site limit
    pub limit: usize,
    /// Records per site, one entry per requested site
    pub results: SiteResults,
}

/// Response body for GET /api/search/:site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteSearchResponse {
    pub site: SourceId,
    pub page: usize,
    pub results: Vec<NormalizedRecord>,
}
