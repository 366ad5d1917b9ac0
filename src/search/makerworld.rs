// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! MakerWorld source adapter
//!
//! makerworld.com sits behind bot mitigation that rejects server-side
//! requests, so this adapter serves a fixed seed list instead of calling
//! the site. Each seed links to the matching search on MakerWorld.

use async_trait::async_trait;

use super::client::url_with_query;
use super::provider::{page_offset, SourceAdapter};
use super::types::{NormalizedRecord, RecordDraft, SourceError, SourceId};

const SEARCH_URL: &str = "https://makerworld.com/en/search/models";

/// (title, likes, downloads)
const SEEDS: &[(&str, u64, u64)] = &[
    ("Articulated Dragon", 48_200, 310_000),
    ("Flexi Rex", 31_500, 240_000),
    ("Cable Management Clips", 12_800, 95_000),
    ("Gridfinity Baseplate", 22_100, 180_000),
    ("Planetary Gear Fidget", 18_700, 120_000),
    ("Low Poly Pokemon Planter", 9_400, 61_000),
    ("Headphone Stand", 7_900, 52_000),
    ("Phone Stand Adjustable", 11_300, 88_000),
    ("Desk Organizer Modular", 6_800, 47_000),
    ("Spool Holder Universal", 5_600, 39_000),
    ("Print-in-Place Hinge Box", 8_200, 58_000),
    ("Calibration Cube", 4_100, 150_000),
];

/// MakerWorld adapter (static seed list)
#[derive(Debug, Default, Clone, Copy)]
pub struct MakerWorldAdapter;

impl MakerWorldAdapter {
    pub fn new() -> Self {
        Self
    }

    /// Seed records for a one-based page
    fn seeds(limit: usize, page: usize) -> Vec<NormalizedRecord> {
        SEEDS
            .iter()
            .skip(page_offset(page, limit))
            .take(limit)
            .filter_map(|&(title, likes, downloads)| {
                RecordDraft {
                    title: Some(title.to_string()),
                    creator: None,
                    thumbnail: None,
                    url: Some(url_with_query(SEARCH_URL, &[("keyword", title)])),
                    likes: Some(likes),
                    downloads: Some(downloads),
                }
                .finish(SourceId::Makerworld)
            })
            .collect()
    }
}

#[async_trait]
impl SourceAdapter for MakerWorldAdapter {
    fn id(&self) -> SourceId {
        SourceId::Makerworld
    }

    async fn try_search(
        &self,
        _query: &str,
        limit: usize,
        page: usize,
    ) -> Result<Vec<NormalizedRecord>, SourceError> {
        Ok(Self::seeds(limit, page))
    }

    async fn try_popular(&self, limit: usize) -> Result<Vec<NormalizedRecord>, SourceError> {
        Ok(Self::seeds(limit, 1))
    }

    fn search_url(&self, query: &str) -> String {
        url_with_query(SEARCH_URL, &[("keyword", query)])
    }
}
