// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Cults3D source adapter (HTML scrape)

use async_trait::async_trait;
use reqwest::Client;

use super::client::{fetch_html, url_with_query};
use super::extract::{html_records, HtmlFieldMap};
use super::provider::SourceAdapter;
use super::types::{NormalizedRecord, SourceError, SourceId};

const SITE_URL: &str = "https://cults3d.com";
const SEARCH_URL: &str = "https://cults3d.com/en/search";
const POPULAR_URL: &str = "https://cults3d.com/en/creations/popular";

const CARD_SELECTORS: &[&str] = &[
    "article.crea",
    "div.crea",
    "[data-testid='creation-card']",
    "article",
];

const CARD_FIELDS: HtmlFieldMap = HtmlFieldMap {
    title: &[
        ".crea__title",
        "[class*='title']",
        "h3",
        "h2",
    ],
    creator: &[
        ".crea__author",
        "[class*='author']",
        "a[href*='/users/']",
    ],
    thumbnail: &[
        ("img", "data-src"),
        ("img", "data-srcset"),
        ("img", "srcset"),
        ("img", "src"),
    ],
    url: &[
        ("a[href*='/3d-model/']", "href"),
        ("a.crea__link", "href"),
        ("a", "href"),
    ],
    likes: &["[class*='like']", "[class*='heart']"],
    downloads: &["[class*='download']", "[class*='sales']"],
};

/// Cults3D adapter
pub struct Cults3dAdapter {
    client: Client,
    timeout_ms: u64,
}

impl Cults3dAdapter {
    pub fn new(client: Client, timeout_ms: u64) -> Self {
        Self { client, timeout_ms }
    }
}

#[async_trait]
impl SourceAdapter for Cults3dAdapter {
    fn id(&self) -> SourceId {
        SourceId::Cults3d
    }

    async fn try_search(
        &self,
        query: &str,
        _limit: usize,
        page: usize,
    ) -> Result<Vec<NormalizedRecord>, SourceError> {
        let page = page.to_string();
        let request = self
            .client
            .get(SEARCH_URL)
            .query(&[("q", query), ("page", page.as_str())]);

        let html = fetch_html(request, self.timeout_ms).await?;
        Ok(parse_cards(&html))
    }

    async fn try_popular(&self, _limit: usize) -> Result<Vec<NormalizedRecord>, SourceError> {
        let html = fetch_html(self.client.get(POPULAR_URL), self.timeout_ms).await?;
        Ok(parse_cards(&html))
    }

    fn search_url(&self, query: &str) -> String {
        url_with_query(SEARCH_URL, &[("q", query)])
    }
}

fn parse_cards(html: &str) -> Vec<NormalizedRecord> {
    html_records(html, CARD_SELECTORS, &CARD_FIELDS, SITE_URL, SourceId::Cults3d)
}
