// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! MyMiniFactory source adapter
//!
//! Tries the public v2 JSON API first, then falls back to the search page.

use async_trait::async_trait;
use futures::FutureExt;
use reqwest::Client;
use serde_json::Value;

use super::client::{fetch_html, fetch_json, url_with_query};
use super::extract::{first_array, html_records, json_records, HtmlFieldMap, JsonFieldMap};
use super::provider::{first_non_empty, SourceAdapter};
use super::types::{NormalizedRecord, SourceError, SourceId};

const SITE_URL: &str = "https://www.myminifactory.com";
const API_SEARCH_URL: &str = "https://www.myminifactory.com/api/v2/search";
const SITE_SEARCH_URL: &str = "https://www.myminifactory.com/search/";

const API_FIELDS: JsonFieldMap = JsonFieldMap {
    title: &["name", "title"],
    creator: &["designer.name", "designer.username", "owner.username"],
    thumbnail: &[
        "images.0.thumbnail.url",
        "images.0.original.url",
        "images.0.url",
        "thumbnail",
    ],
    url: &["url", "absolute_url", "path"],
    likes: &["likes", "like_count"],
    downloads: &["downloads", "download_count", "views"],
};

const CARD_SELECTORS: &[&str] = &[
    "div.object-card",
    "[class*='ObjectCard']",
    "div[class*='object']",
    "article",
];

const CARD_FIELDS: HtmlFieldMap = HtmlFieldMap {
    title: &[".object-title", "[class*='title']", "h3", "h2"],
    creator: &[".designer-name", "[class*='designer']", "a[href*='/users/']"],
    thumbnail: &[("img", "data-src"), ("img", "src")],
    url: &[("a[href*='/object/']", "href"), ("a", "href")],
    likes: &["[class*='like']"],
    downloads: &["[class*='download']", "[class*='views']"],
};

/// MyMiniFactory adapter (JSON API, HTML fallback)
pub struct MyMiniFactoryAdapter {
    client: Client,
    timeout_ms: u64,
}

impl MyMiniFactoryAdapter {
    pub fn new(client: Client, timeout_ms: u64) -> Self {
        Self { client, timeout_ms }
    }

    async fn api(
        &self,
        query: &str,
        sort: Option<&str>,
        limit: usize,
        page: usize,
    ) -> Result<Vec<NormalizedRecord>, SourceError> {
        let per_page = limit.to_string();
        let page = page.to_string();
        let mut params = vec![
            ("q", query),
            ("per_page", per_page.as_str()),
            ("page", page.as_str()),
        ];
        if let Some(sort) = sort {
            params.push(("sort", sort));
        }

        let payload = fetch_json(self.client.get(API_SEARCH_URL).query(&params), self.timeout_ms).await?;
        Ok(parse_api(&payload))
    }

    async fn scrape(&self, query: &str, page: usize) -> Result<Vec<NormalizedRecord>, SourceError> {
        let page = page.to_string();
        let request = self
            .client
            .get(SITE_SEARCH_URL)
            .query(&[("query", query), ("page", page.as_str())]);

        let html = fetch_html(request, self.timeout_ms).await?;
        Ok(parse_search_html(&html))
    }
}

#[async_trait]
impl SourceAdapter for MyMiniFactoryAdapter {
    fn id(&self) -> SourceId {
        SourceId::Myminifactory
    }

    async fn try_search(
        &self,
        query: &str,
        limit: usize,
        page: usize,
    ) -> Result<Vec<NormalizedRecord>, SourceError> {
        first_non_empty(
            self.id(),
            vec![
                ("api", self.api(query, None, limit, page).boxed()),
                ("html", self.scrape(query, page).boxed()),
            ],
        )
        .await
    }

    async fn try_popular(&self, limit: usize) -> Result<Vec<NormalizedRecord>, SourceError> {
        first_non_empty(
            self.id(),
            vec![
                ("api", self.api("", Some("popularity"), limit, 1).boxed()),
                ("html", self.scrape("", 1).boxed()),
            ],
        )
        .await
    }

    fn search_url(&self, query: &str) -> String {
        url_with_query(SITE_SEARCH_URL, &[("query", query)])
    }
}

fn parse_api(payload: &Value) -> Vec<NormalizedRecord> {
    match first_array(payload, &["items", "objects", "results"]) {
        Some(items) => json_records(items, &API_FIELDS, SITE_URL, SourceId::Myminifactory),
        None => Vec::new(),
    }
}

fn parse_search_html(html: &str) -> Vec<NormalizedRecord> {
    html_records(
        html,
        CARD_SELECTORS,
        &CARD_FIELDS,
        SITE_URL,
        SourceId::Myminifactory,
    )
}
