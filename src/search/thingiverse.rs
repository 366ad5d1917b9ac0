// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Thingiverse source adapter
//!
//! Uses the Thingiverse REST API when an API token is configured and falls
//! back to scraping the public search pages otherwise (or when the API
//! comes back empty).

use async_trait::async_trait;
use futures::FutureExt;
use regex::Regex;
use reqwest::Client;
use serde_json::Value;
use std::sync::OnceLock;

use super::client::{fetch_html, fetch_json, url_with_query};
use super::extract::{first_array, html_records, json_records, HtmlFieldMap, JsonFieldMap};
use super::provider::{first_non_empty, Attempt, SourceAdapter};
use super::types::{NormalizedRecord, SourceError, SourceId};

const API_SEARCH_URL: &str = "https://api.thingiverse.com/search/";
const SITE_URL: &str = "https://www.thingiverse.com";
const SITE_SEARCH_URL: &str = "https://www.thingiverse.com/search";

const API_FIELDS: JsonFieldMap = JsonFieldMap {
    title: &["name", "title"],
    creator: &["creator.name", "creator.first_name", "creator.username"],
    thumbnail: &["thumbnail", "preview_image", "default_image.url"],
    url: &["public_url", "url"],
    likes: &["like_count", "likes"],
    downloads: &["download_count", "collect_count"],
};

const CARD_SELECTORS: &[&str] = &[
    "div[class*='ThingCard__thingCard']",
    "div[class*='ThingCard']",
    "div.thing-card",
    "article",
];

const CARD_FIELDS: HtmlFieldMap = HtmlFieldMap {
    title: &[
        "[class*='ThingCardHeader__cardNameWrapper']",
        "[class*='cardName']",
        ".thing-name",
        "h3",
    ],
    creator: &[
        "[class*='ThingCardHeader__creatorName']",
        "[class*='creatorName']",
        ".creator-name",
    ],
    thumbnail: &[("img", "data-src"), ("img", "src")],
    url: &[("a[href*='/thing:']", "href")],
    likes: &["[class*='likeCount']", "[class*='LikeButton']"],
    downloads: &["[class*='downloadCount']"],
};

fn thing_id_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"/thing:(\d+)").ok())
        .as_ref()
}

/// Thingiverse adapter (REST API with token, HTML scrape otherwise)
pub struct ThingiverseAdapter {
    client: Client,
    api_token: Option<String>,
    timeout_ms: u64,
}

impl ThingiverseAdapter {
    /// Create a new Thingiverse adapter
    ///
    /// # Arguments
    /// * `client` - Shared HTTP client
    /// * `api_token` - Optional API token enabling the REST strategy
    /// * `timeout_ms` - Client timeout, used for error reporting
    pub fn new(client: Client, api_token: Option<String>, timeout_ms: u64) -> Self {
        Self {
            client,
            api_token: api_token.filter(|t| !t.trim().is_empty()),
            timeout_ms,
        }
    }

    /// Whether the REST API strategy is enabled
    pub fn has_api_token(&self) -> bool {
        self.api_token.is_some()
    }

    async fn api(
        &self,
        token: &str,
        term: &str,
        sort: &str,
        limit: usize,
        page: usize,
    ) -> Result<Vec<NormalizedRecord>, SourceError> {
        let url = format!("{}{}", API_SEARCH_URL, urlencode_path(term));
        let per_page = limit.to_string();
        let page = page.to_string();
        let request = self.client.get(url).bearer_auth(token).query(&[
            ("type", "things"),
            ("sort", sort),
            ("per_page", per_page.as_str()),
            ("page", page.as_str()),
        ]);

        let payload = fetch_json(request, self.timeout_ms).await?;
        Ok(parse_api(&payload))
    }

    async fn scrape(
        &self,
        query: Option<&str>,
        sort: &str,
        page: usize,
    ) -> Result<Vec<NormalizedRecord>, SourceError> {
        let page = page.to_string();
        let mut params = vec![("type", "things"), ("sort", sort), ("page", page.as_str())];
        if let Some(q) = query {
            params.insert(0, ("q", q));
        }

        let html = fetch_html(self.client.get(SITE_SEARCH_URL).query(&params), self.timeout_ms).await?;
        Ok(parse_search_html(&html))
    }

    fn attempts<'a>(
        &'a self,
        query: Option<&'a str>,
        sort: &'static str,
        limit: usize,
        page: usize,
    ) -> Vec<(&'static str, Attempt<'a>)> {
        let mut attempts: Vec<(&'static str, Attempt<'a>)> = Vec::new();
        if let Some(token) = self.api_token.as_deref() {
            attempts.push((
                "api",
                self.api(token, query.unwrap_or(""), sort, limit, page).boxed(),
            ));
        }
        attempts.push(("html", self.scrape(query, sort, page).boxed()));
        attempts
    }
}

#[async_trait]
impl SourceAdapter for ThingiverseAdapter {
    fn id(&self) -> SourceId {
        SourceId::Thingiverse
    }

    async fn try_search(
        &self,
        query: &str,
        limit: usize,
        page: usize,
    ) -> Result<Vec<NormalizedRecord>, SourceError> {
        first_non_empty(self.id(), self.attempts(Some(query), "relevant", limit, page)).await
    }

    async fn try_popular(&self, limit: usize) -> Result<Vec<NormalizedRecord>, SourceError> {
        first_non_empty(self.id(), self.attempts(None, "popular", limit, 1)).await
    }

    fn search_url(&self, query: &str) -> String {
        url_with_query(
            SITE_SEARCH_URL,
            &[("q", query), ("type", "things"), ("sort", "relevant")],
        )
    }
}

/// Percent-encode a single path segment
fn urlencode_path(term: &str) -> String {
    url::form_urlencoded::byte_serialize(term.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// Parse a REST API search payload (`{"hits": [...]}` or a bare array)
fn parse_api(payload: &Value) -> Vec<NormalizedRecord> {
    let items = match payload {
        Value::Array(items) => items,
        other => match first_array(other, &["hits", "things", "results"]) {
            Some(items) => items,
            None => return Vec::new(),
        },
    };

    json_records(items, &API_FIELDS, SITE_URL, SourceId::Thingiverse)
        .into_iter()
        .map(canonicalize)
        .collect()
}

/// Parse a rendered search page
fn parse_search_html(html: &str) -> Vec<NormalizedRecord> {
    html_records(html, CARD_SELECTORS, &CARD_FIELDS, SITE_URL, SourceId::Thingiverse)
        .into_iter()
        .map(canonicalize)
        .collect()
}

/// Rewrite thing links to `https://www.thingiverse.com/thing:<id>`
fn canonicalize(mut record: NormalizedRecord) -> NormalizedRecord {
    let canonical = thing_id_pattern()
        .and_then(|pattern| pattern.captures(&record.url))
        .and_then(|c| c.get(1))
        .map(|id| format!("{}/thing:{}", SITE_URL, id.as_str()));

    if let Some(url) = canonical {
        record.url = url;
    }
    record
}
