// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Thangs source adapter (JSON API)

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use super::client::fetch_json;
use super::extract::{first_array, first_string, JsonFieldMap};
use super::provider::SourceAdapter;
use super::types::{NormalizedRecord, SourceError, SourceId};

const SITE_URL: &str = "https://thangs.com";
const SEARCH_API_URL: &str = "https://thangs.com/api/models/v3/search-by-text";
const TRENDING_API_URL: &str = "https://thangs.com/api/models/trending";

const FIELDS: JsonFieldMap = JsonFieldMap {
    title: &["modelTitle", "name", "title", "fileName"],
    creator: &["ownerUsername", "owner.username", "creator.username", "user.username"],
    thumbnail: &[
        "thumbnailUrl",
        "thumbnail",
        "modelImage",
        "attachments.0.imageUrl",
    ],
    url: &["modelUrl", "url", "publicUrl"],
    likes: &["likesCount", "likes", "likeCount"],
    downloads: &["downloadCount", "downloads"],
};

/// Thangs adapter
pub struct ThangsAdapter {
    client: Client,
    timeout_ms: u64,
}

impl ThangsAdapter {
    pub fn new(client: Client, timeout_ms: u64) -> Self {
        Self { client, timeout_ms }
    }
}

#[async_trait]
impl SourceAdapter for ThangsAdapter {
    fn id(&self) -> SourceId {
        SourceId::Thangs
    }

    async fn try_search(
        &self,
        query: &str,
        limit: usize,
        page: usize,
    ) -> Result<Vec<NormalizedRecord>, SourceError> {
        // Thangs pages are zero-based
        let page = (page.max(1) - 1).to_string();
        let page_size = limit.to_string();
        let request = self.client.get(SEARCH_API_URL).query(&[
            ("searchTerm", query),
            ("page", page.as_str()),
            ("pageSize", page_size.as_str()),
        ]);

        let payload = fetch_json(request, self.timeout_ms).await?;
        Ok(parse_models(&payload))
    }

    async fn try_popular(&self, limit: usize) -> Result<Vec<NormalizedRecord>, SourceError> {
        let page_size = limit.to_string();
        let request = self
            .client
            .get(TRENDING_API_URL)
            .query(&[("page", "0"), ("pageSize", page_size.as_str())]);

        let payload = fetch_json(request, self.timeout_ms).await?;
        Ok(parse_models(&payload))
    }

    fn search_url(&self, query: &str) -> String {
        let path: String = url::form_urlencoded::byte_serialize(query.as_bytes()).collect();
        format!("{}/search/{}?scope=all", SITE_URL, path.replace('+', "%20"))
    }
}

fn parse_models(payload: &Value) -> Vec<NormalizedRecord> {
    let items = match payload {
        Value::Array(items) => items,
        other => match first_array(other, &["results", "data", "models", "items"]) {
            Some(items) => items,
            None => return Vec::new(),
        },
    };

    items.iter().filter_map(model_record).collect()
}

fn model_record(item: &Value) -> Option<NormalizedRecord> {
    let mut draft = FIELDS.draft(item, SITE_URL);
    if draft.url.is_none() {
        draft.url = first_string(item, &["modelId", "id"]).map(|id| format!("{}/m/{}", SITE_URL, id));
    }
    draft.finish(SourceId::Thangs)
}
