// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Printables source adapter
//!
//! Queries the public GraphQL endpoint that backs printables.com.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use super::client::{fetch_json, url_with_query};
use super::extract::{first_array, first_string, JsonFieldMap};
use super::provider::{page_offset, SourceAdapter};
use super::types::{NormalizedRecord, SourceError, SourceId};

const GRAPHQL_URL: &str = "https://api.printables.com/graphql/";
const SITE_URL: &str = "https://www.printables.com";
const MEDIA_URL: &str = "https://media.printables.com/";

const SEARCH_QUERY: &str = r#"query SearchModels($query: String!, $limit: Int!, $offset: Int!) {
  result: searchPrints2(query: $query, printType: "print", limit: $limit, offset: $offset, ordering: best_match) {
    items { id name slug likesCount downloadCount user { publicUsername handle } image { filePath } }
  }
}"#;

const POPULAR_QUERY: &str = r#"query PopularModels($limit: Int!) {
  result: prints(limit: $limit, offset: 0, ordering: "-likes_count") {
    id name slug likesCount downloadCount user { publicUsername handle } image { filePath }
  }
}"#;

/// Largest offset a GraphQL `Int` can carry
const MAX_OFFSET: usize = i32::MAX as usize;

// Links are built from id/slug and the media path, see `item_record`
const FIELDS: JsonFieldMap = JsonFieldMap {
    title: &["name"],
    creator: &["user.publicUsername", "user.handle"],
    thumbnail: &[],
    url: &[],
    likes: &["likesCount", "likes_count"],
    downloads: &["downloadCount", "download_count"],
};

/// Printables adapter (GraphQL)
pub struct PrintablesAdapter {
    client: Client,
    timeout_ms: u64,
}

impl PrintablesAdapter {
    pub fn new(client: Client, timeout_ms: u64) -> Self {
        Self { client, timeout_ms }
    }

    async fn graphql(&self, query: &str, variables: Value) -> Result<Value, SourceError> {
        let request = self
            .client
            .post(GRAPHQL_URL)
            .header("Origin", SITE_URL)
            .json(&json!({ "query": query, "variables": variables }));

        fetch_json(request, self.timeout_ms).await
    }
}

#[async_trait]
impl SourceAdapter for PrintablesAdapter {
    fn id(&self) -> SourceId {
        SourceId::Printables
    }

    async fn try_search(
        &self,
        query: &str,
        limit: usize,
        page: usize,
    ) -> Result<Vec<NormalizedRecord>, SourceError> {
        let offset = page_offset(page, limit);
        if offset > MAX_OFFSET {
            return Ok(Vec::new());
        }
        let payload = self
            .graphql(
                SEARCH_QUERY,
                json!({ "query": query, "limit": limit, "offset": offset }),
            )
            .await?;
        parse_response(&payload)
    }

    async fn try_popular(&self, limit: usize) -> Result<Vec<NormalizedRecord>, SourceError> {
        let payload = self
            .graphql(POPULAR_QUERY, json!({ "limit": limit }))
            .await?;
        parse_response(&payload)
    }

    fn search_url(&self, query: &str) -> String {
        url_with_query("https://www.printables.com/search/models", &[("q", query)])
    }
}

/// Parse a GraphQL response; `errors` without `data` is a failure
fn parse_response(payload: &Value) -> Result<Vec<NormalizedRecord>, SourceError> {
    let items = match first_array(payload, &["data.result.items", "data.result"]) {
        Some(items) => items,
        None => {
            let reason = first_string(payload, &["errors.0.message"])
                .unwrap_or_else(|| "missing data.result".to_string());
            return Err(SourceError::Parse { reason });
        }
    };

    Ok(items.iter().filter_map(item_record).collect())
}

fn item_record(item: &Value) -> Option<NormalizedRecord> {
    let mut draft = FIELDS.draft(item, SITE_URL);

    let id = first_string(item, &["id"])?;
    draft.url = Some(match first_string(item, &["slug"]) {
        Some(slug) => format!("{}/model/{}-{}", SITE_URL, id, slug),
        None => format!("{}/model/{}", SITE_URL, id),
    });
    draft.thumbnail = first_string(item, &["image.filePath"])
        .map(|path| format!("{}{}", MEDIA_URL, path.trim_start_matches('/')));

    draft.finish(SourceId::Printables)
}
