// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Shared outbound HTTP plumbing for the source adapters

use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;
use std::time::Duration;
use url::Url;

use super::types::SourceError;

/// Realistic browser User-Agent to avoid being blocked
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Build the HTTP client shared by every adapter
pub fn build_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(timeout)
        .user_agent(BROWSER_USER_AGENT)
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()
}

/// Send a request and require a success status
pub async fn send(request: RequestBuilder, timeout_ms: u64) -> Result<Response, SourceError> {
    let response = request
        .send()
        .await
        .map_err(|e| SourceError::from_reqwest(e, timeout_ms))?;

    let status = response.status();
    if !status.is_success() {
        return Err(SourceError::Api {
            status: status.as_u16(),
            message: status
                .canonical_reason()
                .unwrap_or("upstream request failed")
                .to_string(),
        });
    }

    Ok(response)
}

/// Send a request and decode the body as JSON
pub async fn fetch_json(request: RequestBuilder, timeout_ms: u64) -> Result<Value, SourceError> {
    let response = send(request.header("Accept", "application/json"), timeout_ms).await?;
    response.json::<Value>().await.map_err(|e| SourceError::Parse {
        reason: format!("JSON parse error: {}", e),
    })
}

/// Send a request and return the body as text
pub async fn fetch_html(request: RequestBuilder, timeout_ms: u64) -> Result<String, SourceError> {
    let response = send(request.header("Accept", "text/html"), timeout_ms).await?;
    response
        .text()
        .await
        .map_err(|e| SourceError::from_reqwest(e, timeout_ms))
}

/// `base` with the given query parameters appended, percent-encoded
pub fn url_with_query(base: &str, params: &[(&str, &str)]) -> String {
    Url::parse_with_params(base, params)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| base.to_string())
}
