// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image proxy endpoint

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::debug;

use super::errors::ApiError;
use super::http_server::AppState;
use super::search::request::required;

/// Query string of `/api/image`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageParams {
    pub url: Option<String>,
}

/// GET /api/image - Fetch a thumbnail through the proxy
///
/// Returns the raw bytes with the upstream `Content-Type` and a public
/// `Cache-Control` matching the proxy cache TTL.
///
/// # Errors
/// - 400 Bad Request: `url` missing, malformed or pointing at an internal host
/// - Upstream error status mirrored
/// - 500 Internal Server Error: network failure
pub async fn image_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ImageParams>,
) -> Result<Response, ApiError> {
    let url = required(params.url.as_deref(), "url")?;
    debug!("Image proxy request for {}", url);

    let image = state.image_proxy.proxy_image(&url).await?;
    let cache_control = format!("public, max-age={}", state.image_proxy.max_age_secs());

    Ok((
        [
            (header::CONTENT_TYPE, image.content_type),
            (header::CACHE_CONTROL, cache_control),
        ],
        image.bytes,
    )
        .into_response())
}
