// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Tests for `/api/image`

use axum::http::{header, StatusCode};
use printhunt::image::ImageProxyError;
use printhunt::search::SourceId;
use std::sync::Arc;

use super::support::{body_bytes, body_json, CountingFetcher, StubAdapter, TestApp};

fn app_with(fetcher: CountingFetcher) -> TestApp {
    TestApp::new(vec![Arc::new(StubAdapter::new(SourceId::Thangs, 1))], fetcher)
}

const THUMB: &str = "/api/image?url=https%3A%2F%2Fcdn.thingiverse.com%2Frenders%2Fa.png";

#[tokio::test]
async fn test_image_is_fetched_once_and_cached() {
    let app = app_with(CountingFetcher::ok(Some("image/png")));

    let first = app.get(THUMB).await;
    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(first.headers()[header::CONTENT_TYPE], "image/png");
    assert_eq!(first.headers()[header::CACHE_CONTROL], "public, max-age=1800");
    let first_body = body_bytes(first).await;

    let second = app.get(THUMB).await;
    assert_eq!(second.headers()[header::CONTENT_TYPE], "image/png");
    assert_eq!(body_bytes(second).await, first_body);

    assert_eq!(app.fetcher.calls(), 1);
    let referers = app.fetcher.referers.lock().unwrap().clone();
    assert_eq!(referers, vec!["https://www.thingiverse.com/".to_string()]);
}

#[tokio::test]
async fn test_missing_content_type_defaults_to_jpeg() {
    let app = app_with(CountingFetcher::ok(None));

    let response = app
        .get("/api/image?url=https%3A%2F%2Fstorage.googleapis.com%2Fx")
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/jpeg");
    assert_eq!(app.fetcher.referers.lock().unwrap()[0], "");
}

#[tokio::test]
async fn test_invalid_urls_are_rejected() {
    let app = app_with(CountingFetcher::ok(None));

    for uri in [
        "/api/image",
        "/api/image?url=",
        "/api/image?url=not-a-url",
        "/api/image?url=ftp%3A%2F%2Fexample.com%2Fa.png",
        "/api/image?url=http%3A%2F%2F127.0.0.1%2Fa.png",
    ] {
        let response = app.get(uri).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", uri);
    }
    assert_eq!(app.fetcher.calls(), 0);
}

#[tokio::test]
async fn test_upstream_status_is_propagated() {
    let app = app_with(CountingFetcher::with_response(Err(
        ImageProxyError::Upstream { status: 404 },
    )));

    let response = app.get(THUMB).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response).await;
    assert_eq!(json["error"], "upstream_error");
    assert_eq!(json["details"]["upstream_status"], 404);
}

#[tokio::test]
async fn test_network_failure_is_internal_error() {
    let app = app_with(CountingFetcher::with_response(Err(ImageProxyError::Network {
        message: "connection reset".to_string(),
    })));

    let response = app.get(THUMB).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["error"], "internal_error");
}
