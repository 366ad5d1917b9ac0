// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Tests for `/api/search-urls`, `/api/health` and routing basics

use axum::http::{Method, Request, StatusCode};
use axum::body::Body;
use tower::util::ServiceExt;

use super::support::{body_json, TestApp};

#[tokio::test]
async fn test_search_urls_for_every_site() {
    let app = TestApp::healthy(0);

    let response = app.get("/api/search-urls?q=benchy").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let map = json.as_object().unwrap();
    assert_eq!(map.len(), 6);
    assert_eq!(map["thangs"], "https://example.com/thangs/search?q=benchy");
    // Deep links never touch the network
    assert_eq!(app.total_adapter_calls(), 0);
}

#[tokio::test]
async fn test_search_urls_requires_query() {
    let app = TestApp::healthy(0);

    let response = app.get("/api/search-urls").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "missing_parameter");
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::healthy(0);

    let response = app.get("/api/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    let timestamp = json["timestamp"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = TestApp::healthy(0);
    let response = app.get("/api/nothing-here").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_post_is_not_allowed() {
    let app = TestApp::healthy(0);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/search?q=x")
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_cors_headers_present() {
    let app = TestApp::healthy(0);

    let request = Request::builder()
        .uri("/api/health")
        .header("Origin", "http://localhost:5173")
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();

    assert!(response
        .headers()
        .contains_key("access-control-allow-origin"));
}
