// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Tests for `/api/popular`
//!
//! The stub adapters change their output on every call, so identical bodies
//! prove the second response came from the cache.

use axum::http::StatusCode;
use printhunt::search::SourceId;

use super::support::{body_bytes, body_json, TestApp};

#[tokio::test]
async fn test_popular_repeat_is_byte_identical() {
    let app = TestApp::healthy(8);

    let first = app.get("/api/popular?sites=thingiverse&limit=5").await;
    assert_eq!(first.status(), StatusCode::OK);
    let first = body_bytes(first).await;

    let second = body_bytes(app.get("/api/popular?sites=thingiverse&limit=5").await).await;

    assert_eq!(first, second);
    assert_eq!(app.adapter(SourceId::Thingiverse).calls(), 1);

    let json: serde_json::Value = serde_json::from_slice(&first).unwrap();
    assert_eq!(json["thingiverse"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_popular_key_ignores_site_order() {
    let app = TestApp::healthy(2);

    app.get("/api/popular?sites=thingiverse,printables&limit=3").await;
    app.get("/api/popular?sites=printables,thingiverse,printables&limit=3").await;

    assert_eq!(app.adapter(SourceId::Thingiverse).calls(), 1);
    assert_eq!(app.adapter(SourceId::Printables).calls(), 1);
}

#[tokio::test]
async fn test_popular_different_limit_misses() {
    let app = TestApp::healthy(2);

    app.get("/api/popular?sites=thangs&limit=3").await;
    app.get("/api/popular?sites=thangs&limit=4").await;

    assert_eq!(app.adapter(SourceId::Thangs).calls(), 2);
}

#[tokio::test]
async fn test_popular_defaults_to_all_sites() {
    let app = TestApp::healthy(1);

    let json = body_json(app.get("/api/popular").await).await;
    let map = json.as_object().unwrap();
    assert_eq!(map.len(), 6);
    assert!(map.contains_key("makerworld"));
}
