// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Tests for `/api/search` and `/api/search/:site`
//!
//! These tests verify that:
//! - A missing query is rejected before any adapter runs
//! - One failing adapter leaves the others intact
//! - `sites`, `limit` and `page` are parsed and clamped
//! - Unknown single-site ids are rejected with the valid list

use axum::http::StatusCode;
use printhunt::search::SourceId;
use std::sync::Arc;

use super::support::{body_json, CountingFetcher, StubAdapter, TestApp};

#[tokio::test]
async fn test_search_without_query_is_rejected() {
    let app = TestApp::healthy(3);

    for uri in ["/api/search", "/api/search?q=", "/api/search?q=%20%20"] {
        let response = app.get(uri).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", uri);

        let json = body_json(response).await;
        assert_eq!(json["error"], "missing_parameter");
        assert!(json["message"].as_str().unwrap().contains("'q'"));
    }

    assert_eq!(app.total_adapter_calls(), 0);
}

#[tokio::test]
async fn test_search_all_sites_by_default() {
    let app = TestApp::healthy(3);

    let response = app.get("/api/search?q=benchy").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["page"], 1);
    assert_eq!(json["limit"], 10);

    let results = json["results"].as_object().unwrap();
    assert_eq!(results.len(), 6);
    for id in SourceId::ALL {
        let records = results[id.as_str()].as_array().unwrap();
        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|r| r["source"] == id.as_str()));
    }
}

#[tokio::test]
async fn test_failing_adapter_yields_empty_list() {
    let adapters = SourceId::ALL
        .iter()
        .map(|id| {
            if *id == SourceId::Cults3d {
                Arc::new(StubAdapter::failing(*id))
            } else {
                Arc::new(StubAdapter::new(*id, 2))
            }
        })
        .collect();
    let app = TestApp::new(adapters, CountingFetcher::ok(None));

    let response = app.get("/api/search?q=vase").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let results = json["results"].as_object().unwrap();
    assert_eq!(results.len(), 6);
    assert!(results["cults3d"].as_array().unwrap().is_empty());
    let non_empty = results
        .values()
        .filter(|r| !r.as_array().unwrap().is_empty())
        .count();
    assert_eq!(non_empty, 5);
}

#[tokio::test]
async fn test_sites_filter_drops_unknown_ids() {
    let app = TestApp::healthy(1);

    let json = body_json(app.get("/api/search?q=gear&sites=thangs,bogus,printables").await).await;
    let keys: Vec<&String> = json["results"].as_object().unwrap().keys().collect();
    assert_eq!(keys, vec!["printables", "thangs"]);

    assert_eq!(app.adapter(SourceId::Thingiverse).calls(), 0);
    assert_eq!(app.adapter(SourceId::Thangs).calls(), 1);
}

#[tokio::test]
async fn test_limit_and_page_are_clamped() {
    let app = TestApp::healthy(30);

    let json = body_json(app.get("/api/search?q=x&sites=printables&limit=999&page=-5").await).await;
    assert_eq!(json["limit"], 20);
    assert_eq!(json["page"], 1);
    assert_eq!(json["results"]["printables"].as_array().unwrap().len(), 20);

    let json = body_json(app.get("/api/search?q=x&sites=printables&limit=abc").await).await;
    assert_eq!(json["limit"], 10);

    let json = body_json(app.get("/api/search?q=x&sites=printables&limit=0&page=3").await).await;
    assert_eq!(json["limit"], 10);
    assert_eq!(json["page"], 3);
    let last_page = *app.adapter(SourceId::Printables).last_page.lock().unwrap();
    assert_eq!(last_page, Some(3));
}

#[tokio::test]
async fn test_huge_page_is_accepted() {
    let app = TestApp::healthy(5);

    let response = app
        .get("/api/search?q=x&sites=printables&page=9223372036854775807")
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["page"], 9223372036854775807u64);
    let last_page = *app.adapter(SourceId::Printables).last_page.lock().unwrap();
    assert_eq!(last_page, Some(9223372036854775807));
}

#[tokio::test]
async fn test_single_site_search() {
    let app = TestApp::healthy(4);

    let response = app.get("/api/search/thangs?q=dice&limit=2&page=2").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["site"], "thangs");
    assert_eq!(json["page"], 2);
    assert_eq!(json["results"].as_array().unwrap().len(), 2);
    assert_eq!(app.total_adapter_calls(), 1);
}

#[tokio::test]
async fn test_single_site_unknown_is_rejected() {
    let app = TestApp::healthy(1);

    let response = app.get("/api/search/shapeways?q=dice").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["error"], "unknown_site");
    let valid = json["details"]["valid_sites"].as_array().unwrap();
    assert_eq!(valid.len(), 6);
    assert!(valid.contains(&serde_json::json!("myminifactory")));
    assert_eq!(app.total_adapter_calls(), 0);
}

#[tokio::test]
async fn test_single_site_without_query_is_rejected() {
    let app = TestApp::healthy(1);

    let response = app.get("/api/search/printables").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(app.total_adapter_calls(), 0);
}
