// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Shared fixtures for the API tests
//!
//! Stub adapters and a counting image fetcher stand in for the network so
//! the router can be driven end to end with `oneshot`.

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, Response},
    Router,
};
use bytes::Bytes;
use printhunt::{
    api::{create_app, AppState},
    image::{ImageFetcher, ImageProxy, ImageProxyConfig, ImageProxyError, UpstreamImage},
    search::{
        types::RecordDraft, Aggregator, NormalizedRecord, PopularCache, SearchConfig,
        SourceAdapter, SourceError, SourceId,
    },
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::util::ServiceExt; // for `oneshot`

/// Adapter returning `available` records per call; output changes per call
pub struct StubAdapter {
    pub id: SourceId,
    pub available: usize,
    pub fail: bool,
    pub calls: AtomicUsize,
    pub last_page: Mutex<Option<usize>>,
}

impl StubAdapter {
    pub fn new(id: SourceId, available: usize) -> Self {
        Self {
            id,
            available,
            fail: false,
            calls: AtomicUsize::new(0),
            last_page: Mutex::new(None),
        }
    }

    pub fn failing(id: SourceId) -> Self {
        Self {
            fail: true,
            ..Self::new(id, 0)
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn produce(&self) -> Result<Vec<NormalizedRecord>, SourceError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(SourceError::Api {
                status: 503,
                message: "Service Unavailable".to_string(),
            });
        }

        Ok((0..self.available)
            .filter_map(|n| {
                RecordDraft {
                    title: Some(format!("{} model {} (call {})", self.id, n, call)),
                    url: Some(format!("https://example.com/{}/{}", self.id, n)),
                    likes: Some(call as u64),
                    ..Default::default()
                }
                .finish(self.id)
            })
            .collect())
    }
}

#[async_trait]
impl SourceAdapter for StubAdapter {
    fn id(&self) -> SourceId {
        self.id
    }

    async fn try_search(
        &self,
        _query: &str,
        _limit: usize,
        page: usize,
    ) -> Result<Vec<NormalizedRecord>, SourceError> {
        if let Ok(mut last) = self.last_page.lock() {
            *last = Some(page);
        }
        self.produce()
    }

    async fn try_popular(&self, _limit: usize) -> Result<Vec<NormalizedRecord>, SourceError> {
        self.produce()
    }

    fn search_url(&self, query: &str) -> String {
        format!("https://example.com/{}/search?q={}", self.id, query)
    }
}

/// Image fetcher answering from a fixed response and counting calls
pub struct CountingFetcher {
    pub response: Result<UpstreamImage, ImageProxyError>,
    pub calls: AtomicUsize,
    pub referers: Mutex<Vec<String>>,
}

impl CountingFetcher {
    pub fn ok(content_type: Option<&str>) -> Self {
        Self::with_response(Ok(UpstreamImage {
            bytes: Bytes::from_static(b"\x89PNG\r\n\x1a\n"),
            content_type: content_type.map(str::to_string),
        }))
    }

    pub fn with_response(response: Result<UpstreamImage, ImageProxyError>) -> Self {
        Self {
            response,
            calls: AtomicUsize::new(0),
            referers: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageFetcher for CountingFetcher {
    async fn fetch(&self, _url: &str, referer: &str) -> Result<UpstreamImage, ImageProxyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut referers) = self.referers.lock() {
            referers.push(referer.to_string());
        }
        self.response.clone()
    }
}

/// Test harness: router plus handles on the stubs behind it
pub struct TestApp {
    pub router: Router,
    pub adapters: Vec<Arc<StubAdapter>>,
    pub fetcher: Arc<CountingFetcher>,
}

impl TestApp {
    pub fn new(adapters: Vec<Arc<StubAdapter>>, fetcher: CountingFetcher) -> Self {
        let dyn_adapters = adapters
            .iter()
            .map(|a| a.clone() as Arc<dyn SourceAdapter>)
            .collect();
        let aggregator = Arc::new(Aggregator::new(dyn_adapters, &SearchConfig::default()));
        let popular = PopularCache::new(aggregator.clone(), Duration::from_secs(300));

        let fetcher = Arc::new(fetcher);
        let image_proxy = ImageProxy::new(fetcher.clone(), &ImageProxyConfig::default());

        let state = AppState::new(aggregator, popular, image_proxy);
        Self {
            router: create_app(Arc::new(state)),
            adapters,
            fetcher,
        }
    }

    /// Six healthy stub adapters with `available` records each
    pub fn healthy(available: usize) -> Self {
        let adapters = SourceId::ALL
            .iter()
            .map(|id| Arc::new(StubAdapter::new(*id, available)))
            .collect();
        Self::new(adapters, CountingFetcher::ok(Some("image/png")))
    }

    pub fn adapter(&self, id: SourceId) -> &StubAdapter {
        self.adapters
            .iter()
            .find(|a| a.id == id)
            .expect("adapter registered")
    }

    pub fn total_adapter_calls(&self) -> usize {
        self.adapters.iter().map(|a| a.calls()).sum()
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        self.router.clone().oneshot(request).await.unwrap()
    }
}

pub async fn body_bytes(response: Response<Body>) -> Bytes {
    to_bytes(response.into_body(), usize::MAX).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
