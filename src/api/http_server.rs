// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::health::health_handler;
use super::image::image_handler;
use super::search::{popular_handler, search_handler, search_urls_handler, site_search_handler};
use crate::config::AppConfig;
use crate::image::{HttpImageFetcher, ImageProxy};
use crate::search::{build_client, Aggregator, PopularCache};

/// Shared services behind every handler
pub struct AppState {
    pub aggregator: Arc<Aggregator>,
    pub popular: Arc<PopularCache>,
    pub image_proxy: Arc<ImageProxy>,
}

impl AppState {
    pub fn new(aggregator: Arc<Aggregator>, popular: PopularCache, image_proxy: ImageProxy) -> Self {
        Self {
            aggregator,
            popular: Arc::new(popular),
            image_proxy: Arc::new(image_proxy),
        }
    }

    /// Wire the production adapters, caches and image fetcher
    ///
    /// One HTTP client (browser User-Agent, upstream timeout) is shared by
    /// every adapter. The image fetcher keeps its own client so redirect hops
    /// are vetted like the requested URL.
    pub fn from_config(config: &AppConfig) -> Result<Self, reqwest::Error> {
        let timeout = std::time::Duration::from_secs(config.search.upstream_timeout_secs);
        let client = build_client(timeout)?;

        let aggregator = Arc::new(Aggregator::from_config(&config.search, client));
        let popular = PopularCache::new(
            aggregator.clone(),
            std::time::Duration::from_secs(config.search.popular_cache_ttl_secs),
        );
        let fetcher = Arc::new(HttpImageFetcher::new(timeout)?);
        let image_proxy = ImageProxy::new(fetcher, &config.image);

        Ok(Self::new(aggregator, popular, image_proxy))
    }
}

/// Build the router with every route and layer
pub fn create_app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/search", get(search_handler))
        .route("/api/search/:site", get(site_search_handler))
        .route("/api/popular", get(popular_handler))
        .route("/api/search-urls", get(search_urls_handler))
        .route("/api/image", get(image_handler))
        .route("/api/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve until Ctrl-C
pub async fn start_server(state: Arc<AppState>, addr: SocketAddr) -> anyhow::Result<()> {
    let app = create_app(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("API server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        // Never resolve, keep serving
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
