// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod errors;
pub mod health;
pub mod http_server;
pub mod image;
pub mod search;

pub use errors::{ApiError, ErrorResponse};
pub use health::{health_handler, HealthResponse};
pub use http_server::{create_app, start_server, AppState};
pub use image::{image_handler, ImageParams};
pub use search::{
    popular_handler, search_handler, search_urls_handler, site_search_handler, SearchApiResponse,
    SearchParams, SiteSearchResponse,
};
