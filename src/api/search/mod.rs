// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Model search API endpoints
//!
//! Provides `/api/search`, `/api/search/:site`, `/api/popular` and
//! `/api/search-urls`.

pub mod handler;
pub mod request;
pub mod response;

pub use handler::{popular_handler, search_handler, search_urls_handler, site_search_handler};
pub use request::{SearchParams, SearchUrlsParams};
pub use response::{SearchApiResponse, SiteSearchResponse};
