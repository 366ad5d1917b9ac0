// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Thumbnail image proxy
//!
//! Fetches model thumbnails server-side with a per-site `Referer` and
//! caches them so hotlink protection does not break the front-end.

pub mod config;
pub mod fetcher;
pub mod proxy;
pub mod referer;
pub mod types;

pub use config::ImageProxyConfig;
pub use fetcher::{HttpImageFetcher, ImageFetcher};
pub use proxy::{validate_image_url, ImageProxy};
pub use types::{CachedImage, ImageProxyError, UpstreamImage, DEFAULT_CONTENT_TYPE};
