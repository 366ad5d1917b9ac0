// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod cli;
pub mod config;
pub mod image;
pub mod search;
pub mod version;

// Re-export main types
pub use api::{create_app, AppState};
pub use config::{AppConfig, ConfigError};
pub use image::{ImageFetcher, ImageProxy, ImageProxyConfig};
pub use search::{Aggregator, NormalizedRecord, PopularCache, SourceAdapter, SourceId};
