// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Model site search
//!
//! Searches 3D-printable model repositories and merges the results:
//! - One adapter per site (Thingiverse, Printables, MakerWorld, Cults3D,
//!   MyMiniFactory, Thangs) normalizing listings to `NormalizedRecord`
//! - Concurrent fan-out with fail-open adapters
//! - TTL-based caching of popular listings

pub mod cache;
pub mod client;
pub mod config;
pub mod cults3d;
pub mod extract;
pub mod makerworld;
pub mod myminifactory;
pub mod popular;
pub mod printables;
pub mod provider;
pub mod service;
pub mod thangs;
pub mod thingiverse;
pub mod types;

// Re-export commonly used types
pub use cache::{CacheStats, Clock, ManualClock, SystemClock, TtlCache};
pub use client::build_client;
pub use config::SearchConfig;
pub use popular::PopularCache;
pub use provider::SourceAdapter;
pub use service::{AggregateError, Aggregator};
pub use types::{AggregateMode, NormalizedRecord, SiteResults, SourceError, SourceId};
