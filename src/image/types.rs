// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image proxy types

use bytes::Bytes;
use thiserror::Error;

/// Content type used when the upstream omits one
pub const DEFAULT_CONTENT_TYPE: &str = "image/jpeg";

/// Raw upstream response body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamImage {
    pub bytes: Bytes,
    /// `Content-Type` header as sent, if any
    pub content_type: Option<String>,
}

/// Image as served to clients and stored in the cache
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedImage {
    pub bytes: Bytes,
    pub content_type: String,
}

impl From<UpstreamImage> for CachedImage {
    fn from(image: UpstreamImage) -> Self {
        let content_type = image
            .content_type
            .map(|ct| ct.trim().to_string())
            .filter(|ct| !ct.is_empty())
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());

        Self {
            bytes: image.bytes,
            content_type,
        }
    }
}

/// Errors from proxying an image
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ImageProxyError {
    /// Missing, malformed, non-http(s) or internal URL
    #[error("Invalid image URL: {reason}")]
    InvalidUrl { reason: String },

    /// Upstream answered with a non-success status
    #[error("Upstream returned status {status}")]
    Upstream { status: u16 },

    /// Upstream request timed out
    #[error("Image fetch timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// Transport failure or unreadable body
    #[error("Image fetch failed: {message}")]
    Network { message: String },
}
