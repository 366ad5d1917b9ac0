// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Core types shared by every source adapter

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Placeholder title for records whose source exposes none
pub const UNTITLED: &str = "Untitled";
/// Placeholder creator for records whose source exposes none
pub const UNKNOWN_CREATOR: &str = "Unknown";

/// Identifier of a supported model site
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceId {
    Thingiverse,
    Printables,
    Makerworld,
    Cults3d,
    Myminifactory,
    Thangs,
}

impl SourceId {
    /// Every known source, in default response order
    pub const ALL: [SourceId; 6] = [
        SourceId::Thingiverse,
        SourceId::Printables,
        SourceId::Makerworld,
        SourceId::Cults3d,
        SourceId::Myminifactory,
        SourceId::Thangs,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceId::Thingiverse => "thingiverse",
            SourceId::Printables => "printables",
            SourceId::Makerworld => "makerworld",
            SourceId::Cults3d => "cults3d",
            SourceId::Myminifactory => "myminifactory",
            SourceId::Thangs => "thangs",
        }
    }

    /// Parse a comma separated site list, dropping unknown ids and duplicates.
    ///
    /// A missing or blank list selects every source.
    pub fn parse_list(raw: Option<&str>) -> Vec<SourceId> {
        let raw = match raw.map(str::trim) {
            Some(r) if !r.is_empty() => r,
            _ => return Self::ALL.to_vec(),
        };

        let mut ids = Vec::new();
        for id in raw.split(',').filter_map(|part| part.parse::<SourceId>().ok()) {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        ids
    }

    /// Comma separated list of every valid id, used in error messages
    pub fn valid_list() -> String {
        Self::ALL
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceId {
    type Err = SourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|id| id.as_str() == wanted)
            .ok_or_else(|| SourceError::UnknownSource { id: s.to_string() })
    }
}

/// A model listing normalized across all sources
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    /// Display name, never empty
    pub title: String,
    /// Attributed author
    pub creator: String,
    /// Preview image URL, empty when the source has none
    pub thumbnail: String,
    /// Absolute link to the model page
    pub url: String,
    pub likes: u64,
    pub downloads: u64,
    /// Adapter that produced the record
    pub source: SourceId,
}

/// Partially extracted record, before defaults are applied
#[derive(Debug, Clone, Default)]
pub struct RecordDraft {
    pub title: Option<String>,
    pub creator: Option<String>,
    pub thumbnail: Option<String>,
    pub url: Option<String>,
    pub likes: Option<u64>,
    pub downloads: Option<u64>,
}

impl RecordDraft {
    /// Apply defaults and stamp the source.
    ///
    /// Returns `None` when the draft has no absolute page URL, since such a
    /// record cannot be linked to.
    pub fn finish(self, source: SourceId) -> Option<NormalizedRecord> {
        let url = self.url.map(|u| u.trim().to_string())?;
        if !is_absolute_http(&url) {
            return None;
        }

        let thumbnail = self
            .thumbnail
            .map(|t| t.trim().to_string())
            .filter(|t| is_absolute_http(t))
            .unwrap_or_default();

        Some(NormalizedRecord {
            title: non_blank(self.title).unwrap_or_else(|| UNTITLED.to_string()),
            creator: non_blank(self.creator).unwrap_or_else(|| UNKNOWN_CREATOR.to_string()),
            thumbnail,
            url,
            likes: self.likes.unwrap_or(0),
            downloads: self.downloads.unwrap_or(0),
            source,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn is_absolute_http(value: &str) -> bool {
    url::Url::parse(value)
        .map(|u| matches!(u.scheme(), "http" | "https") && u.host_str().is_some())
        .unwrap_or(false)
}

/// Per-source result map returned by aggregation
pub type SiteResults = BTreeMap<SourceId, Vec<NormalizedRecord>>;

/// What an aggregate call asks each adapter for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AggregateMode {
    Search { query: String },
    Popular,
}

/// Errors raised inside a source adapter.
///
/// These never leave the adapter boundary: `SourceAdapter::search` and
/// `SourceAdapter::fetch_popular` log them and return an empty list.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Upstream request timed out
    #[error("Upstream timeout after {timeout_ms}ms")]
    Timeout {
        /// Timeout duration in milliseconds
        timeout_ms: u64,
    },

    /// Transport error or non-success status from the upstream site
    #[error("Upstream error: {status} - {message}")]
    Api {
        /// HTTP status code, 0 when no response was received
        status: u16,
        /// Error message
        message: String,
    },

    /// Upstream payload could not be decoded
    #[error("Unparseable upstream payload: {reason}")]
    Parse {
        /// What went wrong
        reason: String,
    },

    /// Site id not in the known set
    #[error("Unknown source: {id}")]
    UnknownSource {
        /// The rejected id
        id: String,
    },
}

impl SourceError {
    /// Map a reqwest error, distinguishing timeouts
    pub fn from_reqwest(err: reqwest::Error, timeout_ms: u64) -> Self {
        if err.is_timeout() {
            SourceError::Timeout { timeout_ms }
        } else if err.is_decode() {
            SourceError::Parse {
                reason: err.to_string(),
            }
        } else {
            SourceError::Api {
                status: err.status().map(|s| s.as_u16()).unwrap_or(0),
                message: err.to_string(),
            }
        }
    }
}
