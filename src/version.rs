// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Version information for printhunt

use crate::search::SourceId;

/// Semantic version number
pub const VERSION_NUMBER: &str = env!("CARGO_PKG_VERSION");

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!(
        "printhunt {} ({} sites)",
        VERSION_NUMBER,
        SourceId::ALL.len()
    )
}
