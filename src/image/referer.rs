// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Per-site `Referer` selection
//!
//! Several model sites refuse hotlinked image requests without a referer
//! from their own origin.

/// (host fragment, referer); first match wins
const REFERERS: &[(&str, &str)] = &[
    ("thingiverse", "https://www.thingiverse.com/"),
    ("printables", "https://www.printables.com/"),
    ("makerworld", "https://makerworld.com/"),
    ("bblmw", "https://makerworld.com/"),
    ("cults3d", "https://cults3d.com/"),
    ("myminifactory", "https://www.myminifactory.com/"),
    ("thangs", "https://thangs.com/"),
];

/// Referer to send for an image host; empty for unknown hosts
pub fn referer_for(host: &str) -> &'static str {
    let host = host.to_ascii_lowercase();
    REFERERS
        .iter()
        .find(|(fragment, _)| host.contains(fragment))
        .map(|(_, referer)| *referer)
        .unwrap_or("")
}
