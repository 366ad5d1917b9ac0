// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Best-effort field extraction
//!
//! Upstream payloads disagree on field names and even on where a field
//! lives. Each adapter declares, per record field, an ordered list of
//! candidate locations; the first candidate that yields a usable value wins.
//! The same policy applies to JSON (dotted paths) and HTML (CSS selectors).

use scraper::{ElementRef, Html, Selector};
use serde_json::Value;
use url::Url;

use super::types::{NormalizedRecord, RecordDraft, SourceId};

/// Ordered JSON path candidates for each record field.
///
/// Paths are dot separated; numeric segments index into arrays
/// (`images.0.url`).
#[derive(Debug, Clone, Copy)]
pub struct JsonFieldMap {
    pub title: &'static [&'static str],
    pub creator: &'static [&'static str],
    pub thumbnail: &'static [&'static str],
    pub url: &'static [&'static str],
    pub likes: &'static [&'static str],
    pub downloads: &'static [&'static str],
}

impl JsonFieldMap {
    /// Extract a draft from one upstream item, resolving relative links
    /// against `base`
    pub fn draft(&self, item: &Value, base: &str) -> RecordDraft {
        RecordDraft {
            title: first_string(item, self.title),
            creator: first_string(item, self.creator),
            thumbnail: first_string(item, self.thumbnail).and_then(|t| absolutize(base, &t)),
            url: first_string(item, self.url).and_then(|u| absolutize(base, &u)),
            likes: first_count(item, self.likes),
            downloads: first_count(item, self.downloads),
        }
    }
}

/// Ordered CSS selector candidates for each record field of an HTML card.
///
/// Link fields take `(selector, attribute)` pairs; an empty selector means
/// the card element itself.
#[derive(Debug, Clone, Copy)]
pub struct HtmlFieldMap {
    pub title: &'static [&'static str],
    pub creator: &'static [&'static str],
    pub thumbnail: &'static [(&'static str, &'static str)],
    pub url: &'static [(&'static str, &'static str)],
    pub likes: &'static [&'static str],
    pub downloads: &'static [&'static str],
}

impl HtmlFieldMap {
    pub fn draft(&self, card: ElementRef<'_>, base: &str) -> RecordDraft {
        RecordDraft {
            title: select_text(card, self.title),
            creator: select_text(card, self.creator),
            thumbnail: select_attr(card, self.thumbnail).and_then(|t| absolutize(base, &t)),
            url: select_attr(card, self.url).and_then(|u| absolutize(base, &u)),
            likes: select_text(card, self.likes).and_then(|t| parse_count(&t)),
            downloads: select_text(card, self.downloads).and_then(|t| parse_count(&t)),
        }
    }
}

/// Normalize a list of JSON items, dropping items without a usable link
pub fn json_records(
    items: &[Value],
    fields: &JsonFieldMap,
    base: &str,
    source: SourceId,
) -> Vec<NormalizedRecord> {
    items
        .iter()
        .filter_map(|item| fields.draft(item, base).finish(source))
        .collect()
}

/// Normalize the cards of an HTML page.
///
/// Card selectors are tried in order; the first one that yields at least one
/// valid record wins.
pub fn html_records(
    html: &str,
    card_selectors: &[&str],
    fields: &HtmlFieldMap,
    base: &str,
    source: SourceId,
) -> Vec<NormalizedRecord> {
    let document = Html::parse_document(html);

    for selector in card_selectors {
        let Ok(selector) = Selector::parse(selector) else {
            continue;
        };
        let records: Vec<_> = document
            .select(&selector)
            .filter_map(|card| fields.draft(card, base).finish(source))
            .collect();
        if !records.is_empty() {
            return records;
        }
    }

    Vec::new()
}

/// The JSON payload a Next.js page embeds in `script#__NEXT_DATA__`
pub fn next_data(html: &str) -> Option<Value> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("script#__NEXT_DATA__").ok()?;
    let script = document.select(&selector).next()?;
    serde_json::from_str(&script.text().collect::<String>()).ok()
}

/// Resolve a dotted path inside a JSON value
pub fn json_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(value, |current, segment| match current {
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        Value::Object(map) => map.get(segment),
        _ => None,
    })
}

/// First candidate resolving to a non-empty string (numbers are stringified)
pub fn first_string(value: &Value, paths: &[&str]) -> Option<String> {
    paths.iter().find_map(|path| match json_path(value, path)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// First candidate resolving to a non-negative count
pub fn first_count(value: &Value, paths: &[&str]) -> Option<u64> {
    paths.iter().find_map(|path| match json_path(value, path)? {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => parse_count(s),
        _ => None,
    })
}

/// First candidate resolving to an array
pub fn first_array<'a>(value: &'a Value, paths: &[&str]) -> Option<&'a Vec<Value>> {
    paths
        .iter()
        .find_map(|path| json_path(value, path).and_then(Value::as_array))
}

/// Parse a human formatted count: `"1,234"`, `"1.2k"`, `"3M"`, `"42 likes"`.
///
/// Negative or unparseable input yields `None`.
pub fn parse_count(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    let numeric_len = raw
        .find(|c: char| !(c.is_ascii_digit() || matches!(c, '.' | ',' | ' ' | '\u{a0}')))
        .unwrap_or(raw.len());

    let digits: String = raw[..numeric_len]
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if digits.is_empty() {
        return None;
    }
    let number: f64 = digits.parse().ok()?;

    // A unit letter counts only when it is not the start of a word
    let mut rest = raw[numeric_len..].chars();
    let multiplier = match (rest.next(), rest.next()) {
        (Some(unit), next) if !next.map_or(false, char::is_alphabetic) => {
            match unit.to_ascii_lowercase() {
                'k' => 1_000.0,
                'm' => 1_000_000.0,
                'b' => 1_000_000_000.0,
                _ => 1.0,
            }
        }
        _ => 1.0,
    };

    Some((number * multiplier).round() as u64)
}

/// Resolve `href` against `base`, accepting protocol-relative links.
///
/// Only http(s) results are returned.
pub fn absolutize(base: &str, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    let resolved = match Url::parse(href) {
        Ok(url) => url,
        Err(_) => Url::parse(base).ok()?.join(href).ok()?,
    };

    matches!(resolved.scheme(), "http" | "https").then(|| resolved.to_string())
}

/// Text of the first matching selector that has non-blank content
pub fn select_text(card: ElementRef<'_>, selectors: &[&str]) -> Option<String> {
    selectors.iter().find_map(|selector| {
        let selector = Selector::parse(selector).ok()?;
        card.select(&selector).find_map(|el| {
            let text = collapse_whitespace(&el.text().collect::<Vec<_>>().join(" "));
            (!text.is_empty()).then_some(text)
        })
    })
}

/// Attribute of the first matching `(selector, attribute)` pair
pub fn select_attr(card: ElementRef<'_>, candidates: &[(&str, &str)]) -> Option<String> {
    candidates.iter().find_map(|(selector, attr)| {
        if selector.is_empty() {
            return non_empty_attr(card, attr);
        }
        let selector = Selector::parse(selector).ok()?;
        card.select(&selector).find_map(|el| non_empty_attr(el, attr))
    })
}

fn non_empty_attr(el: ElementRef<'_>, attr: &str) -> Option<String> {
    el.value()
        .attr(attr)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| {
            // srcset: keep the first candidate URL
            if attr.ends_with("srcset") {
                v.split_whitespace().next().unwrap_or(v).to_string()
            } else {
                v.to_string()
            }
        })
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
