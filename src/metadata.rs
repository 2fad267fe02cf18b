//! Records exchanged between the retrieval pipeline and the HTTP API.
//!
//! Everything here is rebuilt from upstream payloads on every request and
//! serialized straight to the dashboard; nothing is persisted. Field names
//! follow the camelCase shape the browser client consumes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ranking::{ShortsFilter, SortKey};

/// Category id meaning "do not scope by category".
pub const ALL_CATEGORIES: &str = "all";

/// Region code meaning "do not scope by region".
pub const WORLDWIDE_REGION: &str = "WW";

/// Region the category listing is resolved against for worldwide requests.
pub const DEFAULT_CATEGORY_REGION: &str = "US";

/// A selectable category in the dashboard filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryOption {
    pub value: String,
    pub label: String,
}

impl CategoryOption {
    /// The sentinel entry shown before every upstream category.
    pub fn all() -> Self {
        Self {
            value: ALL_CATEGORIES.to_owned(),
            label: "All".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thumbnail {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

/// Only the two renditions the card grid uses are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThumbnailSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medium: Option<Thumbnail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high: Option<Thumbnail>,
}

/// Counters as reported upstream: decimal strings, any of which may be
/// hidden by the uploader.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_count: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub like_count: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment_count: Option<String>,
}

/// One card in the results grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRecord {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub channel_id: String,
    pub channel_title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_thumbnail_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    /// Raw encoded duration as received, e.g. `PT4M13S`.
    #[serde(default)]
    pub duration: String,
    pub duration_seconds: u64,
    /// `H:MM:SS` or `M:SS`, empty when the duration was unusable.
    #[serde(default)]
    pub duration_text: String,
    #[serde(default)]
    pub thumbnails: ThumbnailSet,
    #[serde(default)]
    pub statistics: Statistics,
}

/// Normalized parameters of one `/api/videos` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoQuery {
    pub region: String,
    pub category: String,
    pub sort: SortKey,
    pub shorts: ShortsFilter,
}

impl VideoQuery {
    /// Category id to scope upstream calls with, `None` for the "all" sentinel.
    pub fn category_scope(&self) -> Option<&str> {
        category_scope(&self.category)
    }

    /// Region code to scope upstream calls with, `None` for worldwide.
    pub fn region_scope(&self) -> Option<&str> {
        region_scope(&self.region)
    }
}

pub fn category_scope(category: &str) -> Option<&str> {
    if category.is_empty() || category.eq_ignore_ascii_case(ALL_CATEGORIES) {
        None
    } else {
        Some(category)
    }
}

pub fn region_scope(region: &str) -> Option<&str> {
    if region.is_empty() || region.eq_ignore_ascii_case(WORLDWIDE_REGION) {
        None
    } else {
        Some(region)
    }
}

/// Trims and upper-cases a region code, falling back to `default` when
/// nothing usable was supplied.
pub fn normalize_region(raw: Option<&str>, default: &str) -> String {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => value.to_ascii_uppercase(),
        None => default.to_ascii_uppercase(),
    }
}

/// Trims a category id, falling back to the "all" sentinel.
pub fn normalize_category(raw: Option<&str>) -> String {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) if value.eq_ignore_ascii_case(ALL_CATEGORIES) => ALL_CATEGORIES.to_owned(),
        Some(value) => value.to_owned(),
        None => ALL_CATEGORIES.to_owned(),
    }
}
