//! Ordering and shorts filtering applied to the hydrated working set.

use std::cmp::Reverse;

use serde::{Deserialize, Serialize};

use crate::metadata::{Statistics, VideoRecord};

/// Anything shorter than this counts as a short.
pub const SHORTS_MAX_SECONDS: u64 = 60;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Views,
    Likes,
    Comments,
}

impl SortKey {
    /// Unknown or missing keys rank by views.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|value| value.trim().to_ascii_lowercase()).as_deref() {
            Some("likes") => Self::Likes,
            Some("comments") => Self::Comments,
            _ => Self::Views,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Views => "views",
            Self::Likes => "likes",
            Self::Comments => "comments",
        }
    }

    /// Numeric value of the statistic this key ranks by. Hidden or
    /// non-numeric counters count as zero.
    pub fn statistic(self, statistics: &Statistics) -> u64 {
        let raw = match self {
            Self::Views => statistics.view_count.as_deref(),
            Self::Likes => statistics.like_count.as_deref(),
            Self::Comments => statistics.comment_count.as_deref(),
        };
        raw.and_then(|value| value.trim().parse().ok()).unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShortsFilter {
    #[default]
    Include,
    Exclude,
}

impl ShortsFilter {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|value| value.trim().to_ascii_lowercase()).as_deref() {
            Some("exclude") => Self::Exclude,
            _ => Self::Include,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Include => "include",
            Self::Exclude => "exclude",
        }
    }
}

/// Sorts descending on the chosen statistic. The sort is stable, so ties
/// keep the order upstream returned them in.
pub fn rank(mut records: Vec<VideoRecord>, key: SortKey) -> Vec<VideoRecord> {
    records.sort_by_key(|record| Reverse(key.statistic(&record.statistics)));
    records
}

pub fn filter_shorts(records: Vec<VideoRecord>, filter: ShortsFilter) -> Vec<VideoRecord> {
    match filter {
        ShortsFilter::Include => records,
        ShortsFilter::Exclude => records
            .into_iter()
            .filter(|record| record.duration_seconds >= SHORTS_MAX_SECONDS)
            .collect(),
    }
}
