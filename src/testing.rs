//! Scripted in-memory [`VideoPlatform`] shared by the unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use serde_json::json;

use crate::youtube::{CategoryItem, ChannelItem, UpstreamError, VideoItem, VideoPlatform};

/// Records every call and answers from canned responses.
///
/// Searches pop from a queue so the region-scoped and unscoped attempts can
/// answer differently. Unscripted calls succeed with an empty list.
#[derive(Default)]
pub struct ScriptedPlatform {
    pub categories: Option<Result<Vec<CategoryItem>, UpstreamError>>,
    pub popular: Option<Result<Vec<VideoItem>, UpstreamError>>,
    pub searches: Mutex<VecDeque<Result<Vec<String>, UpstreamError>>>,
    pub hydrated: Option<Result<Vec<VideoItem>, UpstreamError>>,
    pub channels: Option<Result<Vec<ChannelItem>, UpstreamError>>,
    pub calls: Mutex<Vec<String>>,
}

impl ScriptedPlatform {
    pub fn with_popular(items: Vec<VideoItem>) -> Self {
        Self {
            popular: Some(Ok(items)),
            ..Self::default()
        }
    }

    pub fn push_search(&self, result: Result<Vec<String>, UpstreamError>) {
        self.searches.lock().unwrap().push_back(result);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

impl VideoPlatform for ScriptedPlatform {
    fn video_categories(&self, region: &str) -> Result<Vec<CategoryItem>, UpstreamError> {
        self.record(format!("categories region={region}"));
        self.categories.clone().unwrap_or_else(|| Ok(Vec::new()))
    }

    fn most_popular(
        &self,
        region: Option<&str>,
        category: Option<&str>,
        max_results: usize,
    ) -> Result<Vec<VideoItem>, UpstreamError> {
        self.record(format!(
            "popular region={} category={} max={max_results}",
            region.unwrap_or("-"),
            category.unwrap_or("-")
        ));
        self.popular.clone().unwrap_or_else(|| Ok(Vec::new()))
    }

    fn search_video_ids(
        &self,
        category: &str,
        region: Option<&str>,
        max_results: usize,
    ) -> Result<Vec<String>, UpstreamError> {
        self.record(format!(
            "search category={category} region={} max={max_results}",
            region.unwrap_or("-")
        ));
        self.searches
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    fn videos_by_id(&self, ids: &[String]) -> Result<Vec<VideoItem>, UpstreamError> {
        self.record(format!("videos ids={}", ids.join(",")));
        self.hydrated.clone().unwrap_or_else(|| Ok(Vec::new()))
    }

    fn channels_by_id(&self, ids: &[String]) -> Result<Vec<ChannelItem>, UpstreamError> {
        self.record(format!("channels ids={}", ids.join(",")));
        self.channels.clone().unwrap_or_else(|| Ok(Vec::new()))
    }
}

pub fn status(code: u16, body: &str) -> UpstreamError {
    UpstreamError::Status {
        status: code,
        body: body.to_owned(),
    }
}

pub fn video(id: &str, channel: &str, views: u64, likes: u64, duration: &str) -> VideoItem {
    serde_json::from_value(json!({
        "id": id,
        "snippet": {
            "title": format!("Video {id}"),
            "channelId": channel,
            "channelTitle": format!("Channel {channel}"),
            "publishedAt": "2024-05-01T12:00:00Z",
            "thumbnails": {
                "medium": { "url": format!("https://i.ytimg.com/vi/{id}/mqdefault.jpg"), "width": 320, "height": 180 },
                "high": { "url": format!("https://i.ytimg.com/vi/{id}/hqdefault.jpg"), "width": 480, "height": 360 }
            }
        },
        "statistics": {
            "viewCount": views.to_string(),
            "likeCount": likes.to_string(),
            "commentCount": "0"
        },
        "contentDetails": { "duration": duration }
    }))
    .expect("valid video fixture")
}

pub fn channel(id: &str, medium: Option<&str>, default: Option<&str>) -> ChannelItem {
    let mut thumbnails = serde_json::Map::new();
    if let Some(url) = medium {
        thumbnails.insert("medium".into(), json!({ "url": url }));
    }
    if let Some(url) = default {
        thumbnails.insert("default".into(), json!({ "url": url }));
    }
    serde_json::from_value(json!({ "id": id, "snippet": { "thumbnails": thumbnails } }))
        .expect("valid channel fixture")
}

pub fn category(id: &str, title: &str) -> CategoryItem {
    serde_json::from_value(json!({
        "id": id,
        "snippet": { "title": title, "assignable": true }
    }))
    .expect("valid category fixture")
}
