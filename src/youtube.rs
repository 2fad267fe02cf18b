//! Client for the YouTube Data API v3.
//!
//! [`VideoPlatform`] is the seam the rest of the crate talks to: it exposes
//! the five upstream calls the dashboard needs and returns the raw wire
//! structs below. [`YoutubeClient`] is the blocking HTTP implementation;
//! callers on the async side run it through `spawn_blocking`.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::duration::describe_duration;
use crate::metadata::{Statistics, Thumbnail, ThumbnailSet, VideoRecord};

pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com/youtube/v3";

/// Parts requested whenever full video records are needed.
const VIDEO_PARTS: &str = "snippet,statistics,contentDetails";

/// Failure talking to the upstream API.
#[derive(Debug, Clone, Error)]
pub enum UpstreamError {
    /// Upstream answered with a non-success status.
    #[error("upstream returned HTTP {status}")]
    Status { status: u16, body: String },
    #[error("upstream request failed: {0}")]
    Transport(String),
    #[error("could not decode upstream response: {0}")]
    Decode(String),
}

impl UpstreamError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }

    /// Diagnostic text forwarded to the client: the upstream body verbatim
    /// for status failures, the error message otherwise.
    pub fn details(&self) -> String {
        match self {
            Self::Status { body, .. } => body.clone(),
            other => other.to_string(),
        }
    }
}

/// The upstream calls used by the dashboard.
///
/// `None` for a region or category means the call is not scoped by it.
pub trait VideoPlatform: Send + Sync {
    fn video_categories(&self, region: &str) -> Result<Vec<CategoryItem>, UpstreamError>;

    /// The ranked "most popular" chart.
    fn most_popular(
        &self,
        region: Option<&str>,
        category: Option<&str>,
        max_results: usize,
    ) -> Result<Vec<VideoItem>, UpstreamError>;

    /// Video ids from a view-count ordered search within a category.
    fn search_video_ids(
        &self,
        category: &str,
        region: Option<&str>,
        max_results: usize,
    ) -> Result<Vec<String>, UpstreamError>;

    fn videos_by_id(&self, ids: &[String]) -> Result<Vec<VideoItem>, UpstreamError>;

    fn channels_by_id(&self, ids: &[String]) -> Result<Vec<ChannelItem>, UpstreamError>;
}

#[derive(Debug, Deserialize)]
struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryItem {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub snippet: CategorySnippet,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategorySnippet {
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoItem {
    pub id: String,
    #[serde(default)]
    pub snippet: VideoSnippet,
    #[serde(default)]
    pub statistics: Statistics,
    #[serde(default)]
    pub content_details: ContentDetails,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSnippet {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub channel_id: String,
    #[serde(default)]
    pub channel_title: String,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub thumbnails: ThumbnailSet,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentDetails {
    #[serde(default)]
    pub duration: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChannelItem {
    pub id: String,
    #[serde(default)]
    pub snippet: ChannelSnippet,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChannelSnippet {
    #[serde(default)]
    pub thumbnails: ChannelThumbnails,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChannelThumbnails {
    #[serde(default)]
    pub default: Option<Thumbnail>,
    #[serde(default)]
    pub medium: Option<Thumbnail>,
}

impl ChannelItem {
    /// Medium avatar when present, default-resolution otherwise.
    pub fn avatar_url(&self) -> Option<&str> {
        let thumbnails = &self.snippet.thumbnails;
        thumbnails
            .medium
            .as_ref()
            .or(thumbnails.default.as_ref())
            .map(|thumbnail| thumbnail.url.as_str())
            .filter(|url| !url.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
struct SearchItem {
    #[serde(default)]
    id: SearchId,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchId {
    #[serde(default)]
    video_id: Option<String>,
}

impl VideoItem {
    /// Flattens the wire representation into the record served to clients.
    pub fn into_record(self) -> VideoRecord {
        let duration = self.content_details.duration.unwrap_or_default();
        let (duration_seconds, duration_text) = describe_duration(Some(duration.as_str()));
        let published_at = self
            .snippet
            .published_at
            .as_deref()
            .and_then(|value| DateTime::parse_from_rfc3339(value).ok())
            .map(|value| value.with_timezone(&Utc));

        VideoRecord {
            id: self.id,
            title: self.snippet.title,
            channel_id: self.snippet.channel_id,
            channel_title: self.snippet.channel_title,
            channel_thumbnail_url: None,
            published_at,
            duration,
            duration_seconds,
            duration_text,
            thumbnails: self.snippet.thumbnails,
            statistics: self.statistics,
        }
    }
}

/// Blocking HTTP client for the Data API.
pub struct YoutubeClient {
    agent: ureq::Agent,
    base_url: String,
    api_key: String,
}

impl YoutubeClient {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            agent,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            api_key: api_key.into(),
        }
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<T, UpstreamError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!(endpoint, ?params, "calling upstream");

        let mut request = self.agent.get(&url);
        for (name, value) in params {
            request = request.query(name, value);
        }
        request = request.query("key", &self.api_key);

        match request.call() {
            Ok(response) => response
                .into_json::<T>()
                .map_err(|err| UpstreamError::Decode(err.to_string())),
            Err(ureq::Error::Status(status, response)) => {
                let body = response.into_string().unwrap_or_default();
                debug!(endpoint, status, "upstream returned an error status");
                Err(UpstreamError::Status { status, body })
            }
            Err(ureq::Error::Transport(transport)) => {
                Err(UpstreamError::Transport(transport.to_string()))
            }
        }
    }
}

impl VideoPlatform for YoutubeClient {
    fn video_categories(&self, region: &str) -> Result<Vec<CategoryItem>, UpstreamError> {
        let response: ListResponse<CategoryItem> = self.get_json(
            "videoCategories",
            &[("part", "snippet"), ("regionCode", region)],
        )?;
        Ok(response.items)
    }

    fn most_popular(
        &self,
        region: Option<&str>,
        category: Option<&str>,
        max_results: usize,
    ) -> Result<Vec<VideoItem>, UpstreamError> {
        let max_results = max_results.to_string();
        let mut params = vec![
            ("part", VIDEO_PARTS),
            ("chart", "mostPopular"),
            ("maxResults", max_results.as_str()),
        ];
        if let Some(region) = region {
            params.push(("regionCode", region));
        }
        if let Some(category) = category {
            params.push(("videoCategoryId", category));
        }

        let response: ListResponse<VideoItem> = self.get_json("videos", &params)?;
        Ok(response.items)
    }

    fn search_video_ids(
        &self,
        category: &str,
        region: Option<&str>,
        max_results: usize,
    ) -> Result<Vec<String>, UpstreamError> {
        let max_results = max_results.to_string();
        let mut params = vec![
            ("part", "id"),
            ("type", "video"),
            ("order", "viewCount"),
            ("videoCategoryId", category),
            ("maxResults", max_results.as_str()),
        ];
        if let Some(region) = region {
            params.push(("regionCode", region));
        }

        let response: ListResponse<SearchItem> = self.get_json("search", &params)?;
        Ok(response
            .items
            .into_iter()
            .filter_map(|item| item.id.video_id)
            .filter(|id| !id.is_empty())
            .collect())
    }

    fn videos_by_id(&self, ids: &[String]) -> Result<Vec<VideoItem>, UpstreamError> {
        let joined = ids.join(",");
        let response: ListResponse<VideoItem> =
            self.get_json("videos", &[("part", VIDEO_PARTS), ("id", joined.as_str())])?;
        Ok(response.items)
    }

    fn channels_by_id(&self, ids: &[String]) -> Result<Vec<ChannelItem>, UpstreamError> {
        let joined = ids.join(",");
        let max_results = ids.len().to_string();
        let response: ListResponse<ChannelItem> = self.get_json(
            "channels",
            &[
                ("part", "snippet"),
                ("id", joined.as_str()),
                ("maxResults", max_results.as_str()),
            ],
        )?;
        Ok(response.items)
    }
}
