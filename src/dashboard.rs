//! The `/api/videos` pipeline: retrieve, enrich, rank, filter.

use tracing::debug;

use crate::config::FetchLimits;
use crate::enrich::{apply_channel_thumbnails, channel_thumbnails};
use crate::metadata::{VideoQuery, VideoRecord};
use crate::ranking::{filter_shorts, rank};
use crate::retriever::fetch_working_set;
use crate::youtube::{UpstreamError, VideoPlatform};

/// Runs one request end to end. Blocking; call from `spawn_blocking`.
pub fn trending_videos(
    platform: &dyn VideoPlatform,
    query: &VideoQuery,
    limits: FetchLimits,
) -> Result<Vec<VideoRecord>, UpstreamError> {
    let mut records = fetch_working_set(platform, query, limits.page_size)?;

    let avatars = channel_thumbnails(platform, &records, limits.channel_batch_limit);
    apply_channel_thumbnails(&mut records, &avatars);

    let total = records.len();
    let ranked = filter_shorts(rank(records, query.sort), query.shorts);
    debug!(
        total,
        kept = ranked.len(),
        sort = query.sort.as_str(),
        shorts = query.shorts.as_str(),
        "ranked working set"
    );

    Ok(ranked)
}
