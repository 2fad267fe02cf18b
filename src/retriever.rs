//! Builds the working set of videos for a query.
//!
//! The "most popular" chart is the primary source. Some categories are not
//! charted upstream and the chart answers 404 for them; only in that case do
//! we fall back to a view-ordered search (region scoped first, then
//! worldwide) and hydrate the resulting ids into full records, since search
//! results carry no statistics. The working set is returned unsorted and
//! unfiltered.

use std::collections::HashSet;

use tracing::{debug, info};

use crate::metadata::{VideoQuery, VideoRecord};
use crate::youtube::{UpstreamError, VideoItem, VideoPlatform};

pub fn fetch_working_set(
    platform: &dyn VideoPlatform,
    query: &VideoQuery,
    page_size: usize,
) -> Result<Vec<VideoRecord>, UpstreamError> {
    let region = query.region_scope();
    let category = query.category_scope();

    let items = match platform.most_popular(region, category, page_size) {
        Ok(items) => {
            debug!(count = items.len(), "most popular chart answered");
            items
        }
        Err(err) if err.is_not_found() => match category {
            Some(category) => {
                info!(category, region = ?region, "category is not charted, searching instead");
                search_fallback(platform, category, region, page_size)?
            }
            // A 404 for the unscoped chart is a real failure.
            None => return Err(err),
        },
        Err(err) => return Err(err),
    };

    Ok(items.into_iter().map(VideoItem::into_record).collect())
}

fn search_fallback(
    platform: &dyn VideoPlatform,
    category: &str,
    region: Option<&str>,
    page_size: usize,
) -> Result<Vec<VideoItem>, UpstreamError> {
    let mut ids = platform.search_video_ids(category, region, page_size)?;

    // Broaden to worldwide once; regional tagging is sparse for some categories.
    if ids.is_empty() && region.is_some() {
        info!(category, "regional search found nothing, retrying worldwide");
        ids = platform.search_video_ids(category, None, page_size)?;
    }

    let ids = dedupe_ids(ids, page_size);
    if ids.is_empty() {
        info!(category, "search fallback found no videos");
        return Ok(Vec::new());
    }

    debug!(count = ids.len(), "hydrating search results");
    platform.videos_by_id(&ids)
}

/// Drops repeated ids, keeping first occurrences, and caps the list.
fn dedupe_ids(ids: Vec<String>, limit: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    ids.into_iter()
        .filter(|id| seen.insert(id.clone()))
        .take(limit)
        .collect()
}
