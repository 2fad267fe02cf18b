//! Channel avatar lookup for the cards in a result set.

use std::collections::{BTreeSet, HashMap};

use tracing::{debug, warn};

use crate::metadata::VideoRecord;
use crate::youtube::VideoPlatform;

/// Resolves avatar URLs for the distinct channels in `records` with a single
/// batched lookup.
///
/// At most `limit` channel ids are looked up; the rest are dropped with a
/// warning. Lookup failures never fail the request: they are logged and the
/// returned map is empty.
pub fn channel_thumbnails(
    platform: &dyn VideoPlatform,
    records: &[VideoRecord],
    limit: usize,
) -> HashMap<String, String> {
    let distinct: BTreeSet<&str> = records
        .iter()
        .map(|record| record.channel_id.as_str())
        .filter(|id| !id.is_empty())
        .collect();

    if distinct.is_empty() {
        return HashMap::new();
    }

    if distinct.len() > limit {
        warn!(
            channels = distinct.len(),
            limit,
            dropped = distinct.len() - limit,
            "too many channels for one lookup, some avatars will be missing"
        );
    }

    let ids: Vec<String> = distinct.into_iter().take(limit).map(str::to_owned).collect();

    match platform.channels_by_id(&ids) {
        Ok(channels) => {
            let mapping: HashMap<String, String> = channels
                .iter()
                .filter_map(|channel| {
                    channel
                        .avatar_url()
                        .map(|url| (channel.id.clone(), url.to_owned()))
                })
                .collect();
            debug!(requested = ids.len(), resolved = mapping.len(), "channel avatars resolved");
            mapping
        }
        Err(err) => {
            warn!(error = %err, "channel avatar lookup failed, continuing without avatars");
            HashMap::new()
        }
    }
}

pub fn apply_channel_thumbnails(records: &mut [VideoRecord], thumbnails: &HashMap<String, String>) {
    for record in records {
        record.channel_thumbnail_url = thumbnails.get(&record.channel_id).cloned();
    }
}
