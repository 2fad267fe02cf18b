//! Category list for the dashboard's filter selector.

use crate::metadata::{CategoryOption, DEFAULT_CATEGORY_REGION, region_scope};
use crate::youtube::{UpstreamError, VideoPlatform};

/// Fetches the categories valid for `region`, in upstream order.
///
/// Entries missing an id or a title are dropped. The upstream listing needs
/// a concrete region, so the worldwide sentinel is resolved against
/// [`DEFAULT_CATEGORY_REGION`].
pub fn fetch_categories(
    platform: &dyn VideoPlatform,
    region: &str,
) -> Result<Vec<CategoryOption>, UpstreamError> {
    let scope = region_scope(region).unwrap_or(DEFAULT_CATEGORY_REGION);
    let items = platform.video_categories(scope)?;

    Ok(items
        .into_iter()
        .filter(|item| !item.id.trim().is_empty() && !item.snippet.title.trim().is_empty())
        .map(|item| CategoryOption {
            value: item.id,
            label: item.snippet.title,
        })
        .collect())
}

/// Prepends the "all" sentinel.
pub fn with_all_option(categories: Vec<CategoryOption>) -> Vec<CategoryOption> {
    let mut options = Vec::with_capacity(categories.len() + 1);
    options.push(CategoryOption::all());
    options.extend(categories);
    options
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ScriptedPlatform, category, status};

    #[test]
    fn blank_entries_are_dropped() {
        let platform = ScriptedPlatform {
            categories: Some(Ok(vec![
                category("1", "Film & Animation"),
                category("", "Orphan"),
                category("19", " "),
                category("10", "Music"),
            ])),
            ..ScriptedPlatform::default()
        };

        let options = with_all_option(fetch_categories(&platform, "US").unwrap());

        let values: Vec<_> = options.iter().map(|option| option.value.as_str()).collect();
        assert_eq!(values, ["all", "1", "10"]);
        assert_eq!(options[0].label, "All");
        assert_eq!(options[2].label, "Music");
        assert_eq!(platform.calls(), ["categories region=US"]);
    }

    #[test]
    fn worldwide_uses_the_default_region() {
        let platform = ScriptedPlatform::default();

        fetch_categories(&platform, "WW").unwrap();

        assert_eq!(platform.calls(), ["categories region=US"]);
    }

    #[test]
    fn upstream_failure_is_returned() {
        let platform = ScriptedPlatform {
            categories: Some(Err(status(400, "invalidRegionCode"))),
            ..ScriptedPlatform::default()
        };

        let err = fetch_categories(&platform, "ZZ").unwrap_err();
        assert_eq!(err.details(), "invalidRegionCode");
    }
}
