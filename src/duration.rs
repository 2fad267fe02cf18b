//! Helpers for the compact ISO-8601 durations the platform reports in
//! `contentDetails.duration` (e.g. `PT4M13S`).

use std::sync::LazyLock;

use regex::Regex;

/// Days are only emitted for streams longer than 24 hours (`P1DT2H`).
static DURATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^P(?:(\d+)D)?(?:T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?)?$")
        .expect("duration pattern is valid")
});

/// Parses an encoded duration into total seconds.
///
/// Returns `None` for anything that is not a well formed duration, including
/// a bare `P` or `PT` with no components.
pub fn parse_duration(encoded: &str) -> Option<u64> {
    let caps = DURATION_RE.captures(encoded.trim())?;
    if caps.iter().skip(1).all(|group| group.is_none()) {
        return None;
    }

    let component = |index: usize| -> Option<u64> {
        match caps.get(index) {
            Some(value) => value.as_str().parse().ok(),
            None => Some(0),
        }
    };

    let days = component(1)?;
    let hours = component(2)?;
    let minutes = component(3)?;
    let seconds = component(4)?;

    days.checked_mul(86_400)?
        .checked_add(hours.checked_mul(3_600)?)?
        .checked_add(minutes.checked_mul(60)?)?
        .checked_add(seconds)
}

/// Formats seconds as `H:MM:SS` when there is at least one hour, `M:SS`
/// otherwise.
pub fn format_duration(total: u64) -> String {
    let hours = total / 3_600;
    let minutes = (total % 3_600) / 60;
    let seconds = total % 60;

    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}

/// Seconds plus display text. Missing or malformed input degrades to
/// `(0, "")` instead of failing.
pub fn describe_duration(encoded: Option<&str>) -> (u64, String) {
    match encoded.and_then(parse_duration) {
        Some(total) => (total, format_duration(total)),
        None => (0, String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_duration() {
        assert_eq!(describe_duration(Some("PT1H2M3S")), (3723, "1:02:03".into()));
    }

    #[test]
    fn parses_minutes_and_seconds() {
        assert_eq!(describe_duration(Some("PT5M9S")), (309, "5:09".into()));
    }

    #[test]
    fn missing_components_count_as_zero() {
        assert_eq!(parse_duration("PT45S"), Some(45));
        assert_eq!(parse_duration("PT10M"), Some(600));
        assert_eq!(parse_duration("PT2H"), Some(7200));
        assert_eq!(parse_duration("PT1H30S"), Some(3630));
        assert_eq!(describe_duration(Some("PT0S")), (0, "0:00".into()));
    }

    #[test]
    fn folds_days_into_hours() {
        assert_eq!(parse_duration("P1DT2H"), Some(93_600));
        assert_eq!(format_duration(93_600), "26:00:00");
    }

    #[test]
    fn empty_or_absent_input_degrades() {
        assert_eq!(describe_duration(Some("")), (0, String::new()));
        assert_eq!(describe_duration(None), (0, String::new()));
    }

    #[test]
    fn malformed_input_degrades() {
        for raw in ["PT", "P", "5:09", "PT5X", "1H2M", "PT-5S"] {
            assert_eq!(describe_duration(Some(raw)), (0, String::new()), "{raw}");
        }
    }

    #[test]
    fn absurd_values_do_not_overflow() {
        assert_eq!(parse_duration("P99999999999999999999D"), None);
        assert_eq!(parse_duration("P999999999999999DT1S"), None);
    }
}
