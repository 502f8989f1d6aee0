//! Creation time parsing
//!
//! Feeds deliver `created_at` in several shapes. Parsing happens once per post;
//! input that does not parse becomes `None` and is never replaced by a default.

use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use std::cmp::Ordering;

use crate::types::ClassifiedPost;

/// Twitter API timestamp, e.g. `Wed Oct 10 20:19:24 +0000 2018`
const TWITTER_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

/// Naive forms, interpreted as UTC
const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Parse a feed timestamp into a point in time
pub fn parse_created_at(value: &str) -> Option<DateTime<FixedOffset>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt);
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(value) {
        return Some(dt);
    }
    if let Ok(dt) = DateTime::parse_from_str(value, TWITTER_FORMAT) {
        return Some(dt);
    }

    NAIVE_FORMATS.iter().find_map(|format| {
        NaiveDateTime::parse_from_str(value, format)
            .ok()
            .map(|naive| naive.and_utc().fixed_offset())
    })
}

/// Order two optional times, placing `None` after every valid time
pub fn compare_times(
    a: Option<&DateTime<FixedOffset>>,
    b: Option<&DateTime<FixedOffset>>,
) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Sort posts oldest first. Stable; posts without a valid time go last.
pub fn sort_chronologically(posts: &mut [ClassifiedPost]) {
    posts.sort_by(|a, b| compare_times(a.timestamp.as_ref(), b.timestamp.as_ref()));
}

/// Convert a parsed time to UTC
pub fn to_utc(dt: &DateTime<FixedOffset>) -> DateTime<Utc> {
    dt.with_timezone(&Utc)
}
