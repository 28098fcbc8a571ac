//! Relative time formatting ("distance of time in words").
//!
//! Converts an absolute timestamp into phrases like `"3 hours ago"`, using
//! the same coarse buckets as Rails' `distance_of_time_in_words`.

use chrono::{DateTime, Utc};

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;

/// Describe how long ago `past` was, relative to the current instant.
#[must_use]
pub fn time_ago(past: DateTime<Utc>) -> String {
    distance_of_time_in_words(past, Utc::now())
}

/// Describe the distance from `past` to `now` in words.
///
/// The delta is measured in whole seconds, truncated toward zero. Buckets are
/// closed-open and the first match wins. A `past` later than `now` yields a
/// negative delta, which is not rejected and lands in the first bucket.
///
/// # Example
///
/// ```
/// use chrono::{Duration, Utc};
/// use facefeed::time_ago::distance_of_time_in_words;
///
/// let now = Utc::now();
/// assert_eq!(distance_of_time_in_words(now - Duration::hours(3), now), "3 hours ago");
/// ```
#[must_use]
pub fn distance_of_time_in_words(past: DateTime<Utc>, now: DateTime<Utc>) -> String {
    describe_seconds((now - past).num_seconds())
}

/// Map a delta in seconds onto its bucket phrase.
#[must_use]
pub fn describe_seconds(delta: i64) -> String {
    if delta < MINUTE {
        format!("{delta} seconds ago")
    } else if delta < 2 * MINUTE {
        "a minute ago".to_string()
    } else if delta < 45 * MINUTE {
        format!("{} minutes ago", delta / MINUTE)
    } else if delta < 2 * HOUR {
        "an hour ago".to_string()
    } else if delta < DAY {
        format!("{} hours ago", delta / HOUR)
    } else if delta < 2 * DAY {
        "a day ago".to_string()
    } else {
        format!("{} days ago", delta / DAY)
    }
}
