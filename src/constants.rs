//! Shared constants used across the application.

/// User agent string sent with Graph API and token requests.
pub const USER_AGENT: &str = concat!("facefeed/", env!("CARGO_PKG_VERSION"));

/// Default Open Graph API root.
pub const DEFAULT_GRAPH_URL: &str = "https://graph.facebook.com";

/// Root used to build post permalinks.
pub const PERMALINK_BASE: &str = "https://www.facebook.com";

/// Text shown while a feed is loading, and left in place if it fails.
pub const LOADING_MESSAGE: &str = "Loading status updates...";

/// Number of posts requested when not configured.
pub const DEFAULT_POSTS_TO_FETCH: u32 = 5;

/// CSS class of the date label when not configured.
pub const DEFAULT_DATE_CLASS: &str = "date";
