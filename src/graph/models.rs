//! Wire types for the Open Graph feed and token endpoints.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Response from `GET /{page}/feed`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedResponse {
    /// Posts in the order the API returned them.
    #[serde(default)]
    pub data: Vec<Post>,
}

/// A single post on a page feed.
#[derive(Debug, Clone, Deserialize)]
pub struct Post {
    pub id: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub story: Option<String>,
    #[serde(with = "graph_time")]
    pub updated_time: DateTime<Utc>,
}

impl Post {
    /// Text shown for the post: the message, else the story, else nothing.
    ///
    /// An empty message falls through to the story.
    #[must_use]
    pub fn display_text(&self) -> &str {
        self.message
            .as_deref()
            .filter(|m| !m.is_empty())
            .or(self.story.as_deref())
            .unwrap_or("")
    }
}

/// Response from a token generator endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
}

/// Graph API timestamps look like `2012-05-10T18:02:19+0000`, which is not
/// RFC 3339 (no colon in the offset). Both forms are accepted.
pub mod graph_time {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer};

    const GRAPH_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

    /// Parse a Graph API timestamp.
    ///
    /// # Errors
    ///
    /// Returns an error if the value matches neither the Graph format nor RFC 3339.
    pub fn parse(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
        DateTime::parse_from_str(value, GRAPH_FORMAT)
            .or_else(|_| DateTime::parse_from_rfc3339(value))
            .map(|dt| dt.with_timezone(&Utc))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }
}
