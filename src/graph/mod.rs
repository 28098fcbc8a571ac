//! Open Graph API access.
//!
//! The [`FeedSource`] trait is the seam between the widget glue and the
//! network: [`GraphClient`] talks to the real API, tests substitute their own.

mod client;
pub mod models;

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

pub use client::GraphClient;
pub use models::{FeedResponse, Post, TokenResponse};

/// Which of the two requests a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Token,
    Feed,
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Token => f.write_str("token"),
            Self::Feed => f.write_str("feed"),
        }
    }
}

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("invalid {request} URL '{url}': {message}")]
    InvalidUrl {
        request: RequestKind,
        url: String,
        message: String,
    },
    #[error("{request} request failed: {source}")]
    Transport {
        request: RequestKind,
        #[source]
        source: reqwest::Error,
    },
    #[error("{request} request returned HTTP {status}")]
    Status {
        request: RequestKind,
        status: reqwest::StatusCode,
    },
    #[error("failed to decode {request} response: {source}")]
    Decode {
        request: RequestKind,
        #[source]
        source: reqwest::Error,
    },
}

impl FeedError {
    /// The request that failed, if the error came from one.
    #[must_use]
    pub fn request(&self) -> Option<RequestKind> {
        match self {
            Self::Client(_) => None,
            Self::InvalidUrl { request, .. }
            | Self::Transport { request, .. }
            | Self::Status { request, .. }
            | Self::Decode { request, .. } => Some(*request),
        }
    }
}

/// Something that can produce access tokens and page feeds.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Fetch an access token from a token generator endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body has no `access_token`.
    async fn fetch_token(&self, generator_url: &str) -> Result<String, FeedError>;

    /// Fetch up to `limit` posts from the feed of `page_name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a feed.
    async fn fetch_feed(
        &self,
        page_name: &str,
        access_token: &str,
        limit: u32,
    ) -> Result<FeedResponse, FeedError>;
}
