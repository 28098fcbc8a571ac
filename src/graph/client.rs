use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use super::{FeedError, FeedResponse, FeedSource, RequestKind, TokenResponse};
use crate::constants::USER_AGENT;

/// reqwest-backed Open Graph client.
#[derive(Debug, Clone)]
pub struct GraphClient {
    client: Client,
    base_url: Url,
}

impl GraphClient {
    /// Create a client for the Graph API rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not an absolute URL or the HTTP
    /// client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FeedError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(FeedError::Client)?;

        Self::with_client(client, base_url)
    }

    /// Create a client reusing an existing reqwest client.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not an absolute URL.
    pub fn with_client(client: Client, base_url: &str) -> Result<Self, FeedError> {
        let base_url = parse_url(RequestKind::Feed, base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(FeedError::InvalidUrl {
                request: RequestKind::Feed,
                url: base_url.to_string(),
                message: "cannot be used as a base URL".to_string(),
            });
        }
        Ok(Self { client, base_url })
    }

    /// Build `{base}/{page_name}/feed?access_token=..&limit=..`.
    #[must_use]
    pub fn feed_url(&self, page_name: &str, access_token: &str, limit: u32) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(page_name).push("feed");
        }
        url.query_pairs_mut()
            .append_pair("access_token", access_token)
            .append_pair("limit", &limit.to_string());
        url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        request: RequestKind,
        url: Url,
    ) -> Result<T, FeedError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FeedError::Transport { request, source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status { request, status });
        }

        response
            .json::<T>()
            .await
            .map_err(|source| FeedError::Decode { request, source })
    }
}

#[async_trait]
impl FeedSource for GraphClient {
    async fn fetch_token(&self, generator_url: &str) -> Result<String, FeedError> {
        let url = parse_url(RequestKind::Token, generator_url)?;
        debug!(url = %url, "Requesting access token");

        let token: TokenResponse = self.get_json(RequestKind::Token, url).await?;
        Ok(token.access_token)
    }

    async fn fetch_feed(
        &self,
        page_name: &str,
        access_token: &str,
        limit: u32,
    ) -> Result<FeedResponse, FeedError> {
        let url = self.feed_url(page_name, access_token, limit);
        // The URL carries the token, so only log the page.
        debug!(page = %page_name, limit, "Requesting page feed");

        self.get_json(RequestKind::Feed, url).await
    }
}

fn parse_url(request: RequestKind, raw: &str) -> Result<Url, FeedError> {
    Url::parse(raw).map_err(|e| FeedError::InvalidUrl {
        request,
        url: raw.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> GraphClient {
        GraphClient::new(base, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_feed_url() {
        let url = client("https://graph.facebook.com").feed_url("mypage", "abc", 5);
        assert_eq!(
            url.as_str(),
            "https://graph.facebook.com/mypage/feed?access_token=abc&limit=5"
        );
    }

    #[test]
    fn test_feed_url_with_base_path() {
        let url = client("http://localhost:9000/v2.0/").feed_url("mypage", "abc", 10);
        assert_eq!(
            url.as_str(),
            "http://localhost:9000/v2.0/mypage/feed?access_token=abc&limit=10"
        );
    }

    #[test]
    fn test_feed_url_encodes_token() {
        let url = client("https://graph.facebook.com").feed_url("mypage", "a|b c", 1);
        assert_eq!(
            url.as_str(),
            "https://graph.facebook.com/mypage/feed?access_token=a%7Cb+c&limit=1"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let err = GraphClient::new("not a url", Duration::from_secs(5)).unwrap_err();
        assert!(matches!(err, FeedError::InvalidUrl { .. }));
        assert_eq!(err.request(), Some(RequestKind::Feed));
    }

    #[test]
    fn test_cannot_be_a_base_url() {
        let err = GraphClient::new("mailto:someone@example.com", Duration::from_secs(5))
            .unwrap_err();
        assert!(matches!(err, FeedError::InvalidUrl { .. }));
    }
}
