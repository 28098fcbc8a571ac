//! Feed fetch and render glue.
//!
//! A load puts the loading placeholder into the sink, resolves an access
//! token, fetches the feed and, only if everything succeeded, replaces the
//! placeholder with one block per post. Failures leave the placeholder in
//! place and are returned to the caller.

mod sink;

use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use maud::Render;
use tracing::{debug, info, warn};

use crate::components::{LoadingPlaceholder, PostItem};
use crate::config::{TokenSource, WidgetConfig};
use crate::graph::{FeedError, FeedResponse, FeedSource};

pub use sink::{FeedSink, HtmlBuffer, RenderedItem};

/// Work out which access token to send with the feed request.
///
/// # Errors
///
/// Returns an error if the token generator request fails.
pub async fn resolve_token<S>(source: &S, widget: &WidgetConfig) -> Result<String, FeedError>
where
    S: FeedSource + ?Sized,
{
    match &widget.token {
        TokenSource::Static(token) => Ok(token.clone()),
        TokenSource::Generator(url) => {
            debug!(widget = %widget.name, "Fetching token from generator");
            source.fetch_token(url).await
        }
    }
}

/// Resolve a token, then fetch the widget's feed.
///
/// The feed request is only issued once the token is known.
///
/// # Errors
///
/// Returns an error if either request fails.
pub async fn fetch_posts<S>(source: &S, widget: &WidgetConfig) -> Result<FeedResponse, FeedError>
where
    S: FeedSource + ?Sized,
{
    let token = resolve_token(source, widget).await?;
    source
        .fetch_feed(&widget.page_name, &token, widget.posts_to_fetch)
        .await
}

/// Render every post of `feed` in response order.
#[must_use]
pub fn render_posts(
    feed: &FeedResponse,
    widget: &WidgetConfig,
    now: DateTime<Utc>,
) -> Vec<RenderedItem> {
    feed.data
        .iter()
        .map(|post| RenderedItem::from_render(&PostItem::new(post, widget, now)))
        .collect()
}

/// Load a widget into `sink`, dating posts relative to the moment the feed
/// arrives. Returns the number of posts rendered.
///
/// # Errors
///
/// Returns an error if the token or feed request fails. The sink then still
/// holds the loading placeholder.
pub async fn load<S, K>(
    source: &S,
    widget: &WidgetConfig,
    sink: &mut K,
) -> Result<usize, FeedError>
where
    S: FeedSource + ?Sized,
    K: FeedSink + ?Sized,
{
    load_with_clock(source, widget, sink, Utc::now).await
}

/// Like [`load`], with a fixed reference instant for relative dates.
///
/// # Errors
///
/// Returns an error if the token or feed request fails.
pub async fn load_at<S, K>(
    source: &S,
    widget: &WidgetConfig,
    sink: &mut K,
    now: DateTime<Utc>,
) -> Result<usize, FeedError>
where
    S: FeedSource + ?Sized,
    K: FeedSink + ?Sized,
{
    load_with_clock(source, widget, sink, move || now).await
}

async fn load_with_clock<S, K, F>(
    source: &S,
    widget: &WidgetConfig,
    sink: &mut K,
    clock: F,
) -> Result<usize, FeedError>
where
    S: FeedSource + ?Sized,
    K: FeedSink + ?Sized,
    F: FnOnce() -> DateTime<Utc>,
{
    sink.replace(LoadingPlaceholder.render());

    let feed = match fetch_posts(source, widget).await {
        Ok(feed) => feed,
        Err(e) => {
            warn!(widget = %widget.name, page = %widget.page_name, "Failed to load feed: {e}");
            return Err(e);
        }
    };

    let items = render_posts(&feed, widget, clock());
    let count = items.len();

    sink.clear();
    for item in items {
        sink.append(item);
    }

    info!(widget = %widget.name, posts = count, "Rendered feed");
    Ok(count)
}

/// Result of loading one widget as part of [`load_all`].
#[derive(Debug)]
pub struct WidgetOutput<'a> {
    pub widget: &'a WidgetConfig,
    pub html: HtmlBuffer,
    pub result: Result<usize, FeedError>,
}

/// Load several widgets concurrently. Each gets its own buffer; output order
/// matches `widgets` regardless of which request finishes first.
pub async fn load_all<'a, S>(source: &S, widgets: &'a [WidgetConfig]) -> Vec<WidgetOutput<'a>>
where
    S: FeedSource + ?Sized,
{
    join_all(widgets.iter().map(|widget| async move {
        let mut html = HtmlBuffer::new();
        let result = load(source, widget, &mut html).await;
        WidgetOutput {
            widget,
            html,
            result,
        }
    }))
    .await
}
