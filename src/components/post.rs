//! Feed item components.
//!
//! Each post renders as one `<p>` block: the linkified post text, a line
//! break, and a date label linking to the post's permalink.

use chrono::{DateTime, Utc};
use maud::{html, Markup, PreEscaped, Render};

use crate::config::WidgetConfig;
use crate::constants::{LOADING_MESSAGE, PERMALINK_BASE};
use crate::graph::Post;
use crate::linkify::linkify;
use crate::time_ago::distance_of_time_in_words;

/// Permalink for a post on a page.
#[must_use]
pub fn permalink(page_name: &str, post_id: &str) -> String {
    format!("{PERMALINK_BASE}/{page_name}/posts/{post_id}")
}

/// A single rendered post.
///
/// # Example
///
/// ```ignore
/// let item = PostItem::new(&post, &widget, Utc::now());
/// let html = item.render().into_string();
/// ```
#[derive(Debug, Clone)]
pub struct PostItem<'a> {
    pub post: &'a Post,
    pub page_name: &'a str,
    pub date_class: &'a str,
    /// Reference instant for the relative date.
    pub now: DateTime<Utc>,
}

impl<'a> PostItem<'a> {
    #[must_use]
    pub fn new(post: &'a Post, widget: &'a WidgetConfig, now: DateTime<Utc>) -> Self {
        Self {
            post,
            page_name: &widget.page_name,
            date_class: &widget.date_class,
            now,
        }
    }
}

impl Render for PostItem<'_> {
    fn render(&self) -> Markup {
        let when = distance_of_time_in_words(self.post.updated_time, self.now);

        html! {
            p {
                (linkify(self.post.display_text()))
                br;
                span class=(self.date_class) {
                    a href=(permalink(self.page_name, &self.post.id)) { (when) }
                }
            }
        }
    }
}

/// Placeholder shown until the feed arrives.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadingPlaceholder;

impl Render for LoadingPlaceholder {
    fn render(&self) -> Markup {
        html! {
            p { (LOADING_MESSAGE) }
        }
    }
}

/// Container element for one widget's rendered contents.
#[derive(Debug, Clone)]
pub struct FeedFragment<'a> {
    pub name: &'a str,
    /// Already-rendered inner HTML.
    pub contents: &'a str,
}

impl<'a> FeedFragment<'a> {
    #[must_use]
    pub const fn new(name: &'a str, contents: &'a str) -> Self {
        Self { name, contents }
    }
}

impl Render for FeedFragment<'_> {
    fn render(&self) -> Markup {
        html! {
            div class="facefeed" data-feed=(self.name) {
                (PreEscaped(self.contents))
            }
        }
    }
}
