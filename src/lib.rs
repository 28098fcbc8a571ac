//! facefeed library.
//!
//! Fetches a Facebook page's public post feed from the Open Graph API and
//! renders it as an HTML fragment: linkified post text plus a relative date
//! linking to each post.

// Allow raw string hashes for safety - they're harmless and prevent issues if content changes
#![allow(clippy::needless_raw_string_hashes)]

pub mod components;
pub mod config;
pub mod constants;
pub mod graph;
pub mod linkify;
pub mod time_ago;
pub mod web;
pub mod widget;
