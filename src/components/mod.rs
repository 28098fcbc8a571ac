//! Maud HTML components.
//!
//! - `post`: feed items, the loading placeholder and the widget container
//! - `layout`: full page wrapper used by the web server

pub mod layout;
pub mod post;

pub use layout::BaseLayout;
pub use post::{permalink, FeedFragment, LoadingPlaceholder, PostItem};
