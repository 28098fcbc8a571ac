use maud::{Markup, Render};

/// One rendered feed block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedItem {
    pub html: String,
}

impl RenderedItem {
    /// Render a component into an item.
    #[must_use]
    pub fn from_render(component: &impl Render) -> Self {
        Self {
            html: component.render().into_string(),
        }
    }
}

/// Destination for a widget's markup, standing in for the element the feed
/// is attached to.
pub trait FeedSink {
    /// Replace the whole contents with `markup`.
    fn replace(&mut self, markup: Markup);

    /// Remove all contents.
    fn clear(&mut self);

    /// Append one item after the existing contents.
    fn append(&mut self, item: RenderedItem);
}

/// In-memory sink collecting HTML.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HtmlBuffer {
    html: String,
    items: usize,
}

impl HtmlBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.html
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.html
    }

    /// Items appended since the last `clear` or `replace`.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.items
    }
}

impl FeedSink for HtmlBuffer {
    fn replace(&mut self, markup: Markup) {
        self.html = markup.into_string();
        self.items = 0;
    }

    fn clear(&mut self) {
        self.html.clear();
        self.items = 0;
    }

    fn append(&mut self, item: RenderedItem) {
        self.html.push_str(&item.html);
        self.items += 1;
    }
}
