//! Turn URL-like substrings of plain text into hyperlinks.
//!
//! Matching is a loose heuristic rather than an RFC 3986 parser: a match
//! starts with `http://`, `https://` or `www.`, runs over non-whitespace and
//! must end in two to four word characters (roughly a TLD), optionally
//! followed by a port and a path separator. Trailing punctuation such as a
//! sentence-ending period is usually left out of the link.

use std::sync::LazyLock;

use maud::{html, Markup};
use regex::Regex;

/// URL detection pattern. Everything except the `\S+` run is matched in
/// ASCII mode, so case folding never lets letters like U+212A KELVIN SIGN
/// stand in for `k` in the scheme, the TLD suffix or the path.
static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?-u:(https?://)|(www\.))(\S+)(?-u:([0-9a-z_]{2,4})(:[0-9]+)?(/|/([0-9a-z_#!:.?+=&%@!\-/]))?)",
    )
    .unwrap()
});

/// A piece of linkified text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Plain text between links.
    Text(&'a str),
    /// A detected URL.
    Link {
        /// Normalized link target.
        href: String,
        /// The text exactly as it appeared in the input.
        label: &'a str,
    },
}

/// Split `text` into plain-text and link segments, in input order.
///
/// Empty plain-text runs are omitted, so an empty input yields no segments.
#[must_use]
pub fn segments(text: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut last = 0;

    for m in URL_PATTERN.find_iter(text) {
        if m.start() > last {
            out.push(Segment::Text(&text[last..m.start()]));
        }
        out.push(Segment::Link {
            href: link_target(m.as_str()),
            label: m.as_str(),
        });
        last = m.end();
    }

    if last < text.len() {
        out.push(Segment::Text(&text[last..]));
    }

    out
}

/// Wrap every URL-like substring of `text` in an anchor element.
///
/// Surrounding text is HTML-escaped; the anchor label is the original matched
/// text and the `href` gains an `http://` prefix when no scheme is present.
///
/// # Example
///
/// ```
/// use facefeed::linkify::linkify;
///
/// let markup = linkify("see www.example.com/page");
/// assert_eq!(
///     markup.into_string(),
///     r#"see <a href="http://www.example.com/page">www.example.com/page</a>"#
/// );
/// ```
#[must_use]
pub fn linkify(text: &str) -> Markup {
    html! {
        @for segment in segments(text) {
            @match segment {
                Segment::Text(plain) => (plain),
                Segment::Link { href, label } => a href=(href) { (label) },
            }
        }
    }
}

/// Build the link target for a matched URL.
///
/// The scheme check is case-sensitive, so `HTTP://` is treated as schemeless.
fn link_target(matched: &str) -> String {
    if matched.starts_with("http://") || matched.starts_with("https://") {
        matched.to_string()
    } else {
        format!("http://{matched}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(text: &str) -> String {
        linkify(text).into_string()
    }

    #[test]
    fn test_empty_text_is_unchanged() {
        assert_eq!(render(""), "");
        assert!(segments("").is_empty());
    }

    #[test]
    fn test_text_without_links_is_unchanged() {
        assert_eq!(render("just some words"), "just some words");
    }

    #[test]
    fn test_http_link_keeps_surrounding_text() {
        assert_eq!(
            render("visit http://example.com now"),
            r#"visit <a href="http://example.com">http://example.com</a> now"#
        );
    }

    #[test]
    fn test_www_link_gains_scheme_but_keeps_label() {
        assert_eq!(
            render("see www.example.com/page"),
            r#"see <a href="http://www.example.com/page">www.example.com/page</a>"#
        );
    }

    #[test]
    fn test_https_link_is_kept() {
        assert_eq!(
            render("go https://rust-lang.org"),
            r#"go <a href="https://rust-lang.org">https://rust-lang.org</a>"#
        );
    }

    #[test]
    fn test_all_links_are_replaced() {
        let segs = segments("a http://one.com b www.two.org");
        assert_eq!(
            segs,
            vec![
                Segment::Text("a "),
                Segment::Link {
                    href: "http://one.com".to_string(),
                    label: "http://one.com",
                },
                Segment::Text(" b "),
                Segment::Link {
                    href: "http://www.two.org".to_string(),
                    label: "www.two.org",
                },
            ]
        );
    }

    #[test]
    fn test_trailing_punctuation_is_not_linked() {
        assert_eq!(
            render("see http://example.com."),
            r#"see <a href="http://example.com">http://example.com</a>."#
        );
        assert_eq!(
            render("(http://example.com)"),
            r#"(<a href="http://example.com">http://example.com</a>)"#
        );
    }

    #[test]
    fn test_paths_are_included() {
        assert_eq!(
            render("http://example.com/a/b.html"),
            r#"<a href="http://example.com/a/b.html">http://example.com/a/b.html</a>"#
        );
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        assert_eq!(
            render("WWW.EXAMPLE.COM"),
            r#"<a href="http://WWW.EXAMPLE.COM">WWW.EXAMPLE.COM</a>"#
        );
    }

    #[test]
    fn test_unicode_case_folds_do_not_extend_suffix() {
        // KELVIN SIGN folds to `k` under Unicode rules but is not a word character here.
        assert_eq!(
            segments("www.exampl\u{212A}\u{212A}"),
            vec![
                Segment::Link {
                    href: "http://www.exampl".to_string(),
                    label: "www.exampl",
                },
                Segment::Text("\u{212A}\u{212A}"),
            ]
        );
        // LONG S folds to `s`; without it there is no two-letter suffix at all.
        assert_eq!(render("www.a.\u{17F}\u{17F}"), "www.a.\u{17F}\u{17F}");
        assert_eq!(render("http\u{17F}://example.com"), "http\u{17F}://example.com");
    }

    #[test]
    fn test_uppercase_scheme_is_treated_as_schemeless() {
        assert_eq!(link_target("HTTP://EXAMPLE.COM"), "http://HTTP://EXAMPLE.COM");
    }

    #[test]
    fn test_query_string_is_attribute_escaped() {
        assert_eq!(
            render("http://example.com/?a=1&b=22"),
            r#"<a href="http://example.com/?a=1&amp;b=22">http://example.com/?a=1&amp;b=22</a>"#
        );
    }

    #[test]
    fn test_markup_in_text_is_escaped() {
        let out = render(r#"<b>hi</b> www.evil.com/"><script>"#);
        assert!(out.starts_with("&lt;b&gt;hi&lt;/b&gt; <a href="));
        assert!(!out.contains("<script"));
        assert!(!out.contains("<b>"));
        assert!(out.contains("&lt;script"));
    }
}
