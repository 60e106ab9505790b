//! Plain-text helpers over rendered article markup.
//!
//! Article bodies arrive as HTML-ish strings from an upstream editor. This crate
//! turns them into plain text (tag stripping, entity decoding), escapes text for
//! re-embedding in markup, and provides the word-level utilities used for read
//! time, excerpts, and search highlighting.

mod words;

use scraper::Html;

pub use words::{count_words, highlight_term, trim_words};

// ---------------------------------------------------------------------------
// Tag stripping
// ---------------------------------------------------------------------------

/// Strip all markup from `html`, returning whitespace-normalized plain text.
///
/// Entities are decoded and the contents of `<script>` and `<style>` elements
/// are dropped entirely. Never fails: malformed markup is parsed leniently.
pub fn strip_tags(html: &str) -> String {
    if !html.contains('<') && !html.contains('&') {
        return collapse_whitespace(html);
    }

    let fragment = Html::parse_fragment(html);
    let mut text = String::with_capacity(html.len());

    for node in fragment.tree.root().descendants() {
        let Some(chunk) = node.value().as_text() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| matches!(el.name(), "script" | "style"))
        });
        if !hidden {
            text.push_str(chunk);
        }
    }

    collapse_whitespace(&text)
}

/// Decode character references in a raw attribute value, as a browser would
/// when building the DOM. Values without `&` are returned unchanged.
pub fn decode_attr(value: &str) -> String {
    if !value.contains('&') {
        return value.to_string();
    }

    let wrapped = format!(r#"<span title="{}"></span>"#, value.replace('"', "&quot;"));
    let fragment = Html::parse_fragment(&wrapped);
    fragment
        .tree
        .root()
        .descendants()
        .filter_map(|node| node.value().as_element())
        .find(|el| el.name() == "span")
        .and_then(|el| el.attr("title"))
        .unwrap_or(value)
        .to_string()
}

/// Collapse every whitespace run to a single space and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ---------------------------------------------------------------------------
// Escaping
// ---------------------------------------------------------------------------

/// Escape text for use as element content.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape text for use inside a double-quoted attribute value.
pub fn escape_attr(text: &str) -> String {
    escape_html(text)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_tags_removes_inline_markup() {
        assert_eq!(
            strip_tags("Getting <em>Started</em> with <code>ctdocs</code>"),
            "Getting Started with ctdocs"
        );
    }

    #[test]
    fn strip_tags_decodes_entities() {
        assert_eq!(strip_tags("Tips &amp; Tricks"), "Tips & Tricks");
        assert_eq!(strip_tags("a &lt;b&gt; c"), "a <b> c");
    }

    #[test]
    fn strip_tags_drops_script_and_style() {
        let html = "<p>Visible</p><script>var hidden = 1;</script><style>p{}</style>";
        assert_eq!(strip_tags(html), "Visible");
    }

    #[test]
    fn strip_tags_normalizes_whitespace() {
        assert_eq!(strip_tags("  one\n\t two  "), "one two");
        assert_eq!(strip_tags("<p>\n  spaced\n</p>"), "spaced");
    }

    #[test]
    fn strip_tags_empty_input() {
        assert_eq!(strip_tags(""), "");
        assert_eq!(strip_tags("<span></span>"), "");
    }

    #[test]
    fn decode_attr_resolves_references() {
        assert_eq!(decode_attr("a&amp;b"), "a&b");
        assert_eq!(decode_attr(r#"say "hi" &lt;3"#), r#"say "hi" <3"#);
        assert_eq!(decode_attr("plain-id"), "plain-id");
    }

    #[test]
    fn escape_html_covers_special_characters() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom's & Jerry</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom&#039;s &amp; Jerry&lt;/a&gt;"
        );
        assert_eq!(escape_attr("plain-anchor"), "plain-anchor");
    }
}
