//! Word-level utilities: counting, trimming, and term highlighting.

use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

use crate::strip_tags;

/// Count words in `html` after stripping markup.
///
/// A word is a run of letters, optionally continued by apostrophes and
/// hyphens. Digits and punctuation separate words.
pub fn count_words(html: &str) -> usize {
    static WORD_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\p{L}[\p{L}'\-]*").expect("valid regex"));

    WORD_RE.find_iter(&strip_tags(html)).count()
}

/// Keep the first `limit` whitespace-separated words of the stripped text,
/// appending `more` when anything was cut.
pub fn trim_words(html: &str, limit: usize, more: &str) -> String {
    let text = strip_tags(html);
    let words: Vec<&str> = text.split_whitespace().collect();

    if words.len() <= limit {
        return words.join(" ");
    }

    let mut trimmed = words[..limit].join(" ");
    trimmed.push_str(more);
    trimmed
}

/// Wrap every case-insensitive occurrence of `term` in `<mark>` tags.
///
/// The original casing of each occurrence is preserved. An empty term leaves
/// the text unchanged.
pub fn highlight_term(text: &str, term: &str) -> String {
    if term.is_empty() {
        return text.to_string();
    }

    let Ok(re) = RegexBuilder::new(&regex::escape(term))
        .case_insensitive(true)
        .build()
    else {
        return text.to_string();
    };

    re.replace_all(text, "<mark>$0</mark>").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_words_ignores_markup_and_digits() {
        assert_eq!(count_words("<p>Hello <b>brave</b> new world</p>"), 4);
        assert_eq!(count_words("version 2 of the tool"), 4);
        assert_eq!(count_words("it's a well-known fact"), 4);
        assert_eq!(count_words(""), 0);
    }

    #[test]
    fn trim_words_appends_marker_only_when_cut() {
        assert_eq!(trim_words("one two three", 5, "..."), "one two three");
        assert_eq!(trim_words("one two three four", 2, "..."), "one two...");
        assert_eq!(trim_words("<p>one</p> <p>two</p>", 1, "..."), "one...");
    }

    #[test]
    fn highlight_term_is_case_insensitive() {
        assert_eq!(
            highlight_term("Install the installer", "install"),
            "<mark>Install</mark> the <mark>install</mark>er"
        );
    }

    #[test]
    fn highlight_term_escapes_regex_metacharacters() {
        assert_eq!(highlight_term("a+b = c", "a+b"), "<mark>a+b</mark> = c");
        assert_eq!(highlight_term("unchanged", ""), "unchanged");
    }
}
