//! Anchor assignment: slugify heading labels and keep them unique per run.

use std::collections::HashSet;

/// Convert arbitrary text into a lowercase, hyphen-separated ASCII slug.
///
/// Common accented Latin letters are transliterated (`é` → `e`, `ß` → `ss`),
/// apostrophes are dropped, and every other run of non-alphanumeric
/// characters becomes a single hyphen. Leading and trailing hyphens are
/// trimmed, so the result may be empty.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;

    for c in text.chars().flat_map(char::to_lowercase) {
        if matches!(c, '\'' | '\u{2018}' | '\u{2019}') {
            continue;
        }

        let mut push_ascii = |a: char| {
            if a.is_ascii_alphanumeric() {
                if pending_hyphen && !slug.is_empty() {
                    slug.push('-');
                }
                pending_hyphen = false;
                slug.push(a.to_ascii_lowercase());
            } else {
                pending_hyphen = true;
            }
        };

        if c.is_ascii() {
            push_ascii(c);
        } else if let Some(folded) = transliterate(c) {
            folded.chars().for_each(&mut push_ascii);
        } else {
            push_ascii('-');
        }
    }

    slug
}

fn transliterate(c: char) -> Option<&'static str> {
    let folded = match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => "a",
        'æ' => "ae",
        'ç' | 'ć' | 'č' => "c",
        'ď' | 'đ' | 'ð' => "d",
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ė' | 'ę' | 'ě' => "e",
        'ì' | 'í' | 'î' | 'ï' | 'ī' | 'į' | 'ı' => "i",
        'ł' | 'ľ' | 'ĺ' => "l",
        'ñ' | 'ń' | 'ň' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ő' => "o",
        'œ' => "oe",
        'ŕ' | 'ř' => "r",
        'ś' | 'š' | 'ş' => "s",
        'ß' => "ss",
        'ť' | 'ţ' => "t",
        'þ' => "th",
        'ù' | 'ú' | 'û' | 'ü' | 'ū' | 'ů' | 'ű' | 'ų' => "u",
        'ý' | 'ÿ' => "y",
        'ź' | 'ż' | 'ž' => "z",
        _ => return None,
    };
    Some(folded)
}

/// Hands out anchors that are unique within one generation run.
#[derive(Debug, Default)]
pub struct AnchorAssigner {
    used: HashSet<String>,
}

impl AnchorAssigner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark an anchor as taken without generating it (e.g. an `id` already
    /// present in the markup).
    pub fn reserve(&mut self, anchor: &str) {
        self.used.insert(anchor.to_string());
    }

    /// Produce a fresh anchor for `text`.
    ///
    /// `position` is the 1-based index of the heading in the document and only
    /// matters when the label has no alphanumeric content (`section-<position>`).
    /// Collisions get the first free `-1`, `-2`, … suffix.
    pub fn assign(&mut self, text: &str, position: usize) -> String {
        let mut base = slugify(text);
        if base.is_empty() {
            base = format!("section-{position}");
        }

        let mut candidate = base.clone();
        let mut counter = 1;
        while self.used.contains(&candidate) {
            candidate = format!("{base}-{counter}");
            counter += 1;
        }

        self.used.insert(candidate.clone());
        candidate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_basic_labels() {
        assert_eq!(slugify("Getting Started"), "getting-started");
        assert_eq!(slugify("  API -- Reference!  "), "api-reference");
        assert_eq!(slugify("Step 2: Configure"), "step-2-configure");
        assert_eq!(slugify("snake_case_name"), "snake-case-name");
    }

    #[test]
    fn slugify_transliterates_and_drops_apostrophes() {
        assert_eq!(slugify("Café Crème"), "cafe-creme");
        assert_eq!(slugify("Straße"), "strasse");
        assert_eq!(slugify("Don't Panic"), "dont-panic");
        assert_eq!(slugify("ÅNGSTRÖM"), "angstrom");
    }

    #[test]
    fn slugify_without_alphanumerics_is_empty() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("!!! ???"), "");
        assert_eq!(slugify("日本語"), "");
    }

    #[test]
    fn duplicate_labels_get_suffixes() {
        let mut assigner = AnchorAssigner::new();
        assert_eq!(assigner.assign("Install", 1), "install");
        assert_eq!(assigner.assign("Install", 2), "install-1");
        assert_eq!(assigner.assign("install", 3), "install-2");
    }

    #[test]
    fn suffix_skips_anchors_already_taken() {
        let mut assigner = AnchorAssigner::new();
        assert_eq!(assigner.assign("Setup 1", 1), "setup-1");
        assert_eq!(assigner.assign("Setup", 2), "setup");
        assert_eq!(assigner.assign("Setup", 3), "setup-2");
    }

    #[test]
    fn reserved_anchors_are_avoided() {
        let mut assigner = AnchorAssigner::new();
        assigner.reserve("overview");
        assert_eq!(assigner.assign("Overview", 1), "overview-1");
    }

    #[test]
    fn empty_labels_fall_back_to_position() {
        let mut assigner = AnchorAssigner::new();
        assert_eq!(assigner.assign("", 4), "section-4");
        assert_eq!(assigner.assign("   ", 7), "section-7");
        // A real heading literally named "Section 4" still stays unique.
        assert_eq!(assigner.assign("Section 4", 9), "section-4-1");
    }
}
