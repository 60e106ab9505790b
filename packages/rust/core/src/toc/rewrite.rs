//! Content rewriting: put anchor ids on matched heading tags.

use ctdocs_markup::escape_attr;
use ctdocs_shared::Heading;

use super::extract::RawHeading;

/// Copy `content`, giving each matched heading's opening tag its anchor id.
///
/// Rewriting works on the byte ranges recorded at extraction time, so
/// identical heading markup elsewhere in the document is never touched by
/// accident. Only opening tags change; inner markup, closing tags, and all
/// text between headings are copied verbatim. Tags that already carry an id
/// are left exactly as written; a blank `id` attribute is replaced.
pub fn rewrite_content(content: &str, raw: &[RawHeading<'_>], headings: &[Heading]) -> String {
    let mut out = String::with_capacity(content.len() + raw.len() * 16);
    let mut cursor = 0;

    for (matched, heading) in raw.iter().zip(headings) {
        out.push_str(&content[cursor..matched.open_tag.start]);

        if matched.existing_id.is_some() {
            out.push_str(&content[matched.open_tag.clone()]);
        } else {
            out.push_str(&with_id(content, matched, &heading.anchor));
        }

        cursor = matched.open_tag.end;
    }

    out.push_str(&content[cursor..]);
    out
}

/// Insert `id="anchor"` right after the tag name, keeping the tag name's
/// original case and every other attribute as written.
fn with_id(content: &str, matched: &RawHeading<'_>, anchor: &str) -> String {
    let tag = matched.open_tag.clone();
    // Opening tags always start with the ASCII bytes `<h` plus one digit.
    let name_end = tag.start + 3;
    let name = &content[tag.start..name_end];

    let rest = match &matched.id_attr {
        Some(blank) => [&content[name_end..blank.start], &content[blank.end..tag.end]].concat(),
        None => content[name_end..tag.end].to_string(),
    };
    format!(r#"{name} id="{}"{rest}"#, escape_attr(anchor))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toc::extract::extract_headings;

    fn anchored(content: &str, anchors: &[&str]) -> String {
        let raw = extract_headings(content);
        let headings: Vec<Heading> = raw
            .iter()
            .zip(anchors)
            .map(|(r, a)| Heading {
                level: r.level,
                text: r.text.clone(),
                anchor: (*a).to_string(),
            })
            .collect();
        rewrite_content(content, &raw, &headings)
    }

    #[test]
    fn adds_ids_without_touching_other_markup() {
        let content = "<p>Intro</p><h2>Start</h2><p>Body</p><h3 class=\"x\">Next</h3>";
        assert_eq!(
            anchored(content, &["start", "next"]),
            "<p>Intro</p><h2 id=\"start\">Start</h2><p>Body</p><h3 id=\"next\" class=\"x\">Next</h3>"
        );
    }

    #[test]
    fn identical_headings_each_get_their_own_id() {
        let content = "<h3>Install</h3><h3>Install</h3>";
        assert_eq!(
            anchored(content, &["install", "install-1"]),
            "<h3 id=\"install\">Install</h3><h3 id=\"install-1\">Install</h3>"
        );
    }

    #[test]
    fn heading_text_elsewhere_is_untouched() {
        let content = "<p>See <code>&lt;h2&gt;Setup&lt;/h2&gt;</code></p><h2>Setup</h2><pre>Setup</pre>";
        assert_eq!(
            anchored(content, &["setup"]),
            "<p>See <code>&lt;h2&gt;Setup&lt;/h2&gt;</code></p><h2 id=\"setup\">Setup</h2><pre>Setup</pre>"
        );
    }

    #[test]
    fn existing_id_is_kept_verbatim() {
        let content = "<H2 ID='custom' data-x=1>Kept</H2>";
        assert_eq!(anchored(content, &["custom"]), content);
    }

    #[test]
    fn empty_id_is_replaced_not_duplicated() {
        let content = r#"<h2 class="a" id="">Empty</h2>"#;
        assert_eq!(
            anchored(content, &["empty"]),
            r#"<h2 id="empty" class="a">Empty</h2>"#
        );
    }

    #[test]
    fn blank_and_bare_ids_are_replaced() {
        let content = r#"<h2 id=" ">Setup</h2><h3 ID='  ' class="b">Two</h3><h4 id>Three</h4>"#;
        assert_eq!(
            anchored(content, &["setup", "two", "three"]),
            r#"<h2 id="setup">Setup</h2><h3 id="two" class="b">Two</h3><h4 id="three">Three</h4>"#
        );
    }

    #[test]
    fn id_text_inside_attribute_values_is_preserved() {
        let content = r#"<h2 title="see id=intro" data-x='a id="" b'>Setup</h2>"#;
        assert_eq!(
            anchored(content, &["setup"]),
            r#"<h2 id="setup" title="see id=intro" data-x='a id="" b'>Setup</h2>"#
        );
    }

    #[test]
    fn preserves_tag_name_case_and_unmatched_headings() {
        let content = "<H4>Loud</H4><h6>Ignored</h6><h2>Open";
        assert_eq!(
            anchored(content, &["loud"]),
            "<H4 id=\"loud\">Loud</H4><h6>Ignored</h6><h2>Open"
        );
    }
}
