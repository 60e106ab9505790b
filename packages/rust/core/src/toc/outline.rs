//! Outline construction and navigation markup rendering.

use serde::{Deserialize, Serialize};

use ctdocs_markup::{escape_attr, escape_html};
use ctdocs_shared::{Heading, TocConfig};

/// One node of the heading tree.
///
/// `heading` is `None` for a gap node: a placeholder at a level the document
/// skipped (e.g. an `<h4>` directly under an `<h2>`, or a document that opens
/// deeper than its shallowest heading). Gap nodes always have children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineNode {
    pub level: u8,
    pub heading: Option<Heading>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<OutlineNode>,
}

/// Build the nested outline for headings in document order.
///
/// Roots sit at the minimum level found anywhere in the sequence, not at the
/// level of the first heading. A heading becomes a child of the nearest
/// preceding heading with a lower level; skipped levels are bridged with gap
/// nodes so depth never jumps by more than one.
pub fn build_outline(headings: &[Heading]) -> Vec<OutlineNode> {
    let Some(min_level) = headings.iter().map(|h| h.level).min() else {
        return Vec::new();
    };

    let mut pos = 0;
    let roots = build_level(headings, &mut pos, min_level);
    debug_assert_eq!(pos, headings.len());
    roots
}

/// Consume headings starting at `pos` that belong at `level` or deeper.
fn build_level(headings: &[Heading], pos: &mut usize, level: u8) -> Vec<OutlineNode> {
    let mut nodes = Vec::new();

    while let Some(heading) = headings.get(*pos) {
        if heading.level < level {
            break;
        }

        if heading.level == level {
            *pos += 1;
            let children = build_level(headings, pos, level + 1);
            nodes.push(OutlineNode {
                level,
                heading: Some(heading.clone()),
                children,
            });
        } else {
            let children = build_level(headings, pos, level + 1);
            nodes.push(OutlineNode {
                level,
                heading: None,
                children,
            });
        }
    }

    nodes
}

/// Render an outline as the sidebar `<nav>` block. An empty outline renders
/// as an empty string.
pub fn render_navigation(outline: &[OutlineNode], config: &TocConfig) -> String {
    if outline.is_empty() {
        return String::new();
    }

    let mut html = format!(
        r#"<nav class="ct-docs-toc" aria-label="{}">"#,
        escape_attr(&config.aria_label)
    );
    html.push_str(r#"<div class="ct-docs-toc-header">"#);
    html.push_str(&format!(
        r#"<span class="ct-docs-toc-title">{}</span>"#,
        escape_html(&config.title)
    ));
    html.push_str("</div>");
    html.push_str(r#"<ul class="ct-docs-toc-list">"#);
    render_items(outline, &mut html);
    html.push_str("</ul>");
    html.push_str("</nav>");
    html
}

fn render_items(nodes: &[OutlineNode], html: &mut String) {
    for node in nodes {
        match &node.heading {
            Some(heading) => html.push_str(&format!(
                r##"<li class="ct-docs-toc-item ct-docs-toc-level-{}"><a href="#{}">{}</a>"##,
                node.level,
                escape_attr(&heading.anchor),
                escape_html(&heading.text)
            )),
            None => html.push_str(&format!(
                r#"<li class="ct-docs-toc-item ct-docs-toc-level-{} ct-docs-toc-gap">"#,
                node.level
            )),
        }

        if !node.children.is_empty() {
            html.push_str(r#"<ul class="ct-docs-toc-sublist">"#);
            render_items(&node.children, html);
            html.push_str("</ul>");
        }

        html.push_str("</li>");
    }
}
