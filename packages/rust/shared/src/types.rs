//! Core domain types for ctdocs articles and their tables of contents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CtDocsError;

// ---------------------------------------------------------------------------
// ArticleId
// ---------------------------------------------------------------------------

/// Numeric article identifier, used as an opaque cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArticleId(pub u64);

impl std::fmt::Display for ArticleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ArticleId {
    type Err = CtDocsError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|_| CtDocsError::validation(format!("article id `{s}` is not numeric")))
    }
}

impl From<u64> for ArticleId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

// ---------------------------------------------------------------------------
// Heading / GenerationResult
// ---------------------------------------------------------------------------

/// A heading extracted from article content, with its assigned anchor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    /// Tag level, always within `2..=5`.
    pub level: u8,
    /// Plain-text label (markup stripped, entities decoded).
    pub text: String,
    /// Fragment identifier, unique within one generation run.
    pub anchor: String,
}

/// Output of one table-of-contents generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    /// `<nav>` markup for the sidebar, empty when the content has no headings.
    pub navigation_markup: String,
    /// Content with `id` attributes on every matched heading.
    pub rewritten_content: String,
    /// Headings in document order.
    #[serde(default)]
    pub headings: Vec<Heading>,
}

impl GenerationResult {
    /// The "no headings" result: empty navigation, content passed through.
    pub fn passthrough(content: &str) -> Self {
        Self {
            navigation_markup: String::new(),
            rewritten_content: content.to_string(),
            headings: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Article
// ---------------------------------------------------------------------------

/// Documentation category (taxonomy term).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub slug: String,
}

/// A published documentation article.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub id: ArticleId,
    pub title: String,
    /// Rendered body (HTML-ish).
    pub content: String,
    /// Hand-written summary; when absent one is derived from `content`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    /// Primary category, if the article is filed under one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    pub published_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// SearchHit
// ---------------------------------------------------------------------------

/// A single search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: ArticleId,
    pub title: String,
    /// Excerpt with the term wrapped in `<mark>` tags.
    pub excerpt: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub category_slug: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn article_id_parses_and_displays() {
        let id: ArticleId = " 42 ".parse().expect("parse id");
        assert_eq!(id, ArticleId(42));
        assert_eq!(id.to_string(), "42");
        assert!("forty-two".parse::<ArticleId>().is_err());
    }

    #[test]
    fn generation_result_json_shape() {
        let result = GenerationResult {
            navigation_markup: "<nav></nav>".into(),
            rewritten_content: "<h2 id=\"a\">A</h2>".into(),
            headings: vec![Heading {
                level: 2,
                text: "A".into(),
                anchor: "a".into(),
            }],
        };
        let json = serde_json::to_value(&result).expect("serialize");
        assert_eq!(json["headings"][0]["anchor"], "a");
        assert_eq!(json["navigation_markup"], "<nav></nav>");
    }

    #[test]
    fn passthrough_keeps_content() {
        let result = GenerationResult::passthrough("<p>plain</p>");
        assert!(result.navigation_markup.is_empty());
        assert_eq!(result.rewritten_content, "<p>plain</p>");
        assert!(result.headings.is_empty());
    }
}
