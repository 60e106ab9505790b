//! Heading-based table of contents generator.
//!
//! One generation run takes article content through four stages:
//! 1. [`extract`] — find `<h2>`–`<h5>` elements and their plain-text labels
//! 2. [`anchor`] — assign unique slug anchors
//! 3. [`outline`] — nest headings by level and render the `<nav>` markup
//! 4. [`rewrite`] — put the anchors on the original heading tags
//!
//! [`TocGenerator`] wires the stages together and memoizes results per
//! article through an injected [`Cache`].

pub mod anchor;
pub mod extract;
pub mod outline;
pub mod rewrite;

use std::collections::HashSet;
use std::time::Duration;

use tracing::{debug, instrument, warn};

use ctdocs_shared::{ArticleId, GenerationResult, Heading, TocConfig};
use ctdocs_storage::{Cache, remember};

use crate::article::ArticleStore;

pub use anchor::{AnchorAssigner, slugify};
pub use extract::{MAX_LEVEL, MIN_LEVEL, RawHeading, extract_headings};
pub use outline::{OutlineNode, build_outline, render_navigation};
pub use rewrite::rewrite_content;

/// Cache key under which an article's generation result is stored.
pub fn cache_key(article_id: ArticleId) -> String {
    format!("toc_{article_id}")
}

/// Generates tables of contents, optionally caching results per article.
#[derive(Clone, Copy)]
pub struct TocGenerator<'c> {
    config: &'c TocConfig,
    cache: Option<&'c dyn Cache>,
    ttl: Option<Duration>,
}

impl<'c> TocGenerator<'c> {
    /// A generator that never caches.
    pub fn new(config: &'c TocConfig) -> Self {
        Self {
            config,
            cache: None,
            ttl: None,
        }
    }

    /// Memoize results for calls that supply an article id.
    pub fn with_cache(mut self, cache: &'c dyn Cache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Override the cache's default entry lifetime.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Produce navigation markup, rewritten content, and headings.
    ///
    /// With an article id and a cache, a cached result is returned as-is
    /// without comparing it to `content`; callers must [`invalidate`] when an
    /// article changes. Never fails: cache problems are logged and the result
    /// is computed directly.
    ///
    /// [`invalidate`]: Self::invalidate
    #[instrument(skip_all, fields(content_len = content.len(), article_id = ?article_id))]
    pub fn generate(&self, content: &str, article_id: Option<ArticleId>) -> GenerationResult {
        match (self.cache, article_id) {
            (Some(cache), Some(id)) => {
                remember(cache, &cache_key(id), self.ttl, || self.build(content))
            }
            _ => self.build(content),
        }
    }

    /// Only the rewritten content, for the article body filter.
    pub fn filter_content(&self, content: &str, article_id: Option<ArticleId>) -> String {
        self.generate(content, article_id).rewritten_content
    }

    /// Only the navigation markup for an article looked up in `store`.
    /// Unknown articles yield an empty string.
    pub fn toc_for_article(&self, store: &dyn ArticleStore, article_id: ArticleId) -> String {
        match store.get(article_id) {
            Some(article) => {
                self.generate(&article.content, Some(article_id))
                    .navigation_markup
            }
            None => {
                debug!(%article_id, "article not found, no table of contents");
                String::new()
            }
        }
    }

    /// Drop the cached result for an article (call after its content changes).
    /// Returns whether an entry was removed.
    pub fn invalidate(&self, article_id: ArticleId) -> bool {
        let Some(cache) = self.cache else {
            return false;
        };
        match cache.delete(&cache_key(article_id)) {
            Ok(removed) => removed,
            Err(e) => {
                warn!(%article_id, error = %e, "failed to invalidate cached table of contents");
                false
            }
        }
    }

    fn build(&self, content: &str) -> GenerationResult {
        let raw = extract_headings(content);
        if raw.is_empty() {
            debug!("no headings found");
            return GenerationResult::passthrough(content);
        }

        let mut assigner = AnchorAssigner::new();
        let mut authored = HashSet::new();
        for id in raw.iter().filter_map(|r| r.existing_id.as_deref()) {
            if !authored.insert(id) {
                warn!(id, "heading id used more than once, links to it are ambiguous");
            }
            assigner.reserve(id);
        }

        let headings: Vec<Heading> = raw
            .iter()
            .enumerate()
            .map(|(idx, r)| Heading {
                level: r.level,
                text: r.text.clone(),
                anchor: match &r.existing_id {
                    Some(id) => id.clone(),
                    None => assigner.assign(&r.text, idx + 1),
                },
            })
            .collect();

        let outline = build_outline(&headings);
        let navigation_markup = render_navigation(&outline, self.config);
        let rewritten_content = rewrite_content(content, &raw, &headings);

        debug!(headings = headings.len(), "table of contents generated");

        GenerationResult {
            navigation_markup,
            rewritten_content,
            headings,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
