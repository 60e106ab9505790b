//! Substring article search with highlighted excerpts.

use sha2::{Digest, Sha256};
use tracing::{debug, instrument};

use ctdocs_markup::{escape_html, highlight_term};
use ctdocs_shared::{Article, SearchConfig, SearchHit};
use ctdocs_storage::{Cache, remember};

use crate::article::{ArticleStore, excerpt};

/// Cache key for one `(term, limit)` query.
pub fn cache_key(term: &str, limit: usize) -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!("{term}_{limit}").as_bytes());
    format!("search_{:x}", hasher.finalize())
}

/// Case-insensitive substring search over titles and bodies.
///
/// Title matches rank before body-only matches, then hits are ordered by
/// title, ignoring case. Terms shorter than `config.min_term_len` (after trimming) match
/// nothing. Results are memoized in `cache` when one is given.
#[instrument(skip(store, cache, config))]
pub fn search(
    store: &dyn ArticleStore,
    cache: Option<&dyn Cache>,
    config: &SearchConfig,
    term: &str,
    limit: usize,
) -> Vec<SearchHit> {
    let term = term.trim();
    if term.chars().count() < config.min_term_len {
        debug!("search term too short");
        return Vec::new();
    }

    match cache {
        Some(cache) => remember(cache, &cache_key(term, limit), None, || {
            run_search(store, config, term, limit)
        }),
        None => run_search(store, config, term, limit),
    }
}

fn run_search(
    store: &dyn ArticleStore,
    config: &SearchConfig,
    term: &str,
    limit: usize,
) -> Vec<SearchHit> {
    let needle = term.to_lowercase();

    let mut matches: Vec<(bool, Article)> = store
        .all()
        .into_iter()
        .filter_map(|article| {
            let in_title = article.title.to_lowercase().contains(&needle);
            let in_body = in_title || article.content.to_lowercase().contains(&needle);
            in_body.then_some((in_title, article))
        })
        .collect();

    matches.sort_by(|(a_title, a), (b_title, b)| {
        b_title
            .cmp(a_title)
            .then_with(|| a.title.to_lowercase().cmp(&b.title.to_lowercase()))
            .then_with(|| a.title.cmp(&b.title))
            .then_with(|| a.id.cmp(&b.id))
    });

    let hits: Vec<SearchHit> = matches
        .into_iter()
        .take(limit)
        .map(|(_, article)| to_hit(&article, config, term))
        .collect();

    debug!(hits = hits.len(), "search complete");
    hits
}

fn to_hit(article: &Article, config: &SearchConfig, term: &str) -> SearchHit {
    let (category, category_slug) = article
        .category
        .as_ref()
        .map(|c| (c.name.clone(), c.slug.clone()))
        .unwrap_or_default();

    SearchHit {
        id: article.id,
        title: article.title.clone(),
        // The plain-text excerpt may hold decoded `<`; only `<mark>` is markup.
        excerpt: highlight_term(
            &escape_html(&excerpt(article, config.excerpt_words)),
            &escape_html(term),
        ),
        category,
        category_slug,
    }
}
