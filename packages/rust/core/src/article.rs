//! Article store contract and per-article metadata (read time, excerpts,
//! related articles).

use std::collections::HashMap;

use tracing::{debug, instrument};

use ctdocs_markup::{count_words, trim_words};
use ctdocs_shared::{Article, ArticleId};

/// Source of published article content, keyed by id.
pub trait ArticleStore {
    fn get(&self, id: ArticleId) -> Option<Article>;

    /// Every published article, in no particular order.
    fn all(&self) -> Vec<Article>;
}

/// Simple in-memory store.
#[derive(Debug, Default, Clone)]
pub struct MemoryArticleStore {
    articles: HashMap<ArticleId, Article>,
}

impl MemoryArticleStore {
    pub fn new(articles: impl IntoIterator<Item = Article>) -> Self {
        Self {
            articles: articles.into_iter().map(|a| (a.id, a)).collect(),
        }
    }

    /// Add or replace an article. Returns the previous version, if any.
    pub fn upsert(&mut self, article: Article) -> Option<Article> {
        self.articles.insert(article.id, article)
    }

    pub fn remove(&mut self, id: ArticleId) -> Option<Article> {
        self.articles.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }
}

impl ArticleStore for MemoryArticleStore {
    fn get(&self, id: ArticleId) -> Option<Article> {
        self.articles.get(&id).cloned()
    }

    fn all(&self) -> Vec<Article> {
        self.articles.values().cloned().collect()
    }
}

// ---------------------------------------------------------------------------
// Read time
// ---------------------------------------------------------------------------

/// Estimated reading time in whole minutes, never less than one.
pub fn read_time_minutes(content: &str, words_per_minute: u32) -> u32 {
    let words = count_words(content);
    let wpm = words_per_minute.max(1) as usize;
    let minutes = words.div_ceil(wpm).max(1);
    u32::try_from(minutes).unwrap_or(u32::MAX)
}

// ---------------------------------------------------------------------------
// Excerpts
// ---------------------------------------------------------------------------

/// The article's own excerpt when set, otherwise its first `words` words.
pub fn excerpt(article: &Article, words: usize) -> String {
    match article.excerpt.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => trim_words(&article.content, words, "..."),
    }
}

// ---------------------------------------------------------------------------
// Related articles
// ---------------------------------------------------------------------------

/// Up to `limit` articles to suggest after `id`.
///
/// Newest articles in the same category come first; when there are fewer than
/// `limit` of those, the newest articles from any other category fill the
/// remaining slots. Articles without a category have no related articles.
#[instrument(skip(store))]
pub fn related(store: &dyn ArticleStore, id: ArticleId, limit: usize) -> Vec<Article> {
    let Some(current) = store.get(id) else {
        debug!("article not found");
        return Vec::new();
    };
    let Some(category) = current.category.as_ref() else {
        debug!("article has no category");
        return Vec::new();
    };

    let mut candidates: Vec<Article> = store.all().into_iter().filter(|a| a.id != id).collect();
    // Newest first; id breaks ties so the order is deterministic.
    candidates.sort_by(|a, b| {
        b.published_at
            .cmp(&a.published_at)
            .then_with(|| b.id.cmp(&a.id))
    });

    let (same, other): (Vec<Article>, Vec<Article>) = candidates
        .into_iter()
        .partition(|a| a.category.as_ref() == Some(category));

    let picked: Vec<Article> = same.into_iter().chain(other).take(limit).collect();
    debug!(count = picked.len(), "related articles selected");
    picked
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};
    use ctdocs_shared::Category;

    use super::*;

    fn category(slug: &str) -> Option<Category> {
        Some(Category {
            name: slug.to_uppercase(),
            slug: slug.into(),
        })
    }

    fn article(id: u64, cat: Option<Category>, days_ago: i64) -> Article {
        let base = Utc.with_ymd_and_hms(2026, 1, 31, 12, 0, 0).unwrap();
        Article {
            id: ArticleId(id),
            title: format!("Article {id}"),
            content: format!("<p>Body of article {id}</p>"),
            excerpt: None,
            category: cat,
            published_at: base - Duration::days(days_ago),
        }
    }

    fn ids(articles: &[Article]) -> Vec<u64> {
        articles.iter().map(|a| a.id.0).collect()
    }

    #[test]
    fn read_time_rounds_up_with_minimum_of_one() {
        assert_eq!(read_time_minutes("", 200), 1);
        assert_eq!(read_time_minutes("just a few words", 200), 1);

        let words = "word ".repeat(201);
        assert_eq!(read_time_minutes(&words, 200), 2);

        let words = "<p>word</p> ".repeat(400);
        assert_eq!(read_time_minutes(&words, 200), 2);
        assert_eq!(read_time_minutes(&words, 0), 400);
    }

    #[test]
    fn excerpt_prefers_explicit_summary() {
        let mut a = article(1, None, 0);
        a.content = "<p>one two three four five</p>".into();
        assert_eq!(excerpt(&a, 3), "one two three...");

        a.excerpt = Some("  Hand written.  ".into());
        assert_eq!(excerpt(&a, 3), "Hand written.");

        a.excerpt = Some("   ".into());
        assert_eq!(excerpt(&a, 10), "one two three four five");
    }

    #[test]
    fn related_prefers_same_category_newest_first() {
        let store = MemoryArticleStore::new(vec![
            article(1, category("guides"), 0),
            article(2, category("guides"), 5),
            article(3, category("guides"), 1),
            article(4, category("api"), 0),
            article(5, category("guides"), 10),
        ]);

        assert_eq!(ids(&related(&store, ArticleId(1), 3)), vec![3, 2, 5]);
    }

    #[test]
    fn related_tops_up_from_other_categories() {
        let store = MemoryArticleStore::new(vec![
            article(1, category("guides"), 0),
            article(2, category("guides"), 3),
            article(3, category("api"), 1),
            article(4, None, 2),
            article(5, category("api"), 9),
        ]);

        assert_eq!(ids(&related(&store, ArticleId(1), 3)), vec![2, 3, 4]);
    }

    #[test]
    fn related_requires_category_and_existing_article() {
        let store = MemoryArticleStore::new(vec![
            article(1, None, 0),
            article(2, category("guides"), 0),
        ]);

        assert!(related(&store, ArticleId(1), 3).is_empty());
        assert!(related(&store, ArticleId(99), 3).is_empty());
        assert_eq!(ids(&related(&store, ArticleId(2), 3)), vec![1]);
    }

    #[test]
    fn memory_store_upsert_and_remove() {
        let mut store = MemoryArticleStore::default();
        assert!(store.upsert(article(1, None, 0)).is_none());
        assert!(store.upsert(article(1, None, 1)).is_some());
        assert_eq!(store.len(), 1);
        assert!(store.remove(ArticleId(1)).is_some());
        assert!(store.is_empty());
    }
}
