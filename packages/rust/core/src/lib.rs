//! Core domain logic for ctdocs.
//!
//! The centerpiece is the heading-based table of contents generator in
//! [`toc`]. Alongside it live the article store contract and per-article
//! metadata ([`article`]) and a simple substring search ([`search`]).

pub mod article;
pub mod search;
pub mod toc;

pub use article::{ArticleStore, MemoryArticleStore, excerpt, read_time_minutes, related};
pub use search::search;
pub use toc::{OutlineNode, TocGenerator, build_outline};
