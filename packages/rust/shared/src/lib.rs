//! Shared types, error model, and configuration for ctdocs.
//!
//! This crate is the foundation depended on by all other ctdocs crates.
//! It provides:
//! - [`CtDocsError`] — the unified error type
//! - Domain types ([`ArticleId`], [`Heading`], [`GenerationResult`], [`Article`])
//! - Configuration ([`AppConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, CacheConfig, ReadingConfig, RelatedConfig, SearchConfig, TocConfig, config_dir,
    config_file_path, init_config, load_config, load_config_from,
};
pub use error::{CtDocsError, Result};
pub use types::{Article, ArticleId, Category, GenerationResult, Heading, SearchHit};
