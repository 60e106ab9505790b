//! Application configuration for ctdocs.
//!
//! User config lives at `~/.ctdocs/ctdocs.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CtDocsError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "ctdocs.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".ctdocs";

/// Default file cache directory name under the config directory.
const CACHE_DIR_NAME: &str = "cache";

// ---------------------------------------------------------------------------
// Config structs (matching ctdocs.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Cache settings.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Table of contents rendering.
    #[serde(default)]
    pub toc: TocConfig,

    /// Read time estimation.
    #[serde(default)]
    pub reading: ReadingConfig,

    /// Article search.
    #[serde(default)]
    pub search: SearchConfig,

    /// Related articles.
    #[serde(default)]
    pub related: RelatedConfig,
}

/// `[cache]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Default entry lifetime in seconds.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,

    /// Namespace prepended to every cache key.
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// Directory for the file-backed cache (defaults to `~/.ctdocs/cache`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
            prefix: default_prefix(),
            dir: None,
        }
    }
}

fn default_ttl_secs() -> u64 {
    1800
}
fn default_prefix() -> String {
    "ct_docs_".into()
}

/// `[toc]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TocConfig {
    /// Visible title above the navigation list.
    #[serde(default = "default_toc_title")]
    pub title: String,

    /// `aria-label` of the `<nav>` element.
    #[serde(default = "default_aria_label")]
    pub aria_label: String,
}

impl Default for TocConfig {
    fn default() -> Self {
        Self {
            title: default_toc_title(),
            aria_label: default_aria_label(),
        }
    }
}

fn default_toc_title() -> String {
    "On this page".into()
}
fn default_aria_label() -> String {
    "Table of Contents".into()
}

/// `[reading]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadingConfig {
    /// Assumed reading speed.
    #[serde(default = "default_words_per_minute")]
    pub words_per_minute: u32,
}

impl Default for ReadingConfig {
    fn default() -> Self {
        Self {
            words_per_minute: default_words_per_minute(),
        }
    }
}

fn default_words_per_minute() -> u32 {
    200
}

/// `[search]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Maximum hits returned when the caller does not ask for a limit.
    #[serde(default = "default_search_limit")]
    pub limit: usize,

    /// Shorter (trimmed) terms return no results.
    #[serde(default = "default_min_term_len")]
    pub min_term_len: usize,

    /// Words kept in each hit's excerpt.
    #[serde(default = "default_search_excerpt_words")]
    pub excerpt_words: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            limit: default_search_limit(),
            min_term_len: default_min_term_len(),
            excerpt_words: default_search_excerpt_words(),
        }
    }
}

fn default_search_limit() -> usize {
    8
}
fn default_min_term_len() -> usize {
    2
}
fn default_search_excerpt_words() -> usize {
    20
}

/// `[related]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelatedConfig {
    #[serde(default = "default_related_limit")]
    pub limit: usize,

    #[serde(default = "default_related_excerpt_words")]
    pub excerpt_words: usize,
}

impl Default for RelatedConfig {
    fn default() -> Self {
        Self {
            limit: default_related_limit(),
            excerpt_words: default_related_excerpt_words(),
        }
    }
}

fn default_related_limit() -> usize {
    3
}
fn default_related_excerpt_words() -> usize {
    15
}

impl AppConfig {
    /// Check values that would make the cache or estimators misbehave.
    pub fn validate(&self) -> Result<()> {
        if self.cache.prefix.is_empty() {
            return Err(CtDocsError::config("cache.prefix must not be empty"));
        }
        if self.reading.words_per_minute == 0 {
            return Err(CtDocsError::config(
                "reading.words_per_minute must be greater than zero",
            ));
        }
        Ok(())
    }

    /// Resolve the file cache directory (`cache.dir` or `~/.ctdocs/cache`).
    pub fn cache_dir(&self) -> Result<PathBuf> {
        match &self.cache.dir {
            Some(dir) => Ok(PathBuf::from(dir)),
            None => Ok(config_dir()?.join(CACHE_DIR_NAME)),
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.ctdocs/`).
pub fn config_dir() -> Result<PathBuf> {
    let home =
        dirs::home_dir().ok_or_else(|| CtDocsError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.ctdocs/ctdocs.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| CtDocsError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content)
        .map_err(|e| CtDocsError::config(format!("failed to parse {}: {e}", path.display())))?;
    config.validate()?;
    Ok(config)
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| CtDocsError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| CtDocsError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| CtDocsError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("ttl_secs = 1800"));
        assert!(toml_str.contains("On this page"));
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[cache]
ttl_secs = 60

[toc]
title = "Contents"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.cache.ttl_secs, 60);
        assert_eq!(config.cache.prefix, "ct_docs_");
        assert_eq!(config.toc.title, "Contents");
        assert_eq!(config.toc.aria_label, "Table of Contents");
        assert_eq!(config.reading.words_per_minute, 200);
        assert_eq!(config.search.limit, 8);
        assert_eq!(config.related.limit, 3);
    }

    #[test]
    fn explicit_cache_dir_wins() {
        let mut config = AppConfig::default();
        config.cache.dir = Some("/tmp/ctdocs-cache".into());
        assert_eq!(
            config.cache_dir().unwrap(),
            PathBuf::from("/tmp/ctdocs-cache")
        );
    }

    #[test]
    fn validation_rejects_zero_reading_speed() {
        let mut config = AppConfig::default();
        assert!(config.validate().is_ok());

        config.reading.words_per_minute = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("words_per_minute"));
    }

    #[test]
    fn load_config_from_missing_file_is_io_error() {
        let path = std::env::temp_dir().join("ctdocs-does-not-exist/ctdocs.toml");
        let err = load_config_from(&path).unwrap_err();
        assert!(matches!(err, CtDocsError::Io { .. }));
    }
}
