//! Error types for ctdocs.
//!
//! Library crates use [`CtDocsError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all ctdocs operations.
#[derive(Debug, thiserror::Error)]
pub enum CtDocsError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Cache backend failure (read, write, or eviction).
    #[error("cache error: {0}")]
    Cache(String),

    /// JSON encoding/decoding of a cached or emitted value failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Input validation error (bad identifier, out-of-range option, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },

    /// A requested article does not exist in the store.
    #[error("not found: {0}")]
    NotFound(String),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, CtDocsError>;

impl CtDocsError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a cache error from any displayable message.
    pub fn cache(msg: impl Into<String>) -> Self {
        Self::Cache(msg.into())
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<serde_json::Error> for CtDocsError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = CtDocsError::config("ttl_secs must be positive");
        assert_eq!(err.to_string(), "config error: ttl_secs must be positive");

        let err = CtDocsError::validation("article id `abc` is not numeric");
        assert!(err.to_string().contains("`abc`"));

        let err = CtDocsError::cache("lock poisoned");
        assert_eq!(err.to_string(), "cache error: lock poisoned");
    }

    #[test]
    fn serde_json_errors_convert() {
        let parse: std::result::Result<u32, _> = serde_json::from_str("not json");
        let err: CtDocsError = parse.unwrap_err().into();
        assert!(matches!(err, CtDocsError::Serialization(_)));
    }
}
