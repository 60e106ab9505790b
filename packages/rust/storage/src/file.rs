//! File-backed cache backend: one JSON record per key.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use ctdocs_shared::{CacheConfig, CtDocsError, Result};

use crate::{Cache, expiry_from_now};

const RECORD_EXT: &str = "json";

/// On-disk entry format.
#[derive(Debug, Serialize, Deserialize)]
struct Record {
    /// Full (prefixed) key, kept so `flush_all` can filter by prefix.
    key: String,
    expires_at: DateTime<Utc>,
    value: String,
}

/// Cache persisted as `<dir>/<sha256(prefixed key)>.json` files.
///
/// Writes go to a temporary file first and are renamed into place, so readers
/// never observe a half-written record.
#[derive(Debug, Clone)]
pub struct FileCache {
    dir: PathBuf,
    prefix: String,
    default_ttl: Duration,
}

impl FileCache {
    /// Create a cache rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>, default_ttl: Duration) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
            default_ttl,
        }
    }

    pub fn from_config(dir: impl Into<PathBuf>, config: &CacheConfig) -> Self {
        Self::new(
            dir,
            config.prefix.clone(),
            Duration::from_secs(config.ttl_secs),
        )
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}{key}", self.prefix)
    }

    fn path_for(&self, full_key: &str) -> PathBuf {
        let mut hasher = Sha256::new();
        hasher.update(full_key.as_bytes());
        self.dir
            .join(format!("{:x}.{RECORD_EXT}", hasher.finalize()))
    }

    fn read_record(path: &Path) -> Result<Option<Record>> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(CtDocsError::io(path, e)),
        };

        match serde_json::from_str(&raw) {
            Ok(record) => Ok(Some(record)),
            Err(e) => {
                warn!(?path, error = %e, "removing corrupt cache record");
                remove_if_exists(path)?;
                Ok(None)
            }
        }
    }
}

impl Cache for FileCache {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let full_key = self.full_key(key);
        let path = self.path_for(&full_key);

        let Some(record) = Self::read_record(&path)? else {
            return Ok(None);
        };

        if record.key != full_key {
            warn!(?path, "cache record key mismatch, ignoring");
            return Ok(None);
        }

        if record.expires_at <= Utc::now() {
            debug!(key = %full_key, "evicted expired record");
            remove_if_exists(&path)?;
            return Ok(None);
        }

        Ok(Some(record.value))
    }

    fn set(&self, key: &str, value: String, ttl: Option<Duration>) -> Result<()> {
        std::fs::create_dir_all(&self.dir).map_err(|e| CtDocsError::io(&self.dir, e))?;

        let full_key = self.full_key(key);
        let path = self.path_for(&full_key);
        let record = Record {
            key: full_key,
            expires_at: expiry_from_now(ttl.unwrap_or(self.default_ttl)),
            value,
        };
        let body = serde_json::to_string(&record)?;

        let tmp = path.with_extension(format!("{}.tmp", unique_suffix()));
        std::fs::write(&tmp, body).map_err(|e| CtDocsError::io(&tmp, e))?;
        std::fs::rename(&tmp, &path).map_err(|e| {
            let _ = std::fs::remove_file(&tmp);
            CtDocsError::io(&path, e)
        })?;

        Ok(())
    }

    fn delete(&self, key: &str) -> Result<bool> {
        remove_if_exists(&self.path_for(&self.full_key(key)))
    }

    fn flush_all(&self) -> Result<usize> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(CtDocsError::io(&self.dir, e)),
        };

        let mut removed = 0;
        for entry in entries {
            let path = entry.map_err(|e| CtDocsError::io(&self.dir, e))?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(RECORD_EXT) {
                continue;
            }

            match Self::read_record(&path) {
                Ok(Some(record)) if record.key.starts_with(&self.prefix) => {
                    if remove_if_exists(&path)? {
                        removed += 1;
                    }
                }
                Ok(_) => {}
                Err(e) => warn!(?path, error = %e, "skipping unreadable cache record"),
            }
        }

        debug!(removed, dir = ?self.dir, "flushed file cache");
        Ok(removed)
    }
}

fn remove_if_exists(path: &Path) -> Result<bool> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(CtDocsError::io(path, e)),
    }
}

/// Per-write suffix so concurrent writers of one key never share a temp file.
fn unique_suffix() -> String {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    format!(
        "{}-{}",
        std::process::id(),
        COUNTER.fetch_add(1, Ordering::Relaxed)
    )
}
