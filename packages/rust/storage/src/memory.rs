//! In-process cache backend.

use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tracing::debug;

use ctdocs_shared::{CacheConfig, Result};

use crate::{Cache, expiry_from_now};

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: DateTime<Utc>,
}

/// Concurrent in-memory cache with lazy expiry (entries are evicted on read).
#[derive(Debug)]
pub struct MemoryCache {
    entries: DashMap<String, Entry>,
    prefix: String,
    default_ttl: Duration,
}

impl MemoryCache {
    pub fn new(prefix: impl Into<String>, default_ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            prefix: prefix.into(),
            default_ttl,
        }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(
            config.prefix.clone(),
            Duration::from_secs(config.ttl_secs),
        )
    }

    /// Number of stored entries, including expired ones not yet evicted.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}{key}", self.prefix)
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::from_config(&CacheConfig::default())
    }
}

impl Cache for MemoryCache {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let key = self.full_key(key);
        let now = Utc::now();

        if self
            .entries
            .remove_if(&key, |_, entry| entry.expires_at <= now)
            .is_some()
        {
            debug!(%key, "evicted expired entry");
            return Ok(None);
        }

        Ok(self.entries.get(&key).map(|entry| entry.value.clone()))
    }

    fn set(&self, key: &str, value: String, ttl: Option<Duration>) -> Result<()> {
        let expires_at = expiry_from_now(ttl.unwrap_or(self.default_ttl));
        self.entries
            .insert(self.full_key(key), Entry { value, expires_at });
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<bool> {
        Ok(self.entries.remove(&self.full_key(key)).is_some())
    }

    fn flush_all(&self) -> Result<usize> {
        let before = self.entries.len();
        self.entries.retain(|key, _| !key.starts_with(&self.prefix));
        Ok(before - self.entries.len())
    }
}
