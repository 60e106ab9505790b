//! Expiring key-value cache used to memoize generated article metadata.
//!
//! The [`Cache`] trait is the collaborator contract consumed by `ctdocs-core`.
//! Two backends are provided:
//! - [`MemoryCache`]: process-local, concurrent map (tests, short-lived tools)
//! - [`FileCache`]: one JSON file per key under a directory (the CLI)
//!
//! Values are opaque JSON strings. Every backend namespaces its keys with a
//! prefix so that [`Cache::flush_all`] only touches entries it owns.

mod file;
mod memory;

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use ctdocs_shared::Result;

pub use file::FileCache;
pub use memory::MemoryCache;

/// Key-value store with per-entry expiry.
///
/// Implementations must make `set` atomic per key: a concurrent `get` sees
/// either the old value or the new one, never a partial write.
pub trait Cache: Send + Sync {
    /// Fetch a live entry. Expired entries are reported as absent.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`. `None` uses the backend's default TTL.
    fn set(&self, key: &str, value: String, ttl: Option<Duration>) -> Result<()>;

    /// Remove an entry. Returns whether anything was removed.
    fn delete(&self, key: &str) -> Result<bool>;

    /// Remove every entry under this cache's prefix. Returns the count removed.
    fn flush_all(&self) -> Result<usize>;
}

/// Return the cached value for `key`, or compute, store, and return it.
///
/// Cache failures never surface: an unreadable or undecodable entry counts
/// as a miss and a failed write still returns the computed value.
pub fn remember<T, F>(cache: &dyn Cache, key: &str, ttl: Option<Duration>, producer: F) -> T
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> T,
{
    match cache.get(key) {
        Ok(Some(raw)) => match serde_json::from_str::<T>(&raw) {
            Ok(value) => {
                debug!(key, "cache hit");
                return value;
            }
            Err(e) => warn!(key, error = %e, "discarding undecodable cache entry"),
        },
        Ok(None) => debug!(key, "cache miss"),
        Err(e) => warn!(key, error = %e, "cache read failed, recomputing"),
    }

    let value = producer();

    match serde_json::to_string(&value) {
        Ok(raw) => {
            if let Err(e) = cache.set(key, raw, ttl) {
                warn!(key, error = %e, "cache write failed");
            }
        }
        Err(e) => warn!(key, error = %e, "value not serializable, skipping cache write"),
    }

    value
}

/// Expiry instant for an entry written now with `ttl`.
pub(crate) fn expiry_from_now(ttl: Duration) -> DateTime<Utc> {
    chrono::TimeDelta::from_std(ttl)
        .ok()
        .and_then(|delta| Utc::now().checked_add_signed(delta))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    fn cache() -> MemoryCache {
        MemoryCache::new("ct_docs_", Duration::from_secs(60))
    }

    #[test]
    fn remember_computes_once() {
        let cache = cache();
        let calls = Cell::new(0);

        let first: Vec<u32> = remember(&cache, "numbers", None, || {
            calls.set(calls.get() + 1);
            vec![1, 2, 3]
        });
        let second: Vec<u32> = remember(&cache, "numbers", None, || {
            calls.set(calls.get() + 1);
            vec![9]
        });

        assert_eq!(first, vec![1, 2, 3]);
        assert_eq!(second, vec![1, 2, 3]);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn remember_recomputes_on_undecodable_entry() {
        let cache = cache();
        cache.set("count", "not-a-number".into(), None).unwrap();

        let value: u32 = remember(&cache, "count", None, || 7);
        assert_eq!(value, 7);
        assert_eq!(cache.get("count").unwrap().as_deref(), Some("7"));
    }

    #[test]
    fn expiry_saturates_on_huge_ttl() {
        assert_eq!(expiry_from_now(Duration::MAX), DateTime::<Utc>::MAX_UTC);
    }
}
