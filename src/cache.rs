//! In-memory TTL cache used to memoize scraped pages.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

/// A stored value together with the instant it was written.
#[derive(Debug, Clone)]
struct CacheEntry<T> {
    data: T,
    stored_at: Instant,
}

impl<T> CacheEntry<T> {
    fn new(data: T) -> Self {
        Self {
            data,
            stored_at: Instant::now(),
        }
    }

    fn is_stale(&self, ttl: Duration) -> bool {
        self.stored_at.elapsed() > ttl
    }
}

/// String-keyed cache with a single, fixed expiry window.
///
/// Expiry is measured from write time and checked lazily on [`get`](Self::get);
/// a read that finds an expired entry evicts it. There is no capacity bound
/// and no background sweep.
///
/// Time is read through [`tokio::time::Instant`], so tests can drive expiry
/// with a paused runtime clock.
#[derive(Debug)]
pub struct TtlCache<T> {
    entries: Mutex<HashMap<String, CacheEntry<T>>>,
    ttl: Duration,
}

impl<T: Clone> TtlCache<T> {
    /// Create an empty cache whose entries live for `ttl_secs` seconds.
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl: Duration::from_secs(ttl_secs),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Return a copy of the value stored under `key`, if it has not expired.
    pub fn get(&self, key: &str) -> Option<T> {
        let mut entries = self.lock();
        if entries.get(key)?.is_stale(self.ttl) {
            debug!(key, "evicting expired cache entry");
            entries.remove(key);
            return None;
        }
        entries.get(key).map(|entry| entry.data.clone())
    }

    /// Insert or overwrite `key`, stamping it with the current time.
    pub fn set(&self, key: impl Into<String>, data: T) {
        self.lock().insert(key.into(), CacheEntry::new(data));
    }

    /// Remove every entry.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Number of stored entries, including expired ones that have not been read yet.
    pub fn size(&self) -> usize {
        self.lock().len()
    }

    // No operation leaves the map half-updated, so poisoning is ignored.
    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, CacheEntry<T>>> {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
