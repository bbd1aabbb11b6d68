//! Per-key TTL cache guarding outbound calls to paginated third-party APIs.
//!
//! Entries expire lazily: the first read after the TTL removes the entry and
//! reports a miss, and the caller refetches. Keys that are never read again
//! are swept on insert once the map grows past `SWEEP_THRESHOLD`. The map
//! lock only protects the map itself. Two concurrent misses on the same key
//! both go upstream and the later insert wins.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;

use crate::clock::Clock;

/// Sweep expired entries on insert once the map holds this many keys
const SWEEP_THRESHOLD: usize = 256;

#[derive(Debug, Clone, PartialEq)]
pub struct CachedPage<V> {
    pub key: String,
    pub payload: V,
    pub fetched_at: DateTime<Utc>,
}

pub struct TtlCache<V> {
    entries: Mutex<HashMap<String, CachedPage<V>>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
            clock,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Entry for `key` if it was fetched no more than `ttl` ago.
    pub fn get(&self, key: &str) -> Option<CachedPage<V>> {
        let now = self.clock.now();
        let mut entries = self.entries.lock();

        let fresh = entries
            .get(key)
            .map(|page| now - page.fetched_at <= self.ttl);

        match fresh {
            Some(true) => entries.get(key).cloned(),
            Some(false) => {
                tracing::debug!(key = %key, "Cache entry expired, evicting");
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Store `payload` under `key`, stamped with the current time.
    pub fn insert(&self, key: impl Into<String>, payload: V) -> CachedPage<V> {
        let key = key.into();
        let now = self.clock.now();
        let page = CachedPage {
            key: key.clone(),
            payload,
            fetched_at: now,
        };

        let mut entries = self.entries.lock();
        if entries.len() >= SWEEP_THRESHOLD {
            let before = entries.len();
            entries.retain(|_, cached| now - cached.fetched_at <= self.ttl);
            tracing::debug!(removed = before - entries.len(), "Swept expired cache entries");
        }
        entries.insert(key, page.clone());
        page
    }

    pub fn invalidate(&self, key: &str) {
        self.entries.lock().remove(key);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
