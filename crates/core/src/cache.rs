use crate::models::AddressSearchResult;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tracing::debug;

/// Time source for cache expiry. Injected so tests can drive the clock
/// instead of sleeping through the TTL.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// In-memory result cache keyed by normalized query. Expiry is lazy
/// (checked on read, no background sweep); capacity is enforced by a
/// bulk trim of the oldest entries after each insert, not per-entry
/// LRU. The map is mutex-guarded: `get` and `put` are each multi-step
/// and callers may sit on a multi-threaded executor.
pub struct SuggestionCache<C: Clock = SystemClock> {
    entries: Mutex<HashMap<String, AddressSearchResult>>,
    ttl: ChronoDuration,
    max_entries: usize,
    evict_batch: usize,
    clock: C,
}

impl SuggestionCache<SystemClock> {
    pub fn new(ttl: Duration, max_entries: usize, evict_batch: usize) -> Self {
        Self::with_clock(ttl, max_entries, evict_batch, SystemClock)
    }
}

impl<C: Clock> SuggestionCache<C> {
    pub fn with_clock(ttl: Duration, max_entries: usize, evict_batch: usize, clock: C) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl: ChronoDuration::from_std(ttl).unwrap_or(ChronoDuration::MAX),
            max_entries,
            evict_batch,
            clock,
        }
    }

    pub fn get(&self, key: &str) -> Option<AddressSearchResult> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let entry = entries.get(key)?;
        if self.clock.now() - entry.cached_at < self.ttl {
            return Some(entry.clone());
        }
        debug!(key, "cache entry expired");
        entries.remove(key);
        None
    }

    /// Overwrites any existing entry for `key` and stamps it with the
    /// current clock time. Once the map exceeds capacity the oldest
    /// `evict_batch` entries are dropped in one sweep.
    pub fn put(&self, key: impl Into<String>, mut result: AddressSearchResult) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        result.cached_at = self.clock.now();
        entries.insert(key.into(), result);

        if entries.len() > self.max_entries {
            let mut by_age: Vec<(String, DateTime<Utc>)> = entries
                .iter()
                .map(|(k, v)| (k.clone(), v.cached_at))
                .collect();
            by_age.sort_by_key(|(_, cached_at)| *cached_at);
            let evicted = by_age.len().min(self.evict_batch);
            for (stale_key, _) in by_age.into_iter().take(self.evict_batch) {
                entries.remove(&stale_key);
            }
            debug!(evicted, remaining = entries.len(), "cache trimmed");
        }
    }

    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
