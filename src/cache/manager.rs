//! In-memory TTL cache
//!
//! Provides a `TtlCache` that stores values with a uniform expiry. Expired
//! entries are never returned; they are removed lazily on read or in bulk by
//! `sweep`, which the background sweeper calls on a fixed interval.

use std::fmt::Debug;
use std::sync::{Arc, Mutex};
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde::Serialize;
use tracing::debug;

/// Default lifetime of a cache entry in hours
pub const DEFAULT_TTL_HOURS: i64 = 24;

/// Source of the current time for expiry decisions
pub trait Clock: Send + Sync + Debug {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to
///
/// Clones share the same time, so a test can keep one handle and give
/// another to the cache.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    /// Moves the clock forward by `by`
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Aggregate view of the cache contents
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub total_entries: usize,
    pub valid_entries: usize,
    /// Entries past their expiry that no read or sweep has removed yet
    pub expired_entries: usize,
    /// Age of the oldest entry in seconds
    pub oldest_entry_age_secs: Option<i64>,
}

/// Key/value cache operations the search service depends on
pub trait CacheStore<V>: Send + Sync {
    /// Returns the value if present and unexpired
    fn get(&self, key: &str) -> Option<V>;

    /// Stores `value`, overwriting any previous entry and restarting its TTL
    fn set(&self, key: &str, value: V);

    /// Removes the entry, returning whether one existed
    fn delete(&self, key: &str) -> bool;

    /// Removes every entry
    fn clear(&self);

    /// Removes all expired entries, returning how many were removed
    fn sweep(&self) -> usize;

    fn stats(&self) -> CacheStats;
}

/// Wrapper struct for a cached value
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    /// The cached value
    value: V,
    /// When the value was cached
    cached_at: DateTime<Utc>,
    /// When the cache entry expires
    expires_at: DateTime<Utc>,
}

impl<V> CacheEntry<V> {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// Concurrent in-memory cache with a uniform TTL
#[derive(Debug)]
pub struct TtlCache<V> {
    entries: DashMap<String, CacheEntry<V>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl<V: Clone + Send + Sync> TtlCache<V> {
    /// Creates a cache using wall-clock time
    pub fn new(ttl: StdDuration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    /// Creates a cache that reads time from `clock`
    pub fn with_clock(ttl: StdDuration, clock: Arc<dyn Clock>) -> Self {
        // Capped so `now + ttl` stays within chrono's date range
        let max_ttl = Duration::days(365 * 100);
        let ttl = Duration::from_std(ttl).map_or(max_ttl, |ttl| ttl.min(max_ttl));
        Self {
            entries: DashMap::new(),
            ttl,
            clock,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V: Clone + Send + Sync> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new(StdDuration::from_secs(DEFAULT_TTL_HOURS as u64 * 60 * 60))
    }
}

impl<V: Clone + Send + Sync> CacheStore<V> for TtlCache<V> {
    fn get(&self, key: &str) -> Option<V> {
        let now = self.clock.now();

        if let Some(entry) = self.entries.get(key) {
            if !entry.is_expired(now) {
                return Some(entry.value.clone());
            }
        } else {
            return None;
        }

        // Expired: evict, unless a concurrent set refreshed it meanwhile
        self.entries.remove_if(key, |_, entry| entry.is_expired(now));
        debug!(key, "evicted expired cache entry on read");
        None
    }

    fn set(&self, key: &str, value: V) {
        let now = self.clock.now();
        let entry = CacheEntry {
            value,
            cached_at: now,
            expires_at: now + self.ttl,
        };
        self.entries.insert(key.to_string(), entry);
    }

    fn delete(&self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    fn clear(&self) {
        self.entries.clear();
    }

    fn sweep(&self) -> usize {
        let now = self.clock.now();
        let mut removed = 0;
        self.entries.retain(|_, entry| {
            let keep = !entry.is_expired(now);
            if !keep {
                removed += 1;
            }
            keep
        });
        removed
    }

    fn stats(&self) -> CacheStats {
        let now = self.clock.now();
        let mut stats = CacheStats::default();
        let mut oldest: Option<DateTime<Utc>> = None;

        for entry in self.entries.iter() {
            stats.total_entries += 1;
            if entry.is_expired(now) {
                stats.expired_entries += 1;
            } else {
                stats.valid_entries += 1;
            }
            oldest = Some(match oldest {
                Some(current) => current.min(entry.cached_at),
                None => entry.cached_at,
            });
        }

        stats.oldest_entry_age_secs = oldest.map(|cached_at| (now - cached_at).num_seconds());
        stats
    }
}
