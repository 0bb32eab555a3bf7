//! # Result Cache
//!
//! Process-wide store that backs the article detail view. Every record shown
//! on a result page is inserted here under its slug so that `/article/<slug>`
//! can render it later.
//!
//! Entries expire after a configurable TTL and the cache holds at most a fixed
//! number of entries; when full, expired entries are purged first and then the
//! oldest entries are evicted. Nothing is persisted across restarts.

use dashmap::DashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{debug, info};

use crate::record::ResultRecord;

/// Default time-to-live for cached records (1 hour).
pub const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);

/// Default maximum number of cached records.
pub const DEFAULT_MAX_ENTRIES: usize = 10_000;

#[derive(Clone, Debug)]
struct CacheEntry {
    record: ResultRecord,
    inserted_at: Instant,
}

/// Thread-safe slug → record cache with TTL expiry and a capacity bound.
///
/// Reads go straight to the [`DashMap`]; inserts are serialized so the
/// capacity bound holds under concurrent searches.
pub struct ResultCache {
    entries: DashMap<String, CacheEntry>,
    ttl: Duration,
    max_entries: usize,
    insert_lock: Mutex<()>,
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL, DEFAULT_MAX_ENTRIES)
    }
}

impl ResultCache {
    /// Creates an empty cache.
    ///
    /// # Arguments
    /// * `ttl` - How long a record stays retrievable after insertion
    /// * `max_entries` - Upper bound on stored records (at least 1)
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            max_entries: max_entries.max(1),
            insert_lock: Mutex::new(()),
        }
    }

    /// Inserts a record under its slug, evicting old entries if the cache is
    /// full.
    ///
    /// A live entry with the same slug is replaced. Callers that must not
    /// clobber another record pick a free slug first (see [`ResultCache::contains`]).
    pub fn insert(&self, record: ResultRecord) {
        let _guard = self
            .insert_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if !self.entries.contains_key(&record.slug) && self.entries.len() >= self.max_entries {
            self.make_room();
        }

        self.entries.insert(
            record.slug.clone(),
            CacheEntry {
                record,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Looks up a record by slug.
    ///
    /// Returns `None` on a miss or when the entry has expired; an expired
    /// entry is removed on the way out.
    pub fn get(&self, slug: &str) -> Option<ResultRecord> {
        let entry = self.entries.get(slug)?;

        if entry.inserted_at.elapsed() >= self.ttl {
            drop(entry);
            self.entries
                .remove_if(slug, |_, e| e.inserted_at.elapsed() >= self.ttl);
            debug!("Cache entry '{}' expired", slug);
            return None;
        }

        Some(entry.record.clone())
    }

    /// Whether a live (unexpired) entry exists for `slug`.
    pub fn contains(&self, slug: &str) -> bool {
        self.entries
            .get(slug)
            .is_some_and(|entry| entry.inserted_at.elapsed() < self.ttl)
    }

    /// Removes every entry.
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Removes all expired entries and returns how many were dropped.
    pub fn purge_expired(&self) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| entry.inserted_at.elapsed() < self.ttl);
        before.saturating_sub(self.entries.len())
    }

    /// Number of entries currently stored, including any not yet purged.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Purges expired entries at a fixed interval, forever.
    ///
    /// Intended to be spawned as a background task from `main`.
    pub async fn start_periodic_purge(&self, interval: Duration) {
        info!(
            "Starting cache purge task (interval: {}s, ttl: {}s, capacity: {})",
            interval.as_secs(),
            self.ttl.as_secs(),
            self.max_entries
        );

        loop {
            sleep(interval).await;

            let removed = self.purge_expired();
            if removed > 0 {
                info!(
                    "🧹 CACHE PURGE: removed {} expired entries ({} remaining)",
                    removed,
                    self.len()
                );
            } else {
                debug!("Cache purge found no expired entries");
            }
        }
    }

    /// Frees at least one slot. Called with `insert_lock` held.
    fn make_room(&self) {
        let purged = self.purge_expired();
        if self.entries.len() < self.max_entries {
            debug!("Cache full, purged {} expired entries", purged);
            return;
        }

        // Evict the oldest tenth in one pass so a full cache does not rescan
        // on every subsequent insert.
        let evict_count = (self.max_entries / 10).max(1);
        let mut by_age: Vec<(String, Instant)> = self
            .entries
            .iter()
            .map(|e| (e.key().clone(), e.value().inserted_at))
            .collect();
        by_age.sort_by_key(|(_, inserted_at)| *inserted_at);

        for (slug, _) in by_age.into_iter().take(evict_count) {
            self.entries.remove(&slug);
        }

        debug!(
            "Cache full, evicted {} oldest entries ({} remaining)",
            evict_count,
            self.entries.len()
        );
    }
}

impl std::fmt::Debug for ResultCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultCache")
            .field("entries", &self.entries.len())
            .field("ttl", &self.ttl)
            .field("max_entries", &self.max_entries)
            .finish()
    }
}
