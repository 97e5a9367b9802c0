//! Translated-answer cache keyed by `(entry id, language code)`.
//!
//! Entries carry a monotonic expiry and are treated as absent once it passes
//! (lazy expiry; [`TranslationCache::spawn_sweeper`] optionally reclaims them
//! in the background).
//!
//! Invalidations are numbered by a cache-wide epoch. Each entry id remembers
//! the epoch of its last invalidation (its generation). A reader takes
//! [`TranslationCache::epoch`] before loading the entity it will translate,
//! and [`TranslationCache::put_if_current`] refuses the result if the entity
//! was invalidated after that point.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use serde::Serialize;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Cache key: entry id plus canonical language code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub id: u64,
    pub lang: String,
}

impl CacheKey {
    pub fn new(id: u64, lang: &str) -> Self {
        Self {
            id,
            lang: lang.to_string(),
        }
    }
}

/// A single cached translation.
#[derive(Debug, Clone)]
struct CacheEntry {
    text: String,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Lock-free cache counters.
#[derive(Debug, Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    inserts: AtomicU64,
    stale_rejected: AtomicU64,
    invalidations: AtomicU64,
    expired: AtomicU64,
}

/// Snapshot of cache statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Entries currently stored (may include not-yet-swept expired ones).
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub inserts: u64,
    /// Translations discarded because their entry was invalidated mid-flight.
    pub stale_rejected: u64,
    pub invalidations: u64,
    /// Entries removed after their TTL elapsed.
    pub expired: u64,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Concurrent translation cache.
///
/// All operations take `&self`; share it as `Arc<TranslationCache>`.
#[derive(Debug)]
pub struct TranslationCache {
    entries: DashMap<CacheKey, CacheEntry>,
    generations: DashMap<u64, u64>,
    epoch: AtomicU64,
    languages: Vec<String>,
    counters: Counters,
}

impl TranslationCache {
    /// Create a cache whose invalidation covers `languages`.
    pub fn new<I, S>(languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entries: DashMap::new(),
            generations: DashMap::new(),
            epoch: AtomicU64::new(0),
            languages: languages.into_iter().map(Into::into).collect(),
            counters: Counters::default(),
        }
    }

    /// Return the cached text if present and unexpired.
    pub fn get(&self, id: u64, lang: &str) -> Option<String> {
        let key = CacheKey::new(id, lang);
        let now = Instant::now();
        let expired = match self.entries.get(&key) {
            Some(entry) if !entry.is_expired(now) => {
                self.counters.hits.fetch_add(1, Ordering::Relaxed);
                return Some(entry.text.clone());
            }
            Some(_) => true,
            None => false,
        };
        if expired && self.entries.remove_if(&key, |_, e| e.is_expired(now)).is_some() {
            debug!(id, lang, "Cache entry expired, removing");
            self.counters.expired.fetch_add(1, Ordering::Relaxed);
        }
        self.counters.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    /// Store `text`, overwriting any existing entry, expiring after `ttl`.
    pub fn put(&self, id: u64, lang: &str, text: String, ttl: Duration) {
        self.entries.insert(
            CacheKey::new(id, lang),
            CacheEntry {
                text,
                expires_at: Instant::now() + ttl,
            },
        );
        self.counters.inserts.fetch_add(1, Ordering::Relaxed);
    }

    /// Current invalidation epoch.
    ///
    /// Read it before loading the entity to translate and pass it to
    /// [`put_if_current`](Self::put_if_current).
    pub fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::SeqCst)
    }

    /// Epoch of the last invalidation of `id`, or 0 if it was never invalidated.
    pub fn generation(&self, id: u64) -> u64 {
        self.generations.get(&id).map(|g| *g).unwrap_or(0)
    }

    /// Store `text` only if `id` has not been invalidated since `epoch` was
    /// read. Returns whether the entry was stored.
    pub fn put_if_current(
        &self,
        id: u64,
        lang: &str,
        text: String,
        ttl: Duration,
        epoch: u64,
    ) -> bool {
        // The entry's shard lock is held across the check. `invalidate`
        // records the generation before removing entries, so it either is
        // seen here or removes this insert afterwards.
        let slot = self.entries.entry(CacheKey::new(id, lang));
        if self.generation(id) > epoch {
            drop(slot);
            self.counters.stale_rejected.fetch_add(1, Ordering::Relaxed);
            debug!(id, lang, "Discarding translation started before invalidation");
            return false;
        }
        slot.insert(CacheEntry {
            text,
            expires_at: Instant::now() + ttl,
        });
        self.counters.inserts.fetch_add(1, Ordering::Relaxed);
        true
    }

    /// Remove every entry for `id` across all supported languages.
    ///
    /// Safe to call when nothing is cached. Returns the number of entries removed.
    pub fn invalidate(&self, id: u64) -> usize {
        {
            let mut generation = self.generations.entry(id).or_insert(0);
            *generation = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        }
        let removed = self
            .languages
            .iter()
            .filter(|lang| self.entries.remove(&CacheKey::new(id, lang)).is_some())
            .count();
        self.counters.invalidations.fetch_add(1, Ordering::Relaxed);
        removed
    }

    /// Invalidate `id` and drop its generation record. For ids that will
    /// never be served again.
    pub fn forget(&self, id: u64) -> usize {
        let removed = self.invalidate(id);
        self.generations.remove(&id);
        removed
    }

    /// Number of ids with a recorded invalidation generation.
    pub fn tracked_generations(&self) -> usize {
        self.generations.len()
    }

    /// Remove the entry for a single `(id, lang)` pair.
    pub fn invalidate_lang(&self, id: u64, lang: &str) -> bool {
        self.entries.remove(&CacheKey::new(id, lang)).is_some()
    }

    /// Drop all expired entries. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, e| !e.is_expired(now));
        let removed = before.saturating_sub(self.entries.len());
        self.counters
            .expired
            .fetch_add(removed as u64, Ordering::Relaxed);
        removed
    }

    /// Periodically purge expired entries until `shutdown` is cancelled.
    pub fn spawn_sweeper(
        self: Arc<Self>,
        interval: Duration,
        shutdown: CancellationToken,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => {
                        info!("Cache sweeper shutting down");
                        return;
                    }
                    _ = tokio::time::sleep(interval) => {}
                }
                let removed = self.purge_expired();
                if removed > 0 {
                    debug!(removed, "Swept expired translations");
                }
            }
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            inserts: self.counters.inserts.load(Ordering::Relaxed),
            stale_rejected: self.counters.stale_rejected.load(Ordering::Relaxed),
            invalidations: self.counters.invalidations.load(Ordering::Relaxed),
            expired: self.counters.expired.load(Ordering::Relaxed),
        }
    }
}
