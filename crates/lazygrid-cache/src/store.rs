use chrono::{DateTime, Duration, Utc};
use lazygrid_types::{Fingerprint, GridRecord, Page};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

/// TTL-bounded snapshot of the rows fetched so far for one filter
/// fingerprint, plus the pagination metadata needed to resume loading.
#[derive(Debug, Clone)]
pub struct CacheEntry<R> {
    pub fingerprint: Fingerprint,
    pub records: Vec<R>,
    pub total_loaded: usize,
    /// Highest 1-based page index written so far
    pub pages_loaded: u32,
    pub has_more: bool,
    pub fetched_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl<R> CacheEntry<R> {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Shared, mutex-guarded store mapping filter fingerprints to cached row
/// snapshots.
///
/// One instance serves every grid in the process; appends are idempotent on
/// record identity, so interleaved writers for the same fingerprint cannot
/// corrupt an entry. Expiry is sliding: every write pushes `expires_at`
/// forward, and an expired entry reads as a miss until the next write to the
/// same key replaces it.
pub struct ResultCache<R> {
    entries: Mutex<HashMap<Fingerprint, CacheEntry<R>>>,
}

impl<R> Default for ResultCache<R>
where
    R: GridRecord,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<R: GridRecord> ResultCache<R> {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Handle intended to be created once and shared across grid instances
    /// for the life of the process.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Look up a live entry. Expired entries read as a miss.
    pub fn get(&self, fingerprint: &Fingerprint) -> Option<CacheEntry<R>> {
        self.get_at(fingerprint, Utc::now())
    }

    /// Clock-injected variant of [`get`](Self::get)
    pub fn get_at(&self, fingerprint: &Fingerprint, now: DateTime<Utc>) -> Option<CacheEntry<R>> {
        let entries = self.entries.lock().unwrap();
        entries
            .get(fingerprint)
            .filter(|entry| !entry.is_expired(now))
            .cloned()
    }

    /// Record a fetched page.
    ///
    /// The first write for a fingerprint creates the entry; later writes
    /// append, deduplicating by record identity, and refresh `has_more`.
    /// A write to an expired key discards the stale rows first.
    pub fn put(
        &self,
        fingerprint: &Fingerprint,
        page: &Page<R>,
        has_more: bool,
        ttl: Duration,
    ) -> CacheEntry<R> {
        self.put_at(fingerprint, page, has_more, ttl, Utc::now())
    }

    /// Clock-injected variant of [`put`](Self::put)
    pub fn put_at(
        &self,
        fingerprint: &Fingerprint,
        page: &Page<R>,
        has_more: bool,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> CacheEntry<R> {
        let mut entries = self.entries.lock().unwrap();

        let stale = entries
            .get(fingerprint)
            .map(|entry| entry.is_expired(now))
            .unwrap_or(true);
        if stale {
            // Fresh entry; lazily evicts an expired predecessor
            entries.insert(
                fingerprint.clone(),
                CacheEntry {
                    fingerprint: fingerprint.clone(),
                    records: Vec::new(),
                    total_loaded: 0,
                    pages_loaded: 0,
                    has_more,
                    fetched_at: now,
                    expires_at: now + ttl,
                },
            );
        }

        let entry = entries
            .get_mut(fingerprint)
            .expect("entry exists after insert");

        let mut seen: HashSet<_> = entry
            .records
            .iter()
            .map(|record| record.record_id())
            .collect();
        for record in &page.records {
            let id = record.record_id();
            if seen.insert(id.clone()) {
                entry.records.push(record.clone());
            } else {
                log::warn!(
                    "cache entry {} already holds record {}; duplicate ignored",
                    fingerprint,
                    id
                );
            }
        }

        entry.total_loaded = entry.records.len();
        entry.pages_loaded = entry.pages_loaded.max(page.index);
        entry.has_more = has_more;
        entry.expires_at = now + ttl;
        entry.clone()
    }

    /// Drop the entry for one fingerprint, if present
    pub fn invalidate(&self, fingerprint: &Fingerprint) {
        self.entries.lock().unwrap().remove(fingerprint);
    }

    /// Drop every entry. Called after record mutations that may affect any
    /// filter combination.
    pub fn invalidate_all(&self) {
        self.entries.lock().unwrap().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap().is_empty()
    }
}
