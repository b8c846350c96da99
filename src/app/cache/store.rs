//! Bounded query-keyed cache
//!
//! Entries are immutable pages keyed by the canonical query. Reads promote an
//! entry; inserting past capacity evicts the least recently used one.

use std::num::NonZeroUsize;

use lru::LruCache;
use tracing::debug;

use crate::app::query::QueryKey;

use super::stats::CacheStats;

/// One cached page: items in server order plus the collection total
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<R> {
    pub items: Vec<R>,
    pub total: u64,
}

impl<R> CacheEntry<R> {
    /// Create an entry
    pub fn new(items: Vec<R>, total: u64) -> Self {
        Self { items, total }
    }
}

/// LRU cache of pages keyed by canonical query
#[derive(Debug)]
pub struct QueryCache<R> {
    entries: LruCache<QueryKey, CacheEntry<R>>,
    hits: u64,
    misses: u64,
    evictions: u64,
}

impl<R: Clone> QueryCache<R> {
    /// Create an empty cache holding at most `capacity` queries
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: LruCache::new(capacity),
            hits: 0,
            misses: 0,
            evictions: 0,
        }
    }

    /// Look up a page, promoting it on hit; counts the hit or miss
    pub fn lookup(&mut self, key: &QueryKey) -> Option<CacheEntry<R>> {
        match self.entries.get(key) {
            Some(entry) => {
                self.hits += 1;
                Some(entry.clone())
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Whether a page is cached, without promoting it or counting a lookup
    pub fn contains(&self, key: &QueryKey) -> bool {
        self.entries.contains(key)
    }

    /// Store a page
    pub fn insert(&mut self, key: QueryKey, entry: CacheEntry<R>) {
        let inserted = key.clone();
        if let Some((evicted, _)) = self.entries.push(key, entry) {
            // push hands back the old value for a replaced key, or the evicted entry
            if evicted != inserted {
                self.evictions += 1;
                debug!("Evicted least recently used query {}", evicted);
            }
        }
    }

    /// Number of cached pages
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is cached
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every page; counters are kept
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Current counters
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            evictions: self.evictions,
            entries: self.entries.len(),
            capacity: self.entries.cap().get(),
        }
    }
}
