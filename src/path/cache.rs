//! Parsed path cache
//!
//! Callers that evaluate the same path text repeatedly (the NIF surface, for
//! one) look it up here instead of re-parsing. Entries are `Arc`s, so a hit is
//! a refcount bump. Malformed paths are never cached.

use super::parser::ParsedPath;
use crate::error::Result;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

/// Capacity of the process-wide cache
pub const DEFAULT_CAPACITY: usize = 256;

/// Hit / miss counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

struct Inner {
    entries: LruCache<String, Arc<ParsedPath>>,
    stats: CacheStats,
}

/// Thread-safe LRU cache of parsed paths keyed by path text
pub struct PathCache {
    inner: Mutex<Inner>,
}

impl PathCache {
    /// Create a cache holding at most `capacity` paths (minimum 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        PathCache {
            inner: Mutex::new(Inner {
                entries: LruCache::new(capacity),
                stats: CacheStats::default(),
            }),
        }
    }

    // A panic while holding the lock cannot leave the LRU half-updated in a
    // way that matters here, so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Return the cached parse of `path`, parsing and inserting on a miss
    pub fn get_or_parse(&self, path: &str) -> Result<Arc<ParsedPath>> {
        {
            let mut inner = self.lock();
            if let Some(parsed) = inner.entries.get(path).cloned() {
                inner.stats.hits += 1;
                return Ok(parsed);
            }
            inner.stats.misses += 1;
        }

        // parse outside the lock
        log::trace!("path cache miss: {:?}", path);
        let parsed = Arc::new(ParsedPath::parse(path)?);
        self.lock().entries.put(path.to_string(), Arc::clone(&parsed));
        Ok(parsed)
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.lock().entries.cap().get()
    }

    pub fn stats(&self) -> CacheStats {
        self.lock().stats
    }

    /// Drop every entry and reset the counters
    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.entries.clear();
        inner.stats = CacheStats::default();
    }
}

impl Default for PathCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

static GLOBAL: OnceLock<PathCache> = OnceLock::new();

/// The process-wide cache
pub fn global() -> &'static PathCache {
    GLOBAL.get_or_init(PathCache::default)
}

/// Parse `path` through the process-wide cache
pub fn compile(path: &str) -> Result<Arc<ParsedPath>> {
    global().get_or_parse(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_returns_same_arc() {
        let cache = PathCache::new(4);
        let a = cache.get_or_parse("/A/B").unwrap();
        let b = cache.get_or_parse("/A/B").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.stats(), CacheStats { hits: 1, misses: 1 });
    }

    #[test]
    fn test_evicts_least_recently_used() {
        let cache = PathCache::new(2);
        let a = cache.get_or_parse("A").unwrap();
        cache.get_or_parse("B").unwrap();
        cache.get_or_parse("A").unwrap();
        cache.get_or_parse("C").unwrap(); // evicts B
        assert_eq!(cache.len(), 2);
        assert!(Arc::ptr_eq(&a, &cache.get_or_parse("A").unwrap()));
        let misses = cache.stats().misses;
        cache.get_or_parse("B").unwrap();
        assert_eq!(cache.stats().misses, misses + 1);
    }

    #[test]
    fn test_errors_not_cached() {
        let cache = PathCache::new(4);
        assert!(cache.get_or_parse("A[@id").unwrap_err().is_malformed_path());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_zero_capacity_clamped() {
        let cache = PathCache::new(0);
        assert_eq!(cache.capacity(), 1);
    }

    #[test]
    fn test_clear() {
        let cache = PathCache::default();
        assert_eq!(cache.capacity(), DEFAULT_CAPACITY);
        cache.get_or_parse("A").unwrap();
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.stats(), CacheStats::default());
    }

    #[test]
    fn test_global_compile() {
        let path = compile("/A/B[@id='one']").unwrap();
        assert!(path.is_absolute());
        assert!(Arc::ptr_eq(&path, &compile("/A/B[@id='one']").unwrap()));
    }
}
