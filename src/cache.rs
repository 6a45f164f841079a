//! Compiled pattern memoization with LRU eviction

use crate::normalize::Direction;
use crate::pattern::{compile_pattern, CompiledPattern};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

/// Default number of (query, direction) entries kept alive.
const DEFAULT_CACHE_CAPACITY: usize = 256;

#[derive(Debug, Clone, Hash, PartialEq, Eq)]
struct PatternKey {
    query: String,
    direction: Direction,
}

/// Caches compiled patterns keyed by the raw query plus the content
/// direction, so a results list reuses one pattern across every entry it
/// renders. Unmatched queries (`None`) are cached too; recompiling an empty
/// query per row would defeat the point.
pub struct PatternCache {
    cache: Mutex<LruCache<PatternKey, Option<Arc<CompiledPattern>>>>,
}

impl PatternCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity)
            .unwrap_or(NonZeroUsize::new(DEFAULT_CACHE_CAPACITY).unwrap());
        Self {
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Fetch or compile the pattern for `query` under `direction`.
    pub fn get(&self, query: &str, direction: Direction) -> Option<Arc<CompiledPattern>> {
        let key = PatternKey {
            query: query.to_string(),
            direction,
        };
        {
            let mut cache = self.cache.lock().unwrap();
            if let Some(entry) = cache.get(&key) {
                return entry.clone();
            }
        }

        let compiled = compile_pattern(query, direction).map(Arc::new);
        {
            let mut cache = self.cache.lock().unwrap();
            cache.put(key, compiled.clone());
        }
        compiled
    }

    pub fn clear(&self) {
        self.cache.lock().unwrap().clear();
    }

    pub fn stats(&self) -> (usize, usize) {
        let cache = self.cache.lock().unwrap();
        (cache.len(), cache.cap().get())
    }
}

impl Default for PatternCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}
