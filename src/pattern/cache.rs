// Mon Oct 19 2026 - Alex

use crate::pattern::{CompiledPattern, PatternError};
use ahash::AHashMap;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::sync::Arc;

pub const DEFAULT_CACHE_CAPACITY: usize = 1000;

static GLOBAL_CACHE: Lazy<PatternCache> = Lazy::new(|| PatternCache::new(DEFAULT_CACHE_CAPACITY));

/// Compiles `source` once per process and hands out the shared result.
///
/// For a fixed signature a `static` works as well:
///
/// ```
/// use once_cell::sync::Lazy;
/// use sigscan::CompiledPattern;
///
/// static PROLOGUE: Lazy<CompiledPattern> =
///     Lazy::new(|| CompiledPattern::parse("55 48 89 E5").unwrap());
///
/// assert_eq!(PROLOGUE.find(&[0x90, 0x55, 0x48, 0x89, 0xE5]), Some(1));
/// ```
pub fn cached(source: &str) -> Result<Arc<CompiledPattern>, PatternError> {
    GLOBAL_CACHE.get_or_compile(source)
}

pub fn global() -> &'static PatternCache {
    &GLOBAL_CACHE
}

/// Pattern text to compiled pattern, shared between threads.
pub struct PatternCache {
    cache: RwLock<AHashMap<String, Arc<CompiledPattern>>>,
    max_size: usize,
}

impl PatternCache {
    pub fn new(max_size: usize) -> Self {
        Self {
            cache: RwLock::new(AHashMap::new()),
            max_size,
        }
    }

    pub fn get(&self, source: &str) -> Option<Arc<CompiledPattern>> {
        self.cache.read().get(source).cloned()
    }

    pub fn get_or_compile(&self, source: &str) -> Result<Arc<CompiledPattern>, PatternError> {
        if let Some(pattern) = self.get(source) {
            return Ok(pattern);
        }

        let compiled = Arc::new(CompiledPattern::parse(source)?);

        let mut cache = self.cache.write();
        if let Some(existing) = cache.get(source) {
            return Ok(existing.clone());
        }
        if cache.len() >= self.max_size {
            log::debug!("pattern cache full ({} entries), clearing", cache.len());
            cache.clear();
        }
        if self.max_size > 0 {
            cache.insert(source.to_string(), compiled.clone());
        }

        Ok(compiled)
    }

    pub fn clear(&self) {
        self.cache.write().clear();
    }

    pub fn size(&self) -> usize {
        self.cache.read().len()
    }

    pub fn capacity(&self) -> usize {
        self.max_size
    }
}

impl Default for PatternCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_reuses_compiled_pattern() {
        let cache = PatternCache::new(10);
        let a = cache.get_or_compile("48 8B ? C3").unwrap();
        let b = cache.get_or_compile("48 8B ? C3").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.size(), 1);
        assert!(cache.get("90").is_none());
    }

    #[test]
    fn test_cache_does_not_store_errors() {
        let cache = PatternCache::new(10);
        assert!(cache.get_or_compile("4 ?").is_err());
        assert_eq!(cache.size(), 0);
    }

    #[test]
    fn test_cache_clears_when_full() {
        let cache = PatternCache::new(2);
        cache.get_or_compile("01").unwrap();
        cache.get_or_compile("02").unwrap();
        cache.get_or_compile("03").unwrap();
        assert_eq!(cache.size(), 1);
        assert!(cache.get("03").is_some());

        cache.clear();
        assert_eq!(cache.size(), 0);
    }

    #[test]
    fn test_zero_capacity_stores_nothing() {
        let cache = PatternCache::new(0);
        let a = cache.get_or_compile("90 90").unwrap();
        let b = cache.get_or_compile("90 90").unwrap();
        assert_eq!(a, b);
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(cache.size(), 0);
    }

    #[test]
    fn test_global_cache() {
        let a = cached("DE AD ^ BE EF").unwrap();
        let b = cached("DE AD ^ BE EF").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.anchor_offset(), 2);
    }
}
