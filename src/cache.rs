//! View-instance cache.
//!
//! [`ViewCache`] memoizes constructed views of routes registered with
//! `cached(true)`. Keys are [`CacheKey`]s: the route *pattern* plus the
//! canonical serialization of the params, so `/recipes/{id}` with `id=1` and
//! `id=2` are two entries, and clearing `/recipes/{id}` drops both.
//!
//! The cache is **unbounded**: nothing is ever evicted implicitly. Long
//! sessions visiting many distinct parametrized pages grow it without limit;
//! call [`RouteTable::clear_cache`](crate::RouteTable::clear_cache) when that
//! matters.
//!
//! [`CacheStats`] tracks hits, misses, inserts and invalidations.
//!
//! # Examples
//!
//! ```
//! use shell_navigator::cache::CacheKey;
//! use shell_navigator::RouteParams;
//!
//! let a = CacheKey::new("/recipes/{id}", &RouteParams::new().with("id", "1"));
//! assert_eq!(a.pattern(), "/recipes/{id}");
//! assert_eq!(a.params_key(), "id=1");
//! ```

use crate::params::RouteParams;
use crate::view::ViewRef;
use crate::{debug_log, trace_log};
use std::collections::HashMap;
use std::fmt;

/// Key of a cached view instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pattern: String,
    params_key: String,
}

impl CacheKey {
    /// Build a key from a route pattern and params.
    pub fn new(pattern: impl Into<String>, params: &RouteParams) -> Self {
        Self {
            pattern: pattern.into(),
            params_key: params.cache_key(),
        }
    }

    /// Route pattern part of the key.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Canonical params part of the key.
    pub fn params_key(&self) -> &str {
        &self.params_key
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.params_key.is_empty() {
            f.write_str(&self.pattern)
        } else {
            write!(f, "{}?{}", self.pattern, self.params_key)
        }
    }
}

/// Counters tracking cache effectiveness.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from the cache.
    pub hits: usize,
    /// Lookups that had to construct a view.
    pub misses: usize,
    /// Views stored.
    pub inserts: usize,
    /// Views removed by clearing.
    pub invalidations: usize,
}

impl CacheStats {
    /// Hit rate in `0.0..=1.0`; `0.0` when nothing was looked up.
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Unbounded map from [`CacheKey`] to view instance.
#[derive(Default)]
pub struct ViewCache {
    entries: HashMap<CacheKey, ViewRef>,
    stats: CacheStats,
}

impl ViewCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up an instance, recording a hit or a miss.
    pub fn get(&mut self, key: &CacheKey) -> Option<ViewRef> {
        if let Some(view) = self.entries.get(key) {
            self.stats.hits += 1;
            trace_log!("View cache hit for '{}'", key);
            Some(view.clone())
        } else {
            self.stats.misses += 1;
            trace_log!("View cache miss for '{}'", key);
            None
        }
    }

    /// Store an instance, replacing any previous one under the same key.
    pub fn insert(&mut self, key: CacheKey, view: ViewRef) {
        trace_log!("Caching {} under '{}'", view.view_name(), key);
        self.entries.insert(key, view);
        self.stats.inserts += 1;
    }

    /// Return `true` if an instance is stored under `key`. Does not touch
    /// the stats.
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Remove every instance. Returns how many were removed.
    pub fn clear(&mut self) -> usize {
        let removed = self.entries.len();
        self.entries.clear();
        self.stats.invalidations += removed;
        debug_log!(
            "View cache cleared: {} instances removed (hit rate {:.1}%)",
            removed,
            self.stats.hit_rate() * 100.0
        );
        removed
    }

    /// Remove the instances whose key pattern equals `pattern`. Returns how
    /// many were removed.
    pub fn clear_pattern(&mut self, pattern: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| key.pattern != pattern);
        let removed = before - self.entries.len();
        self.stats.invalidations += removed;
        debug_log!(
            "View cache cleared for '{}': {} instances removed",
            pattern,
            removed
        );
        removed
    }

    /// Number of cached instances.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current statistics.
    pub const fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Reset all counters to zero.
    pub fn reset_stats(&mut self) {
        self.stats = CacheStats::default();
    }
}

impl fmt::Debug for ViewCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewCache")
            .field("len", &self.entries.len())
            .field("stats", &self.stats)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::{same_view, View};
    use std::rc::Rc;

    struct Dummy;
    impl View for Dummy {}

    fn key(pattern: &str, id: &str) -> CacheKey {
        CacheKey::new(pattern, &RouteParams::new().with("id", id))
    }

    #[test]
    fn test_cache_miss_then_hit() {
        let mut cache = ViewCache::new();
        assert!(cache.get(&key("/recipes/{id}", "1")).is_none());
        assert_eq!(cache.stats().misses, 1);

        let view: ViewRef = Rc::new(Dummy);
        cache.insert(key("/recipes/{id}", "1"), view.clone());

        let hit = cache.get(&key("/recipes/{id}", "1")).unwrap();
        assert!(same_view(&hit, &view));
        assert_eq!(cache.stats().hits, 1);
        assert_eq!(cache.stats().inserts, 1);
    }

    #[test]
    fn test_clear_pattern_keeps_others() {
        let mut cache = ViewCache::new();
        cache.insert(key("/recipes/{id}", "1"), Rc::new(Dummy));
        cache.insert(key("/recipes/{id}", "2"), Rc::new(Dummy));
        cache.insert(CacheKey::new("/dashboard", &RouteParams::new()), Rc::new(Dummy));

        assert_eq!(cache.clear_pattern("/recipes/{id}"), 2);
        assert_eq!(cache.len(), 1);
        assert!(cache.contains(&CacheKey::new("/dashboard", &RouteParams::new())));
        assert_eq!(cache.stats().invalidations, 2);
    }

    #[test]
    fn test_clear_all() {
        let mut cache = ViewCache::new();
        cache.insert(key("/a", "1"), Rc::new(Dummy));
        cache.insert(key("/b", "1"), Rc::new(Dummy));

        assert_eq!(cache.clear(), 2);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_hit_rate() {
        let mut cache = ViewCache::new();
        assert!((cache.stats().hit_rate() - 0.0).abs() < f64::EPSILON);

        cache.insert(key("/a", "1"), Rc::new(Dummy));
        cache.get(&key("/a", "1"));
        cache.get(&key("/a", "2"));
        cache.get(&key("/a", "1"));
        cache.get(&key("/a", "3"));

        assert!((cache.stats().hit_rate() - 0.5).abs() < 0.001);
        cache.reset_stats();
        assert_eq!(*cache.stats(), CacheStats::default());
    }

    #[test]
    fn test_cache_key_display() {
        assert_eq!(
            CacheKey::new("/dashboard", &RouteParams::new()).to_string(),
            "/dashboard"
        );
        assert_eq!(key("/recipes/{id}", "4").to_string(), "/recipes/{id}?id=4");
    }
}
