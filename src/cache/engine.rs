//! Cache Engine Module
//!
//! The TTL cache engine: opaque values memoized under string keys with
//! per-entry expiry, tag indexing, approximate-LRU eviction and a periodic
//! sweep hook. Multiple independently tuned instances share this one
//! implementation.

use std::collections::HashMap;
use std::future::Future;

use regex::Regex;
use serde::Serialize;
use tracing::{debug, warn};

use crate::cache::{CacheEntry, CacheStats};

/// Outcome of a single keyed read, resolved before stats are touched.
enum ReadOutcome<V> {
    Hit(V),
    Expired,
    Missing,
}

// == Cache Engine ==
/// TTL key-value store with tag invalidation and capacity-bounded eviction.
///
/// `set` never fails and never reports backpressure; capacity pressure is
/// absorbed by evicting the entry with the lowest recency/frequency score.
/// Expired entries are never returned: they are removed lazily on read or
/// eagerly by [`cleanup`](Self::cleanup), whichever comes first.
#[derive(Debug)]
pub struct CacheEngine<V> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// Cumulative performance counters
    stats: CacheStats,
    /// Maximum number of entries allowed
    capacity: usize,
    /// TTL in milliseconds for entries stored without an explicit TTL
    default_ttl_ms: u64,
    /// Size above which an entry is flagged compressible (statistics only)
    compression_threshold_bytes: usize,
}

impl<V: Clone + Serialize> CacheEngine<V> {
    // == Constructor ==
    /// Creates a new engine.
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of entries the cache can hold
    /// * `default_ttl_ms` - TTL applied when `set` is called without one
    /// * `compression_threshold_bytes` - Flagging threshold for statistics
    pub fn new(capacity: usize, default_ttl_ms: u64, compression_threshold_bytes: usize) -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::new(capacity),
            capacity,
            default_ttl_ms,
            compression_threshold_bytes,
        }
    }

    // == Set ==
    /// Stores a value under `key`, overwriting any existing entry.
    ///
    /// If the key is new and the cache is at capacity, the entry with the
    /// lowest eviction score is removed first. The serialized size is
    /// estimated for statistics; estimation failures count the entry as
    /// zero bytes rather than failing the store.
    ///
    /// # Arguments
    /// * `key` - The key to store under
    /// * `value` - The value to store
    /// * `ttl_ms` - Optional TTL in milliseconds (default TTL if `None`)
    /// * `tags` - Invalidation tags describing what would invalidate it
    pub fn set(&mut self, key: String, value: V, ttl_ms: Option<u64>, tags: Vec<String>) {
        let is_overwrite = self.entries.contains_key(&key);

        // Overwrites reuse the existing slot and never trigger eviction.
        if !is_overwrite && self.entries.len() >= self.capacity {
            self.evict_one();
        }

        let approx_size_bytes = serde_json::to_vec(&value).map(|b| b.len()).unwrap_or(0);
        let compressible = approx_size_bytes >= self.compression_threshold_bytes;
        let effective_ttl = ttl_ms.unwrap_or(self.default_ttl_ms);

        let entry = CacheEntry::new(
            value,
            effective_ttl,
            tags.into_iter().collect(),
            approx_size_bytes,
            compressible,
        );
        self.entries.insert(key, entry);
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Returns the value and records a hit if the entry exists and has not
    /// expired. An expired entry is removed here and reported as a miss,
    /// indistinguishable from a key that was never cached. This is the sole
    /// place lazy expiry is enforced.
    pub fn get(&mut self, key: &str) -> Option<V> {
        let outcome = match self.entries.get_mut(key) {
            None => ReadOutcome::Missing,
            Some(entry) if entry.is_expired() => ReadOutcome::Expired,
            Some(entry) => {
                entry.record_hit();
                ReadOutcome::Hit(entry.value.clone())
            }
        };

        match outcome {
            ReadOutcome::Hit(value) => {
                self.stats.record_hit();
                Some(value)
            }
            ReadOutcome::Expired => {
                self.entries.remove(key);
                self.stats.record_expired(1);
                self.stats.record_miss();
                None
            }
            ReadOutcome::Missing => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Invalidate ==
    /// Removes the entry at `key`; returns whether it was present.
    pub fn invalidate(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    // == Invalidate By Tag ==
    /// Removes every entry whose tag set contains `tag`.
    ///
    /// Linear scan over all entries; acceptable at the target capacities
    /// (hundreds to a few thousand). Returns the number removed.
    pub fn invalidate_by_tag(&mut self, tag: &str) -> usize {
        let matched: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.tags.contains(tag))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &matched {
            self.entries.remove(key);
        }

        if !matched.is_empty() {
            debug!(tag = %tag, removed = matched.len(), "tag invalidation");
        }
        matched.len()
    }

    // == Invalidate By Pattern ==
    /// Removes every entry whose key matches `pattern`. Same scan cost as
    /// tag invalidation. Returns the number removed.
    pub fn invalidate_by_pattern(&mut self, pattern: &Regex) -> usize {
        let matched: Vec<String> = self
            .entries
            .keys()
            .filter(|key| pattern.is_match(key))
            .cloned()
            .collect();

        for key in &matched {
            self.entries.remove(key);
        }

        if !matched.is_empty() {
            debug!(pattern = %pattern, removed = matched.len(), "pattern invalidation");
        }
        matched.len()
    }

    // == Clear ==
    /// Removes all entries and resets hit/miss counters to zero.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.stats.reset();
    }

    // == Cleanup Expired ==
    /// Removes every entry whose TTL has elapsed (the eager half of expiry,
    /// run on a fixed interval independent of request traffic).
    ///
    /// Returns the number of entries removed. Surviving entries keep their
    /// size, hit counts and tags untouched.
    pub fn cleanup(&mut self) -> usize {
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            self.entries.remove(key);
        }

        self.stats.record_expired(expired.len() as u64);
        expired.len()
    }

    // == Stats ==
    /// Returns a snapshot of current statistics, with the entry count and
    /// memory aggregates recomputed from the live entries.
    pub fn stats(&self) -> CacheStats {
        let total_size: usize = self
            .entries
            .values()
            .map(|entry| entry.approx_size_bytes)
            .sum();

        let mut stats = self.stats.clone();
        stats.set_size_aggregates(self.entries.len(), total_size);
        stats
    }

    // == Warm Cache ==
    /// Populates missing keys through an externally supplied loader.
    ///
    /// Keys that are already present (and unexpired) are skipped. A loader
    /// failure for one key is logged and skipped without aborting the rest
    /// of the batch. Returns how many keys were freshly populated.
    pub async fn warm_cache<F, Fut>(&mut self, keys: &[String], loader: F) -> usize
    where
        F: Fn(String) -> Fut,
        Fut: Future<Output = anyhow::Result<V>>,
    {
        let mut warmed = 0;

        for key in keys {
            let present = self
                .entries
                .get(key)
                .map(|entry| !entry.is_expired())
                .unwrap_or(false);
            if present {
                continue;
            }

            match loader(key.clone()).await {
                Ok(value) => {
                    self.set(key.clone(), value, None, Vec::new());
                    warmed += 1;
                }
                Err(err) => {
                    warn!(key = %key, error = %err, "cache warm loader failed, skipping key");
                }
            }
        }

        warmed
    }

    // == Length ==
    /// Returns the current number of entries (expired-but-unswept included).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // == Eviction ==
    /// Removes the single entry with the lowest combined recency/frequency
    /// score. Ties are broken arbitrarily by iteration order.
    fn evict_one(&mut self) {
        let victim = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.eviction_score())
            .map(|(key, _)| key.clone());

        if let Some(key) = victim {
            self.entries.remove(&key);
            self.stats.record_eviction();
            debug!(key = %key, "evicted lowest-scoring entry at capacity");
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use std::time::Duration;

    fn engine() -> CacheEngine<String> {
        CacheEngine::new(100, 300_000, 1024)
    }

    #[test]
    fn test_set_and_get() {
        let mut cache = engine();

        cache.set("key1".to_string(), "value1".to_string(), None, Vec::new());

        assert_eq!(cache.get("key1"), Some("value1".to_string()));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_get_missing_counts_miss() {
        let mut cache = engine();

        assert_eq!(cache.get("nope"), None);
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn test_overwrite_replaces_value() {
        let mut cache = engine();

        cache.set("key1".to_string(), "v1".to_string(), None, Vec::new());
        cache.set("key1".to_string(), "v2".to_string(), None, Vec::new());

        assert_eq!(cache.get("key1"), Some("v2".to_string()));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_lazy_expiry_on_get() {
        let mut cache = engine();

        cache.set("key1".to_string(), "v".to_string(), Some(50), Vec::new());
        assert!(cache.get("key1").is_some());

        sleep(Duration::from_millis(60));

        assert_eq!(cache.get("key1"), None);
        // The expired entry was deleted, not just hidden.
        assert_eq!(cache.len(), 0);
        assert_eq!(cache.stats().misses, 1);
        assert_eq!(cache.stats().expired_removals, 1);
    }

    #[test]
    fn test_invalidate_reports_presence() {
        let mut cache = engine();

        cache.set("key1".to_string(), "v".to_string(), None, Vec::new());

        assert!(cache.invalidate("key1"));
        assert!(!cache.invalidate("key1"));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_invalidate_by_tag() {
        let mut cache = engine();

        cache.set(
            "review:1".to_string(),
            "a".to_string(),
            None,
            vec!["reviews".to_string()],
        );
        cache.set(
            "review:2".to_string(),
            "b".to_string(),
            None,
            vec!["reviews".to_string(), "featured".to_string()],
        );
        cache.set("page:home".to_string(), "c".to_string(), None, vec!["pages".to_string()]);

        assert_eq!(cache.invalidate_by_tag("reviews"), 2);
        assert_eq!(cache.len(), 1);
        assert!(cache.get("page:home").is_some());
    }

    #[test]
    fn test_invalidate_by_unknown_tag_is_noop() {
        let mut cache = engine();

        cache.set("a".to_string(), "v".to_string(), None, vec!["t".to_string()]);

        assert_eq!(cache.invalidate_by_tag("other"), 0);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_invalidate_by_pattern() {
        let mut cache = engine();

        cache.set("user:1:profile".to_string(), "a".to_string(), None, Vec::new());
        cache.set("user:2:profile".to_string(), "b".to_string(), None, Vec::new());
        cache.set("content:home".to_string(), "c".to_string(), None, Vec::new());

        let pattern = Regex::new(r"^user:\d+:").unwrap();
        assert_eq!(cache.invalidate_by_pattern(&pattern), 2);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_clear_resets_counters() {
        let mut cache = engine();

        cache.set("a".to_string(), "v".to_string(), None, Vec::new());
        cache.get("a");
        cache.get("missing");
        cache.clear();

        assert!(cache.is_empty());
        let stats = cache.stats();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
    }

    #[test]
    fn test_cleanup_removes_only_expired() {
        let mut cache = engine();

        cache.set("short".to_string(), "a".to_string(), Some(50), Vec::new());
        cache.set(
            "long".to_string(),
            "b".to_string(),
            Some(60_000),
            vec!["keep".to_string()],
        );

        sleep(Duration::from_millis(60));

        assert_eq!(cache.cleanup(), 1);
        assert_eq!(cache.len(), 1);
        assert!(cache.get("long").is_some());
        // Survivor keeps its tags.
        assert_eq!(cache.invalidate_by_tag("keep"), 1);
    }

    #[test]
    fn test_eviction_at_capacity() {
        let mut cache: CacheEngine<String> = CacheEngine::new(3, 300_000, 1024);

        cache.set("a".to_string(), "1".to_string(), None, Vec::new());
        cache.set("b".to_string(), "2".to_string(), None, Vec::new());
        cache.set("c".to_string(), "3".to_string(), None, Vec::new());

        // Touch b and c so a has the oldest access and fewest hits.
        sleep(Duration::from_millis(5));
        cache.get("b");
        cache.get("c");

        cache.set("d".to_string(), "4".to_string(), None, Vec::new());

        assert_eq!(cache.len(), 3);
        assert_eq!(cache.get("a"), None);
        assert!(cache.get("b").is_some());
        assert!(cache.get("c").is_some());
        assert!(cache.get("d").is_some());
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn test_overwrite_at_capacity_does_not_evict() {
        let mut cache: CacheEngine<String> = CacheEngine::new(2, 300_000, 1024);

        cache.set("a".to_string(), "1".to_string(), None, Vec::new());
        cache.set("b".to_string(), "2".to_string(), None, Vec::new());
        cache.set("a".to_string(), "1b".to_string(), None, Vec::new());

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.stats().evictions, 0);
        assert!(cache.get("b").is_some());
    }

    #[test]
    fn test_stats_aggregates() {
        let mut cache = engine();

        cache.set("a".to_string(), "xxxx".to_string(), None, Vec::new());
        cache.get("a");
        cache.get("missing");

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.entry_count, 1);
        // "xxxx" serializes to "\"xxxx\"" (6 bytes)
        assert_eq!(stats.total_size_bytes, 6);
        assert_eq!(stats.avg_entry_size_bytes, 6);
        assert!((stats.hit_rate() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_compressible_flag_from_threshold() {
        let mut cache: CacheEngine<String> = CacheEngine::new(10, 300_000, 16);

        cache.set("small".to_string(), "tiny".to_string(), None, Vec::new());
        cache.set("large".to_string(), "x".repeat(64), None, Vec::new());

        let small_size = cache.stats();
        assert_eq!(small_size.entry_count, 2);
        // Flag inspection goes through the stored entries directly.
        assert!(!cache.entries["small"].compressible);
        assert!(cache.entries["large"].compressible);
    }

    #[tokio::test]
    async fn test_warm_cache_populates_missing_keys() {
        let mut cache = engine();
        cache.set("have".to_string(), "existing".to_string(), None, Vec::new());

        let keys = vec!["have".to_string(), "need1".to_string(), "need2".to_string()];
        let warmed = cache
            .warm_cache(&keys, |key| async move { Ok(format!("loaded:{key}")) })
            .await;

        assert_eq!(warmed, 2);
        assert_eq!(cache.get("have"), Some("existing".to_string()));
        assert_eq!(cache.get("need1"), Some("loaded:need1".to_string()));
    }

    #[tokio::test]
    async fn test_warm_cache_swallows_loader_failures() {
        let mut cache = engine();

        let keys = vec!["ok".to_string(), "bad".to_string(), "ok2".to_string()];
        let warmed = cache
            .warm_cache(&keys, |key| async move {
                if key == "bad" {
                    anyhow::bail!("loader exploded");
                }
                Ok(format!("loaded:{key}"))
            })
            .await;

        assert_eq!(warmed, 2);
        assert_eq!(cache.get("bad"), None);
        assert!(cache.get("ok").is_some());
        assert!(cache.get("ok2").is_some());
    }
}
