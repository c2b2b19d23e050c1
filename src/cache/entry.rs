//! Cache Entry Module
//!
//! Defines the per-entry record stored by the cache engine, including TTL
//! bookkeeping and the access metadata the eviction score is computed from.

use std::collections::HashSet;
use std::time::{SystemTime, UNIX_EPOCH};

/// Recency credit granted per recorded hit when scoring eviction candidates.
///
/// One hit counts as one second of recency, so a frequently read entry can
/// outlive a slightly fresher entry that was read once.
pub const HIT_RECENCY_BONUS_MS: u64 = 1000;

// == Cache Entry ==
/// A single cache entry with value, expiry and access metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value (opaque to the engine)
    pub value: V,
    /// Insertion/overwrite timestamp (Unix milliseconds)
    pub stored_at: u64,
    /// Lifetime in milliseconds after `stored_at`
    pub ttl_ms: u64,
    /// Number of successful reads since insertion
    pub hit_count: u64,
    /// Timestamp of the most recent successful read (Unix milliseconds)
    pub last_accessed_at: u64,
    /// Invalidation tags; the entry is removed when any of them is invalidated
    pub tags: HashSet<String>,
    /// Serialized size estimate, used for statistics only
    pub approx_size_bytes: usize,
    /// Whether the entry was large enough to be considered for compression
    pub compressible: bool,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new entry stamped with the current time.
    ///
    /// # Arguments
    /// * `value` - The value to store
    /// * `ttl_ms` - Lifetime in milliseconds
    /// * `tags` - Invalidation tags
    /// * `approx_size_bytes` - Serialized size estimate
    /// * `compressible` - Whether the entry crossed the compression threshold
    pub fn new(
        value: V,
        ttl_ms: u64,
        tags: HashSet<String>,
        approx_size_bytes: usize,
        compressible: bool,
    ) -> Self {
        let now = current_timestamp_ms();
        Self {
            value,
            stored_at: now,
            ttl_ms,
            hit_count: 0,
            last_accessed_at: now,
            tags,
            approx_size_bytes,
            compressible,
        }
    }

    // == Is Expired ==
    /// Checks whether the entry's TTL has elapsed.
    ///
    /// Boundary condition: an entry is expired once the current time is
    /// greater than or equal to `stored_at + ttl_ms`, so a zero TTL expires
    /// on the very next read.
    pub fn is_expired(&self) -> bool {
        current_timestamp_ms().saturating_sub(self.stored_at) >= self.ttl_ms
    }

    // == Record Hit ==
    /// Updates access metadata after a successful read.
    pub fn record_hit(&mut self) {
        self.hit_count += 1;
        self.last_accessed_at = current_timestamp_ms();
    }

    // == Eviction Score ==
    /// Combined recency/frequency score; the minimum-scoring entry loses.
    ///
    /// Older last access and fewer hits both lower the score. This is an
    /// approximation of LRU-with-frequency, not a precise access order.
    pub fn eviction_score(&self) -> u64 {
        self.last_accessed_at
            .saturating_add(self.hit_count.saturating_mul(HIT_RECENCY_BONUS_MS))
    }

    // == Time To Live ==
    /// Returns remaining lifetime in milliseconds, or 0 if already expired.
    pub fn ttl_remaining_ms(&self) -> u64 {
        let deadline = self.stored_at.saturating_add(self.ttl_ms);
        deadline.saturating_sub(current_timestamp_ms())
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis() as u64
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use std::time::Duration;

    fn no_tags() -> HashSet<String> {
        HashSet::new()
    }

    #[test]
    fn test_entry_creation() {
        let entry = CacheEntry::new("payload".to_string(), 60_000, no_tags(), 7, false);

        assert_eq!(entry.value, "payload");
        assert_eq!(entry.hit_count, 0);
        assert_eq!(entry.last_accessed_at, entry.stored_at);
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_entry_expiration() {
        let entry = CacheEntry::new("payload".to_string(), 50, no_tags(), 7, false);

        assert!(!entry.is_expired());
        sleep(Duration::from_millis(60));
        assert!(entry.is_expired());
    }

    #[test]
    fn test_zero_ttl_is_immediately_expired() {
        let entry = CacheEntry::new("payload".to_string(), 0, no_tags(), 7, false);
        assert!(entry.is_expired());
    }

    #[test]
    fn test_record_hit_updates_metadata() {
        let mut entry = CacheEntry::new("payload".to_string(), 60_000, no_tags(), 7, false);
        let stored_at = entry.stored_at;

        sleep(Duration::from_millis(5));
        entry.record_hit();
        entry.record_hit();

        assert_eq!(entry.hit_count, 2);
        assert!(entry.last_accessed_at >= stored_at);
    }

    #[test]
    fn test_eviction_score_rewards_hits() {
        let mut hot = CacheEntry::new("a".to_string(), 60_000, no_tags(), 1, false);
        let cold = CacheEntry::new("b".to_string(), 60_000, no_tags(), 1, false);

        hot.record_hit();
        hot.record_hit();

        assert!(hot.eviction_score() > cold.eviction_score());
    }

    #[test]
    fn test_ttl_remaining_ms() {
        let entry = CacheEntry::new("payload".to_string(), 10_000, no_tags(), 7, false);
        let remaining = entry.ttl_remaining_ms();

        assert!(remaining <= 10_000);
        assert!(remaining >= 9_000);
    }

    #[test]
    fn test_ttl_remaining_expired_is_zero() {
        let entry = CacheEntry::new("payload".to_string(), 0, no_tags(), 7, false);
        assert_eq!(entry.ttl_remaining_ms(), 0);
    }

    #[test]
    fn test_tags_are_kept() {
        let tags: HashSet<String> = ["reviews".to_string(), "published".to_string()]
            .into_iter()
            .collect();
        let entry = CacheEntry::new("payload".to_string(), 60_000, tags, 7, false);

        assert!(entry.tags.contains("reviews"));
        assert!(entry.tags.contains("published"));
        assert_eq!(entry.tags.len(), 2);
    }
}
