//! Cache Statistics Module
//!
//! Tracks cache performance metrics: hits, misses, evictions, expiry
//! removals, and estimated memory usage.

use serde::Serialize;

// == Cache Stats ==
/// Snapshot of cache performance metrics.
///
/// The counters are cumulative since construction (or the last `clear`);
/// the size and memory fields describe the live entries at snapshot time.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Number of successful cache retrievals
    pub hits: u64,
    /// Number of failed cache retrievals (key not found or expired)
    pub misses: u64,
    /// Number of entries evicted to make room at capacity
    pub evictions: u64,
    /// Number of entries removed because their TTL elapsed
    pub expired_removals: u64,
    /// Current number of live entries
    pub entry_count: usize,
    /// Configured maximum number of entries
    pub capacity: usize,
    /// Sum of the live entries' serialized size estimates, in bytes
    pub total_size_bytes: usize,
    /// Average serialized size estimate per live entry, in bytes
    pub avg_entry_size_bytes: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates stats with all counters at zero for the given capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no reads have happened.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    // == Record Hit ==
    /// Increments the hit counter.
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    // == Record Miss ==
    /// Increments the miss counter.
    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    // == Record Eviction ==
    /// Increments the eviction counter.
    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    // == Record Expiry ==
    /// Adds to the expired-removal counter.
    pub fn record_expired(&mut self, count: u64) {
        self.expired_removals += count;
    }

    // == Reset ==
    /// Zeroes all cumulative counters, keeping the configured capacity.
    pub fn reset(&mut self) {
        *self = Self::new(self.capacity);
    }

    // == Update Size Aggregates ==
    /// Updates entry count and memory aggregates from a live scan.
    pub fn set_size_aggregates(&mut self, entry_count: usize, total_size_bytes: usize) {
        self.entry_count = entry_count;
        self.total_size_bytes = total_size_bytes;
        self.avg_entry_size_bytes = if entry_count == 0 {
            0
        } else {
            total_size_bytes / entry_count
        };
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        let stats = CacheStats::new(500);
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
        assert_eq!(stats.evictions, 0);
        assert_eq!(stats.expired_removals, 0);
        assert_eq!(stats.capacity, 500);
        assert_eq!(stats.entry_count, 0);
    }

    #[test]
    fn test_hit_rate_no_requests() {
        let stats = CacheStats::new(10);
        assert_eq!(stats.hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate_all_hits() {
        let mut stats = CacheStats::new(10);
        stats.record_hit();
        stats.record_hit();
        assert_eq!(stats.hit_rate(), 1.0);
    }

    #[test]
    fn test_hit_rate_mixed() {
        let mut stats = CacheStats::new(10);
        stats.record_hit();
        stats.record_miss();
        assert_eq!(stats.hit_rate(), 0.5);
    }

    #[test]
    fn test_size_aggregates() {
        let mut stats = CacheStats::new(10);
        stats.set_size_aggregates(4, 1000);
        assert_eq!(stats.entry_count, 4);
        assert_eq!(stats.total_size_bytes, 1000);
        assert_eq!(stats.avg_entry_size_bytes, 250);
    }

    #[test]
    fn test_size_aggregates_empty() {
        let mut stats = CacheStats::new(10);
        stats.set_size_aggregates(0, 0);
        assert_eq!(stats.avg_entry_size_bytes, 0);
    }

    #[test]
    fn test_reset_keeps_capacity() {
        let mut stats = CacheStats::new(42);
        stats.record_hit();
        stats.record_miss();
        stats.record_eviction();
        stats.reset();

        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
        assert_eq!(stats.evictions, 0);
        assert_eq!(stats.capacity, 42);
    }
}
