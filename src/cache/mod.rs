//! Cache Module
//!
//! In-memory TTL caching with tag invalidation and approximate-LRU eviction.

mod engine;
mod entry;
mod stats;


// Re-export public types
pub use engine::CacheEngine;
pub use entry::{current_timestamp_ms, CacheEntry, HIT_RECENCY_BONUS_MS};
pub use stats::CacheStats;
