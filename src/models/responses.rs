//! Response DTOs for the diagnostics/admin API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::CacheStats;
use crate::compress::CompressionStats;
use crate::limiter::{LimiterStats, RateWindow};

/// Per-cache block of the stats response.
#[derive(Debug, Clone, Serialize)]
pub struct CacheStatsBody {
    /// Cache instance name ("api", "content", "user")
    pub name: String,
    /// Engine counters and size aggregates
    #[serde(flatten)]
    pub stats: CacheStats,
    /// hits / (hits + misses), 0 with no traffic
    pub hit_rate: f64,
}

impl CacheStatsBody {
    /// Wraps an engine snapshot for one named instance.
    pub fn new(name: impl Into<String>, stats: CacheStats) -> Self {
        let hit_rate = stats.hit_rate();
        Self {
            name: name.into(),
            stats,
            hit_rate,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// One block per cache instance
    pub caches: Vec<CacheStatsBody>,
    /// Rate limiter diagnostics
    pub limiter: LimiterStats,
    /// Compression advisor diagnostics
    pub compression: CompressionStats,
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with the current timestamp.
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Response body for the admin flush (POST /admin/flush)
#[derive(Debug, Clone, Serialize)]
pub struct FlushResponse {
    /// Confirmation message
    pub message: String,
    /// Names of the flushed cache instances
    pub caches: Vec<String>,
}

impl FlushResponse {
    /// Confirmation for a completed flush.
    pub fn new(caches: Vec<String>) -> Self {
        Self {
            message: "All shield state cleared".to_string(),
            caches,
        }
    }
}

/// Response body for targeted invalidation (POST /admin/invalidate)
#[derive(Debug, Clone, Serialize)]
pub struct InvalidateResponse {
    /// Cache instance that was acted on
    pub cache: String,
    /// Number of entries removed
    pub removed: usize,
}

/// Response body for the rate-window status (GET /admin/limit/{key})
#[derive(Debug, Clone, Serialize)]
pub struct LimitStatusResponse {
    /// The inspected key
    pub key: String,
    /// The live window
    #[serde(flatten)]
    pub window: RateWindow,
}

/// Response body for an administrative window reset
/// (DELETE /admin/limit/{key})
#[derive(Debug, Clone, Serialize)]
pub struct LimitClearResponse {
    /// Confirmation message
    pub message: String,
    /// The cleared key
    pub key: String,
}

impl LimitClearResponse {
    /// Confirmation for a cleared window.
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Rate window for '{}' cleared", key),
            key,
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}
