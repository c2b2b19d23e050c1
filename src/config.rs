//! Configuration Module
//!
//! Loads shield configuration from environment variables with defaults.

use std::env;

use crate::compress::{DEFAULT_COMPRESSION_LEVEL, DEFAULT_COMPRESSION_THRESHOLD};

/// Shield configuration parameters.
///
/// All values can be configured via environment variables with sensible
/// defaults tuned for a few thousand cacheable responses.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum entries for the API-response cache
    pub api_cache_capacity: usize,
    /// Maximum entries for the content cache
    pub content_cache_capacity: usize,
    /// Maximum entries for the per-user cache
    pub user_cache_capacity: usize,
    /// Default TTL in milliseconds for entries stored without one
    pub default_ttl_ms: u64,
    /// Minimum payload size considered for compression, in bytes
    pub compression_threshold_bytes: usize,
    /// flate2 compression level
    pub compression_level: u32,
    /// Lifetime of cached compression artifacts, in milliseconds
    pub artifact_ttl_ms: u64,
    /// Default per-key request limit for the diagnostics/admin surface
    pub rate_limit: u32,
    /// Default limiter window, in milliseconds
    pub rate_window_ms: u64,
    /// Background sweep interval, in seconds
    pub sweep_interval_secs: u64,
    /// HTTP server port for the diagnostics/admin surface
    pub server_port: u16,
}

fn env_parsed<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `API_CACHE_CAPACITY` - API-response cache entries (default: 500)
    /// - `CONTENT_CACHE_CAPACITY` - Content cache entries (default: 1000)
    /// - `USER_CACHE_CAPACITY` - Per-user cache entries (default: 2000)
    /// - `DEFAULT_TTL_MS` - Default cache TTL in ms (default: 300000)
    /// - `COMPRESSION_THRESHOLD_BYTES` - Compression floor (default: 1024)
    /// - `COMPRESSION_LEVEL` - flate2 level (default: 6)
    /// - `ARTIFACT_TTL_MS` - Artifact lifetime in ms (default: 600000)
    /// - `RATE_LIMIT` - Requests per window per client (default: 120)
    /// - `RATE_WINDOW_MS` - Limiter window in ms (default: 60000)
    /// - `SWEEP_INTERVAL_SECS` - Sweep frequency in seconds (default: 60)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    pub fn from_env() -> Self {
        Self {
            api_cache_capacity: env_parsed("API_CACHE_CAPACITY", 500),
            content_cache_capacity: env_parsed("CONTENT_CACHE_CAPACITY", 1000),
            user_cache_capacity: env_parsed("USER_CACHE_CAPACITY", 2000),
            default_ttl_ms: env_parsed("DEFAULT_TTL_MS", 300_000),
            compression_threshold_bytes: env_parsed(
                "COMPRESSION_THRESHOLD_BYTES",
                DEFAULT_COMPRESSION_THRESHOLD,
            ),
            compression_level: env_parsed("COMPRESSION_LEVEL", DEFAULT_COMPRESSION_LEVEL),
            artifact_ttl_ms: env_parsed("ARTIFACT_TTL_MS", 600_000),
            rate_limit: env_parsed("RATE_LIMIT", 120),
            rate_window_ms: env_parsed("RATE_WINDOW_MS", 60_000),
            sweep_interval_secs: env_parsed("SWEEP_INTERVAL_SECS", 60),
            server_port: env_parsed("SERVER_PORT", 3000),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_cache_capacity: 500,
            content_cache_capacity: 1000,
            user_cache_capacity: 2000,
            default_ttl_ms: 300_000,
            compression_threshold_bytes: DEFAULT_COMPRESSION_THRESHOLD,
            compression_level: DEFAULT_COMPRESSION_LEVEL,
            artifact_ttl_ms: 600_000,
            rate_limit: 120,
            rate_window_ms: 60_000,
            sweep_interval_secs: 60,
            server_port: 3000,
        }
    }
}
