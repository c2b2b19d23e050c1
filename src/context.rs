//! Shield Context Module
//!
//! Explicitly constructed cache/limiter/advisor instances owned by one
//! context object that request handlers receive by injection. Nothing here
//! is a module-level singleton; the process entry point builds the context,
//! starts the sweep, and tears both down on shutdown.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;

use crate::cache::CacheEngine;
use crate::compress::CompressionAdvisor;
use crate::config::Config;
use crate::limiter::FixedWindowLimiter;

/// A shared, independently tuned cache instance storing opaque JSON values.
pub type SharedCache = Arc<RwLock<CacheEngine<Value>>>;

/// Removal counts from one background sweep pass.
#[derive(Debug, Default)]
pub struct SweepSummary {
    /// Expired cache entries removed across all cache instances
    pub cache_entries: usize,
    /// Expired rate windows removed
    pub rate_windows: usize,
    /// Expired compression artifacts removed
    pub artifacts: usize,
}

impl SweepSummary {
    /// Total removals in the pass.
    pub fn total(&self) -> usize {
        self.cache_entries + self.rate_windows + self.artifacts
    }
}

// == Shield Context ==
/// The request-shielding core: three cache instances (API responses,
/// content, per-user data), one rate limiter, one compression advisor.
///
/// Each component owns its internal map exclusively behind its own lock;
/// no component reaches into another's state.
#[derive(Clone)]
pub struct ShieldContext {
    /// Cache tuned for API responses
    pub api_cache: SharedCache,
    /// Cache tuned for rendered/published content
    pub content_cache: SharedCache,
    /// Cache tuned for per-user data
    pub user_cache: SharedCache,
    /// Fixed-window rate limiter
    pub limiter: Arc<RwLock<FixedWindowLimiter>>,
    /// Response-compression advisor with its own artifact cache
    pub compression: Arc<RwLock<CompressionAdvisor>>,
    /// The configuration the context was built from
    pub config: Config,
}

impl ShieldContext {
    // == Constructor ==
    /// Builds all components from configuration.
    pub fn from_config(config: &Config) -> Self {
        let new_cache = |capacity: usize| {
            Arc::new(RwLock::new(CacheEngine::new(
                capacity,
                config.default_ttl_ms,
                config.compression_threshold_bytes,
            )))
        };

        Self {
            api_cache: new_cache(config.api_cache_capacity),
            content_cache: new_cache(config.content_cache_capacity),
            user_cache: new_cache(config.user_cache_capacity),
            limiter: Arc::new(RwLock::new(FixedWindowLimiter::new())),
            compression: Arc::new(RwLock::new(CompressionAdvisor::new(config.artifact_ttl_ms))),
            config: config.clone(),
        }
    }

    // == Cache Lookup ==
    /// Resolves a cache instance by its public name.
    pub fn cache_by_name(&self, name: &str) -> Option<&SharedCache> {
        match name {
            "api" => Some(&self.api_cache),
            "content" => Some(&self.content_cache),
            "user" => Some(&self.user_cache),
            _ => None,
        }
    }

    /// All cache instances with their public names.
    pub fn caches(&self) -> [(&'static str, &SharedCache); 3] {
        [
            ("api", &self.api_cache),
            ("content", &self.content_cache),
            ("user", &self.user_cache),
        ]
    }

    // == Sweep ==
    /// One eager-expiry pass over every component. Driven by the background
    /// sweep task, never by request traffic.
    pub async fn sweep_once(&self) -> SweepSummary {
        let mut summary = SweepSummary::default();

        for (_, cache) in self.caches() {
            summary.cache_entries += cache.write().await.cleanup();
        }
        summary.rate_windows = self.limiter.write().await.cleanup();
        summary.artifacts = self.compression.write().await.cleanup();

        summary
    }

    // == Clear All ==
    /// Administrative flush: every cache, every rate window, every artifact.
    pub async fn clear_all(&self) {
        for (_, cache) in self.caches() {
            cache.write().await.clear();
        }
        self.limiter.write().await.clear_all();
        self.compression.write().await.clear();
    }
}
