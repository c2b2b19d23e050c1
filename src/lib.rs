//! Palisade - in-process request shielding
//!
//! A TTL cache with tag invalidation and approximate-LRU eviction, a
//! fixed-window rate limiter, and a response-compression advisor, plus the
//! diagnostics/admin HTTP surface that operates them.

pub mod api;
pub mod cache;
pub mod compress;
pub mod config;
pub mod context;
pub mod error;
pub mod limiter;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::{CacheEngine, CacheStats};
pub use compress::{CompressOptions, CompressionAdvisor};
pub use config::Config;
pub use context::ShieldContext;
pub use limiter::{FixedWindowLimiter, RateLimitOutcome};
pub use tasks::spawn_sweep_task;
