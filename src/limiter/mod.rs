//! Rate Limiter Module
//!
//! Fixed-window request limiting keyed by arbitrary strings, independent of
//! the TTL cache.

mod fixed_window;
mod window;

// Re-export public types
pub use fixed_window::{FixedWindowLimiter, LimiterStats, RateLimitOutcome};
pub use window::RateWindow;
