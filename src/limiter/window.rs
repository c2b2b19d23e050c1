//! Rate Window Module
//!
//! The per-key counter record used by the fixed-window limiter.

use serde::Serialize;

use crate::cache::current_timestamp_ms;

// == Rate Window ==
/// Request counter for one key within one fixed window.
///
/// The counter is only ever incremented while `now < window_reset_at`; once
/// the reset time passes the window is replaced wholesale, never decayed.
#[derive(Debug, Clone, Serialize)]
pub struct RateWindow {
    /// Requests observed in the current window
    pub count: u32,
    /// Timestamp when the window closes and the count resets (Unix ms)
    pub window_reset_at: u64,
    /// Timestamp the window opened (diagnostic only, Unix ms)
    pub window_started_at: u64,
}

impl RateWindow {
    // == Constructor ==
    /// Opens a fresh window counting its first request.
    pub fn open(window_ms: u64) -> Self {
        let now = current_timestamp_ms();
        Self {
            count: 1,
            window_reset_at: now.saturating_add(window_ms),
            window_started_at: now,
        }
    }

    // == Is Expired ==
    /// True once the window's reset time has passed.
    pub fn is_expired(&self) -> bool {
        current_timestamp_ms() >= self.window_reset_at
    }
}
