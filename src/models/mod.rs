//! Models Module
//!
//! Request and response DTOs for the diagnostics/admin HTTP API.

mod requests;
mod responses;

pub use requests::InvalidateRequest;
pub use responses::{
    CacheStatsBody, ErrorResponse, FlushResponse, HealthResponse, InvalidateResponse,
    LimitClearResponse, LimitStatusResponse, StatsResponse,
};
