//! API Module
//!
//! HTTP handlers, middleware and routing for the diagnostics/admin surface.
//!
//! # Endpoints
//! - `GET /health` - Health check
//! - `GET /stats` - Aggregated shield statistics
//! - `POST /admin/flush` - Clear all shield state
//! - `POST /admin/invalidate` - Targeted cache invalidation
//! - `GET /admin/limit/:key` - Rate-window snapshot
//! - `DELETE /admin/limit/:key` - Rate-window reset

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use handlers::AppState;
pub use routes::create_router;
