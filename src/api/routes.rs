//! API Routes
//!
//! Configures the Axum router for the diagnostics/admin surface.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    flush_handler, health_handler, invalidate_handler, limit_clear_handler, limit_status_handler,
    stats_handler, AppState,
};
use super::middleware::{shield_compression, shield_rate_limit};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /health` - Health check (exempt from shielding)
/// - `GET /stats` - Aggregated statistics for all shield components
/// - `POST /admin/flush` - Clear all shield state
/// - `POST /admin/invalidate` - Targeted invalidation by key/tag/pattern
/// - `GET /admin/limit/:key` - Rate-window snapshot for one key
/// - `DELETE /admin/limit/:key` - Administrative rate-window reset
///
/// # Middleware
/// - Rate limiting per client IP and path (429 on rejection)
/// - Response compression through the advisor
/// - CORS: allows any origin (configurable for production)
/// - Tracing: logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Layers run outside-in: the rate limiter sees a request before the
    // compression layer or any handler does.
    let shielded = Router::new()
        .route("/stats", get(stats_handler))
        .route("/admin/flush", post(flush_handler))
        .route("/admin/invalidate", post(invalidate_handler))
        .route(
            "/admin/limit/:key",
            get(limit_status_handler).delete(limit_clear_handler),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            shield_compression,
        ))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            shield_rate_limit,
        ));

    Router::new()
        .route("/health", get(health_handler))
        .merge(shielded)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
