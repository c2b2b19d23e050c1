//! API Handlers
//!
//! HTTP request handlers for the diagnostics and admin endpoints — the only
//! two surfaces the shield exposes to the rest of the system.

use axum::{
    extract::{Path, State},
    Json,
};
use regex::Regex;
use tracing::info;

use crate::context::ShieldContext;
use crate::error::{Result, ShieldError};
use crate::models::{
    CacheStatsBody, FlushResponse, HealthResponse, InvalidateRequest, InvalidateResponse,
    LimitClearResponse, LimitStatusResponse, StatsResponse,
};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The injected shield context
    pub shield: ShieldContext,
}

impl AppState {
    /// Creates a new AppState around an existing context.
    pub fn new(shield: ShieldContext) -> Self {
        Self { shield }
    }

    /// Creates a new AppState with a context built from configuration.
    pub fn from_config(config: &crate::config::Config) -> Self {
        Self::new(ShieldContext::from_config(config))
    }
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// Handler for GET /stats
///
/// Aggregates statistics from every shield component for the operator
/// diagnostics view.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let mut caches = Vec::with_capacity(3);
    for (name, cache) in state.shield.caches() {
        caches.push(CacheStatsBody::new(name, cache.read().await.stats()));
    }

    Json(StatsResponse {
        caches,
        limiter: state.shield.limiter.read().await.stats(),
        compression: state.shield.compression.read().await.stats(),
    })
}

/// Handler for POST /admin/flush
///
/// The "flush cache" admin action: drops every cache entry, rate window and
/// compression artifact.
pub async fn flush_handler(State(state): State<AppState>) -> Json<FlushResponse> {
    state.shield.clear_all().await;
    info!("admin flush: all shield state cleared");

    let names = state
        .shield
        .caches()
        .iter()
        .map(|(name, _)| name.to_string())
        .collect();
    Json(FlushResponse::new(names))
}

/// Handler for POST /admin/invalidate
///
/// Targeted invalidation of one cache instance by key, tag or key pattern.
pub async fn invalidate_handler(
    State(state): State<AppState>,
    Json(req): Json<InvalidateRequest>,
) -> Result<Json<InvalidateResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(ShieldError::InvalidRequest(error_msg));
    }

    let cache = state
        .shield
        .cache_by_name(&req.cache)
        .ok_or_else(|| ShieldError::UnknownCache(req.cache.clone()))?;

    let removed = if let Some(key) = &req.key {
        usize::from(cache.write().await.invalidate(key))
    } else if let Some(tag) = &req.tag {
        cache.write().await.invalidate_by_tag(tag)
    } else if let Some(pattern) = &req.pattern {
        let regex = Regex::new(pattern)
            .map_err(|err| ShieldError::InvalidRequest(format!("Invalid pattern: {err}")))?;
        cache.write().await.invalidate_by_pattern(&regex)
    } else {
        // validate() guarantees one selector; unreachable in practice
        return Err(ShieldError::InvalidRequest(
            "No selector provided".to_string(),
        ));
    };

    info!(cache = %req.cache, removed, "admin invalidation");
    Ok(Json(InvalidateResponse {
        cache: req.cache,
        removed,
    }))
}

/// Handler for GET /admin/limit/{key}
///
/// Read-only rate-window snapshot; 404 when no live window exists.
pub async fn limit_status_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<LimitStatusResponse>> {
    let window = state
        .shield
        .limiter
        .read()
        .await
        .status(&key)
        .ok_or_else(|| ShieldError::NotFound(key.clone()))?;

    Ok(Json(LimitStatusResponse { key, window }))
}

/// Handler for DELETE /admin/limit/{key}
///
/// Administrative reset of one client's rate window.
pub async fn limit_clear_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<LimitClearResponse>> {
    if !state.shield.limiter.write().await.clear(&key) {
        return Err(ShieldError::NotFound(key));
    }

    Ok(Json(LimitClearResponse::new(key)))
}
