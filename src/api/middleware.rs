//! API Middleware
//!
//! The shield applied to its own HTTP surface: per-client fixed-window rate
//! limiting ahead of the handlers, and advisor-driven response compression
//! behind them.

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{header, HeaderValue, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::net::SocketAddr;

use crate::cache::current_timestamp_ms;
use crate::compress::CompressOptions;
use crate::error::ShieldError;

use super::handlers::AppState;

// == Rate Limit Middleware ==
/// Caps request volume per client IP and path before any handler work runs.
/// Rejections become 429 responses with a Retry-After hint.
pub async fn shield_rate_limit(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let key = format!("{}:{}", client_key(&request), request.uri().path());

    let outcome = state.shield.limiter.write().await.rate_limit(
        &key,
        state.shield.config.rate_limit,
        state.shield.config.rate_window_ms,
    );

    if !outcome.success {
        let retry_after_secs = outcome
            .reset_at
            .saturating_sub(current_timestamp_ms())
            .div_ceil(1000)
            .max(1);
        return ShieldError::RateLimited { retry_after_secs }.into_response();
    }

    next.run(request).await
}

// == Compression Middleware ==
/// Replaces large compressible response bodies with a compressed form when
/// the client accepts one. Every failure path sends the original body.
pub async fn shield_compression(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let accept_encoding = request
        .headers()
        .get(header::ACCEPT_ENCODING)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    let response = next.run(request).await;

    let Some(accept_encoding) = accept_encoding else {
        return response;
    };
    if !response.status().is_success() {
        return response;
    }
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok());
    if !is_compressible(content_type) {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(err) => {
            return ShieldError::Internal(format!("Body buffering failed: {err}")).into_response()
        }
    };

    let options = CompressOptions {
        threshold: state.shield.config.compression_threshold_bytes,
        level: state.shield.config.compression_level,
    };
    let artifact = state
        .shield
        .compression
        .write()
        .await
        .compress(&bytes, Some(&accept_encoding), &options);

    match artifact {
        Some(artifact) => {
            parts.headers.insert(
                header::CONTENT_ENCODING,
                HeaderValue::from_static(artifact.encoding.as_str()),
            );
            parts.headers.remove(header::CONTENT_LENGTH);
            Response::from_parts(parts, Body::from(artifact.bytes))
        }
        None => Response::from_parts(parts, Body::from(bytes)),
    }
}

// == Helpers ==
/// Client identity for rate-limit keys: forwarded address first, then the
/// peer address, then a local fallback for in-process test calls.
fn client_key(request: &Request<Body>) -> String {
    if let Some(forwarded) = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
    {
        return forwarded.trim().to_string();
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "local".to_string())
}

/// Content types worth compressing: text plus the structured formats the
/// dashboards serve.
fn is_compressible(content_type: Option<&str>) -> bool {
    match content_type {
        Some(ct) => {
            let ct = ct.to_ascii_lowercase();
            ct.starts_with("text/")
                || ct.contains("application/json")
                || ct.contains("application/javascript")
                || ct.contains("application/xml")
                || ct.contains("image/svg+xml")
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_compressible() {
        assert!(is_compressible(Some("application/json")));
        assert!(is_compressible(Some("text/html; charset=utf-8")));
        assert!(is_compressible(Some("Application/JSON")));
        assert!(!is_compressible(Some("image/png")));
        assert!(!is_compressible(None));
    }

    #[test]
    fn test_client_key_prefers_forwarded_header() {
        let request = Request::builder()
            .uri("/stats")
            .header("x-forwarded-for", "203.0.113.9, 10.0.0.1")
            .body(Body::empty())
            .unwrap();

        assert_eq!(client_key(&request), "203.0.113.9");
    }

    #[test]
    fn test_client_key_falls_back_to_local() {
        let request = Request::builder().uri("/stats").body(Body::empty()).unwrap();
        assert_eq!(client_key(&request), "local");
    }
}
