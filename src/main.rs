//! Palisade - in-process request shielding service
//!
//! Runs the diagnostics/admin HTTP surface over an explicitly constructed
//! shield context, with a background sweep whose lifecycle is tied to the
//! process.

use std::net::SocketAddr;

use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use palisade::api::{create_router, AppState};
use palisade::config::Config;
use palisade::context::ShieldContext;
use palisade::tasks::spawn_sweep_task;

/// Main entry point for the shield service.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Build the shield context (caches, limiter, advisor)
/// 4. Start the background sweep task
/// 5. Create the Axum router with all endpoints
/// 6. Start the HTTP server on the configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() {
    // Initialize tracing subscriber with env filter
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "palisade=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Palisade shield service");

    let config = Config::from_env();
    info!(
        "Configuration loaded: caches={}/{}/{}, default_ttl={}ms, sweep_interval={}s, port={}",
        config.api_cache_capacity,
        config.content_cache_capacity,
        config.user_cache_capacity,
        config.default_ttl_ms,
        config.sweep_interval_secs,
        config.server_port
    );

    let context = ShieldContext::from_config(&config);
    info!("Shield context initialized");

    let sweep_handle = spawn_sweep_task(context.clone(), config.sweep_interval_secs);
    info!("Background sweep task started");

    let app = create_router(AppState::new(context));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    info!("Server listening on http://{}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal(sweep_handle))
    .await
    .unwrap();

    info!("Server shutdown complete");
}

/// Waits for a shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown, aborts the sweep task so the timer is released before the
/// process exits.
async fn shutdown_signal(sweep_handle: tokio::task::JoinHandle<()>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    sweep_handle.abort();
    warn!("Sweep task aborted");
}
