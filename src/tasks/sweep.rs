//! Background Sweep Task
//!
//! Timer-driven eager expiry for every shield component. Request traffic
//! only ever triggers lazy expiry; this task bounds memory for keys nobody
//! reads again.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::context::ShieldContext;

/// Spawns the background task that periodically sweeps expired cache
/// entries, rate windows and compression artifacts.
///
/// The task loops forever, sleeping for the configured interval between
/// passes. The returned handle must be aborted on graceful shutdown so the
/// timer is not leaked.
///
/// # Arguments
/// * `context` - The shield context whose components are swept
/// * `interval_secs` - Seconds between sweep passes
pub fn spawn_sweep_task(context: ShieldContext, interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(interval_secs);

    tokio::spawn(async move {
        info!("starting shield sweep task, interval {interval_secs}s");

        loop {
            tokio::time::sleep(interval).await;

            let summary = context.sweep_once().await;

            if summary.total() > 0 {
                info!(
                    cache_entries = summary.cache_entries,
                    rate_windows = summary.rate_windows,
                    artifacts = summary.artifacts,
                    "sweep removed expired state"
                );
            } else {
                debug!("sweep found nothing expired");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use serde_json::json;

    #[tokio::test]
    async fn test_sweep_task_removes_expired_entries() {
        let ctx = ShieldContext::from_config(&Config::default());

        ctx.api_cache
            .write()
            .await
            .set("soon".to_string(), json!(1), Some(100), Vec::new());

        let handle = spawn_sweep_task(ctx.clone(), 1);

        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert!(ctx.api_cache.read().await.is_empty());
        handle.abort();
    }

    #[tokio::test]
    async fn test_sweep_task_preserves_live_entries() {
        let ctx = ShieldContext::from_config(&Config::default());

        ctx.content_cache
            .write()
            .await
            .set("stay".to_string(), json!("v"), Some(60_000), Vec::new());

        let handle = spawn_sweep_task(ctx.clone(), 1);

        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert_eq!(
            ctx.content_cache.write().await.get("stay"),
            Some(json!("v"))
        );
        handle.abort();
    }

    #[tokio::test]
    async fn test_sweep_task_can_be_aborted() {
        let ctx = ShieldContext::from_config(&Config::default());

        let handle = spawn_sweep_task(ctx, 1);
        handle.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished());
    }
}
