//! IdleReaper - periodic idle eviction.
//!
//! Ticks for the lifetime of the service and asks the manager to evict on
//! each tick, so eviction is eventual: the model can stay loaded up to one
//! tick interval past the idle threshold. Eviction failures are logged and
//! left for the next tick; the loop itself never dies.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::warn;

use crate::manager::ModelManager;

pub async fn run(
    manager: Arc<ModelManager>,
    idle_threshold: Duration,
    tick_interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(tick_interval);
    // the first tick fires immediately; harmless, eviction is a no-op then
    loop {
        tokio::select! {
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
            _ = ticker.tick() => {
                if let Err(err) = manager.evict_if_idle(idle_threshold).await {
                    warn!(error = %err, "idle eviction failed, keeping model loaded");
                }
            }
        }
    }
}
