use std::time::Duration;

use ledger_app::UsageLedger;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Runs retention cleanup every `interval`, starting immediately.
pub fn spawn_cleanup(
    ledger: UsageLedger,
    interval: Duration,
    retention_days: i64,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let ledger = ledger.clone();
            match tokio::task::spawn_blocking(move || ledger.cleanup(retention_days)).await {
                Ok(deleted) => {
                    tracing::debug!(deleted, retention_days, "scheduled cleanup finished")
                }
                Err(err) => tracing::warn!(error = %err, "scheduled cleanup task failed"),
            }
        }
    })
}
