//! Periodic cleanup of old chat history.
//!
//! Conversations are only needed while a rental is in flight. Once a
//! booking has been returned and the retention window has passed, its
//! messages are deleted. Runs on a fixed interval using
//! `tokio::time::interval`.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use unajmi_db::repositories::message_repo::MessageRepo;

use crate::state::AppState;

/// Messages of returned bookings are kept this long, overridable via
/// `MESSAGE_RETENTION_DAYS`.
const DEFAULT_RETENTION_DAYS: i64 = 30;

/// How often the cleanup job runs, overridable via
/// `RETENTION_SWEEP_INTERVAL_SECS`.
const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(86_400); // 24 hours

/// Run the message retention cleanup loop until `cancel` is triggered.
pub async fn run(state: AppState, cancel: CancellationToken) {
    let retention_days: i64 = std::env::var("MESSAGE_RETENTION_DAYS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_RETENTION_DAYS);
    let sweep_interval = std::env::var("RETENTION_SWEEP_INTERVAL_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_SWEEP_INTERVAL);

    tracing::info!(
        retention_days,
        interval_secs = sweep_interval.as_secs(),
        "Message retention job started"
    );

    let mut interval = tokio::time::interval(sweep_interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Message retention job stopping");
                break;
            }
            _ = interval.tick() => {
                match run_once(&state, retention_days).await {
                    Ok(deleted) => {
                        if deleted > 0 {
                            tracing::info!(deleted, "Message retention: purged old chat history");
                        } else {
                            tracing::debug!("Message retention: nothing to purge");
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Message retention: cleanup failed");
                    }
                }
            }
        }
    }
}

/// One sweep: delete chat history of bookings returned more than
/// `retention_days` ago. Returns the number of messages removed.
pub async fn run_once(state: &AppState, retention_days: i64) -> Result<u64, sqlx::Error> {
    let cutoff = state.clock.now() - chrono::Duration::days(retention_days);
    MessageRepo::purge_for_returned_before(&state.pool, cutoff).await
}
