//! Periodic return reminders.
//!
//! Renters with a delivered booking get a nudge once the end of the
//! rental window is a day away, or has already passed without the
//! owner confirming the return. Each booking is reminded at most once;
//! concurrent sweeps race on a claim update and only the winner
//! notifies.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use unajmi_core::notify;
use unajmi_db::repositories::booking_repo::BookingRepo;
use unajmi_db::repositories::item_repo::ItemRepo;

use crate::handlers::bookings::booking_link;
use crate::state::AppState;

/// How often the sweep runs, overridable via
/// `REMINDER_SWEEP_INTERVAL_SECS`.
const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(3600); // 1 hour

/// Run the return-reminder loop until `cancel` is triggered.
pub async fn run(state: AppState, cancel: CancellationToken) {
    let sweep_interval = std::env::var("REMINDER_SWEEP_INTERVAL_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_SWEEP_INTERVAL);

    tracing::info!(
        interval_secs = sweep_interval.as_secs(),
        "Return reminder job started"
    );

    let mut interval = tokio::time::interval(sweep_interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Return reminder job stopping");
                break;
            }
            _ = interval.tick() => {
                match run_once(&state).await {
                    Ok(reminded) => {
                        if reminded > 0 {
                            tracing::info!(reminded, "Return reminders sent");
                        } else {
                            tracing::debug!("Return reminders: nothing due");
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Return reminder sweep failed");
                    }
                }
            }
        }
    }
}

/// One sweep: find deliveries due back by tomorrow, claim each, notify
/// the renter. Returns how many reminders went out. A failure on one
/// booking does not stop the rest.
pub async fn run_once(state: &AppState) -> Result<u64, sqlx::Error> {
    let cutoff = state.clock.today() + chrono::Days::new(1);
    let due = BookingRepo::due_return_reminders(&state.pool, cutoff).await?;

    let mut reminded = 0;
    for booking in due {
        match BookingRepo::claim_return_reminder(&state.pool, booking.id).await {
            Ok(true) => {}
            Ok(false) => continue,
            Err(e) => {
                tracing::error!(booking_id = %booking.id, error = %e, "Reminder claim failed");
                continue;
            }
        }

        let title = match ItemRepo::find_any_by_id(&state.pool, booking.item_id).await {
            Ok(Some(item)) => item.title,
            _ => "your rental".to_string(),
        };
        state
            .notifier
            .notify(
                &booking.renter_id,
                notify::RETURN_REMINDER,
                format!(
                    "{title} is due back on {}. Please arrange the return with the owner",
                    booking.end_date
                ),
                Some(booking_link(&booking)),
            )
            .await;
        reminded += 1;
    }
    Ok(reminded)
}
