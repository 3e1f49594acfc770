//! Background tasks and scheduled jobs.
//!
//! Each submodule provides a long-running async function intended to be
//! spawned via `tokio::spawn`. All tasks accept a [`CancellationToken`]
//! for graceful shutdown, and expose a `run_once` entry that does one
//! sweep so tests can drive them without timers.

pub mod message_retention;
pub mod return_reminders;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::state::AppState;

/// Spawns all periodic sweeps. The returned handles are awaited during
/// shutdown after the token is cancelled.
pub fn spawn_background_tasks(
    state: &AppState,
    cancel: &CancellationToken,
) -> Vec<JoinHandle<()>> {
    vec![
        tokio::spawn(return_reminders::run(state.clone(), cancel.clone())),
        tokio::spawn(message_retention::run(state.clone(), cancel.clone())),
    ]
}
