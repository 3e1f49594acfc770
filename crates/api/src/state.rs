use std::sync::Arc;

use unajmi_core::clock::Clock;
use unajmi_db::DbPool;
use unajmi_events::Notifier;

use crate::config::ServerConfig;
use crate::storage::MediaStore;

/// Shared application state, cheap to clone per request.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub config: Arc<ServerConfig>,
    pub notifier: Arc<Notifier>,
    pub media: Arc<dyn MediaStore>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(
        pool: DbPool,
        config: Arc<ServerConfig>,
        notifier: Arc<Notifier>,
        media: Arc<dyn MediaStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        AppState {
            pool,
            config,
            notifier,
            media,
            clock,
        }
    }
}
