//! Application state.

use crate::config::Config;
use crate::db::SqliteCardStore;
use std::sync::Arc;
use vocab_core::{Clock, SystemClock};

/// Everything a command needs, built once at startup.
pub struct AppState {
    pub store: Arc<SqliteCardStore>,
    pub clock: Arc<dyn Clock>,
    pub config: Config,
}

impl AppState {
    pub fn new(store: SqliteCardStore, config: Config) -> Self {
        Self::with_clock(store, config, Arc::new(SystemClock))
    }

    pub fn with_clock(store: SqliteCardStore, config: Config, clock: Arc<dyn Clock>) -> Self {
        Self {
            store: Arc::new(store),
            clock,
            config,
        }
    }
}
