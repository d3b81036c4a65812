// Application state (AppState)

use crate::core::config::Config;
use crate::metrics::collector::Metrics;
use crate::storage::Storage;
use std::sync::Arc;

/// Shared application state
///
/// Contains all shared components that are accessed by request handlers.
/// All fields are wrapped in Arc for efficient cloning across threads.
#[derive(Clone)]
pub struct AppState {
    /// Durable table of users and lockers
    pub store: Arc<dyn Storage>,

    /// Request counters
    pub metrics: Arc<Metrics>,

    /// Configuration
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn Storage>) -> Self {
        Self {
            store,
            metrics: Arc::new(Metrics::new()),
            config: Arc::new(config),
        }
    }
}
