//! Application state for the tuition office API.
//!
//! Handlers share the loaded configuration and the record store.

use std::sync::Arc;

use crate::config::{ConfigLoader, OfficeConfig};
use crate::store::RecordStore;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ConfigLoader>,
    store: Arc<dyn RecordStore>,
}

impl AppState {
    /// Creates a new application state over a configuration and a store.
    pub fn new(config: ConfigLoader, store: Arc<dyn RecordStore>) -> Self {
        Self {
            config: Arc::new(config),
            store,
        }
    }

    /// Returns the office configuration.
    pub fn config(&self) -> &OfficeConfig {
        self.config.config()
    }

    /// Returns the record store.
    pub fn store(&self) -> &dyn RecordStore {
        self.store.as_ref()
    }
}
