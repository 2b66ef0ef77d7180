//! Application state management
//!
//! The composition root: the hosting application builds one [`AppState`]
//! at startup and hands references down to whatever drives the tracker.
//! Nothing in the core reaches for a global.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::error::CoreResult;
use crate::storage::FileStorage;
use crate::store::TrackerStore;

/// Fully wired tracker state
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// The single process-wide record store
    pub store: TrackerStore,
}

impl AppState {
    /// Wire the configured storage backend and load the store.
    ///
    /// This is the only place the file backend is chosen; tests and other
    /// hosts can construct [`TrackerStore`] directly over any backend.
    pub fn new(config: AppConfig) -> CoreResult<Self> {
        let storage = FileStorage::new(&config.storage.data_dir)?;
        let store = TrackerStore::open(Box::new(storage));

        Ok(Self {
            config: Arc::new(config),
            store,
        })
    }
}
