// Application state module
// Shared, read-only view of the loaded configuration

use std::sync::Arc;
use tokio::sync::Notify;

use super::types::Config;
use crate::notes::NotesStore;

/// Application state handed to every connection
pub struct AppState {
    pub config: Config,
    pub notes: NotesStore,
    /// Notified once when the server should stop accepting connections
    pub shutdown: Arc<Notify>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let notes = NotesStore::new(&config.notes);
        Self {
            config,
            notes,
            shutdown: Arc::new(Notify::new()),
        }
    }
}
