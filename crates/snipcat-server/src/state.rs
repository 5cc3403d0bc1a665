//! Shared handler state

use std::sync::{Arc, Mutex, MutexGuard};

use snipcat_core::errors::{ExError, ExErrorKind, ExResult};
use snipcat_core::SnippetStore;

/// The catalog store behind a lock, shared by all handlers
pub type SharedStore = Arc<Mutex<dyn SnippetStore + Send>>;

#[derive(Clone)]
pub struct AppState {
    store: SharedStore,
}

impl AppState {
    pub fn new<S: SnippetStore + Send + 'static>(store: S) -> Self {
        let store: SharedStore = Arc::new(Mutex::new(store));
        Self { store }
    }

    /// Lock the store for one operation
    ///
    /// The guard must not be held across an await point.
    pub fn store(&self) -> ExResult<MutexGuard<'_, dyn SnippetStore + Send + 'static>> {
        self.store.lock().map_err(|_| {
            ExError::new(ExErrorKind::Internal)
                .with_op("store_lock")
                .with_message("catalog store lock poisoned")
        })
    }
}
