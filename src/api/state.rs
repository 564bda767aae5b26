//! Shared application state

use crate::store::SnapshotStore;

/// State shared by all request handlers
pub struct AppState {
    /// The snapshot store backing every endpoint
    pub store: SnapshotStore,
}

impl AppState {
    /// Create a new AppState around an opened store
    pub fn new(store: SnapshotStore) -> Self {
        Self { store }
    }
}
