//! Application state for the API server.

use std::sync::Arc;

use crate::db::StorageAdapter;

/// Shared application state.
///
/// Generic over `A: StorageAdapter` so the same router serves either backend,
/// or the [`Storage`](crate::db::Storage) enum chosen at startup.
pub struct AppState<A: StorageAdapter> {
    storage: Arc<A>,
}

// Manual Clone impl - only the Arc needs cloning, not A
impl<A: StorageAdapter> Clone for AppState<A> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
        }
    }
}

impl<A: StorageAdapter> AppState<A> {
    pub fn new(storage: A) -> Self {
        Self {
            storage: Arc::new(storage),
        }
    }

    /// Get a reference to the storage adapter.
    pub fn storage(&self) -> &A {
        &self.storage
    }
}
