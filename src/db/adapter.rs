//! The storage adapter contract.
//!
//! Both backends implement [`StorageAdapter`] with identical external
//! semantics, so the HTTP layer never needs to know which one it talks to.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::db::{Client, Collection, Id, Project, StorageError, StorageResult};

/// Operation timeout used when no configuration reaches the adapter.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Connection parameters shared by every backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectOptions {
    /// Bound for connecting and for every individual operation.
    pub timeout: Duration,
    /// Root user for backends that authenticate (ignored by SQLite).
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            username: None,
            password: None,
        }
    }
}

impl ConnectOptions {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }
}

/// Data access for clients and projects.
///
/// Selects that match nothing fail with [`StorageError::NotFound`] rather
/// than returning an empty list. Upserts without an id insert with a freshly
/// assigned one; upserts with an id replace the mutable fields of that record
/// (or insert it when absent) and always return the stored record.
pub trait StorageAdapter: Send + Sync {
    /// List all clients.
    fn select_clients(&self) -> impl Future<Output = StorageResult<Vec<Client>>> + Send;

    /// Get a client by id.
    fn get_client(&self, id: Id) -> impl Future<Output = StorageResult<Client>> + Send;

    /// Insert or replace a client. `None` fails with `NilEntity`.
    fn upsert_client(
        &self,
        client: Option<Client>,
    ) -> impl Future<Output = StorageResult<Client>> + Send;

    /// Delete a client by id.
    fn delete_client(&self, id: Id) -> impl Future<Output = StorageResult<()>> + Send;

    /// List all projects.
    fn select_projects(&self) -> impl Future<Output = StorageResult<Vec<Project>>> + Send;

    /// Get a project by id.
    fn get_project(&self, id: Id) -> impl Future<Output = StorageResult<Project>> + Send;

    /// List the projects referencing a client.
    fn select_projects_of_client(
        &self,
        client_id: Id,
    ) -> impl Future<Output = StorageResult<Vec<Project>>> + Send;

    /// Insert or replace a project. `None` fails with `NilEntity`.
    fn upsert_project(
        &self,
        project: Option<Project>,
    ) -> impl Future<Output = StorageResult<Project>> + Send;

    /// Delete a project by id.
    fn delete_project(&self, id: Id) -> impl Future<Output = StorageResult<()>> + Send;
}

/// Unwrap an upsert payload or fail with `NilEntity`.
pub(crate) fn require<T>(entity: Option<T>, collection: Collection) -> StorageResult<T> {
    entity.ok_or(StorageError::NilEntity {
        entity: collection.entity(),
    })
}

/// Fail with `NotFound` when a bulk select came back empty.
pub(crate) fn non_empty<T>(items: Vec<T>) -> StorageResult<Vec<T>> {
    if items.is_empty() {
        return Err(StorageError::not_found());
    }
    Ok(items)
}

/// Run `fut` under its own deadline.
///
/// On expiry the future is dropped, which cancels the in-flight request and
/// releases whatever it held.
pub(crate) async fn within<T, F>(
    timeout: Duration,
    operation: &'static str,
    fut: F,
) -> StorageResult<T>
where
    F: Future<Output = StorageResult<T>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result,
        Err(_) => {
            warn!(operation, ?timeout, "storage operation timed out");
            Err(StorageError::Timeout { operation, timeout })
        }
    }
}
