//! Backend selection.
//!
//! [`Storage`] is the tagged union the server holds: exactly one SQLite or
//! one SurrealDB adapter, each owning its own connection state.

use std::str::FromStr;

use tracing::{info, instrument};

use super::sqlite::SqliteStorage;
use super::surreal::SurrealStorage;
use crate::db::{
    Client, ConnectOptions, Id, Project, StorageAdapter, StorageError, StorageResult,
};

/// Recognised storage backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    Sqlite,
    Surreal,
}

impl FromStr for StorageKind {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Ok(StorageKind::Sqlite),
            "surrealdb" | "surreal" => Ok(StorageKind::Surreal),
            other => Err(StorageError::Config {
                message: format!("unrecognized storage type '{other}'"),
            }),
        }
    }
}

impl std::fmt::Display for StorageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageKind::Sqlite => f.write_str("sqlite"),
            StorageKind::Surreal => f.write_str("surrealdb"),
        }
    }
}

/// A connected storage backend.
pub enum Storage {
    Sqlite(SqliteStorage),
    Surreal(SurrealStorage),
}

impl Storage {
    /// Parse `kind` and connect to `addr`.
    ///
    /// An unrecognised kind fails with [`StorageError::Config`] before any
    /// connection attempt.
    #[instrument(skip(options))]
    pub async fn open(kind: &str, addr: &str, options: &ConnectOptions) -> StorageResult<Self> {
        let kind: StorageKind = kind.parse()?;
        let storage = match kind {
            StorageKind::Sqlite => Storage::Sqlite(SqliteStorage::connect(addr, options).await?),
            StorageKind::Surreal => {
                Storage::Surreal(SurrealStorage::connect(addr, options).await?)
            }
        };
        info!(%kind, "storage ready");
        Ok(storage)
    }

    pub fn kind(&self) -> StorageKind {
        match self {
            Storage::Sqlite(_) => StorageKind::Sqlite,
            Storage::Surreal(_) => StorageKind::Surreal,
        }
    }
}

/// Forward a call to whichever backend is active.
macro_rules! dispatch {
    ($self:ident.$method:ident($($arg:expr),*)) => {
        match $self {
            Storage::Sqlite(s) => s.$method($($arg),*).await,
            Storage::Surreal(s) => s.$method($($arg),*).await,
        }
    };
}

impl StorageAdapter for Storage {
    async fn select_clients(&self) -> StorageResult<Vec<Client>> {
        dispatch!(self.select_clients())
    }

    async fn get_client(&self, id: Id) -> StorageResult<Client> {
        dispatch!(self.get_client(id))
    }

    async fn upsert_client(&self, client: Option<Client>) -> StorageResult<Client> {
        dispatch!(self.upsert_client(client))
    }

    async fn delete_client(&self, id: Id) -> StorageResult<()> {
        dispatch!(self.delete_client(id))
    }

    async fn select_projects(&self) -> StorageResult<Vec<Project>> {
        dispatch!(self.select_projects())
    }

    async fn get_project(&self, id: Id) -> StorageResult<Project> {
        dispatch!(self.get_project(id))
    }

    async fn select_projects_of_client(&self, client_id: Id) -> StorageResult<Vec<Project>> {
        dispatch!(self.select_projects_of_client(client_id))
    }

    async fn upsert_project(&self, project: Option<Project>) -> StorageResult<Project> {
        dispatch!(self.upsert_project(project))
    }

    async fn delete_project(&self, id: Id) -> StorageResult<()> {
        dispatch!(self.delete_project(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_kinds() {
        assert_eq!("sqlite".parse::<StorageKind>().unwrap(), StorageKind::Sqlite);
        assert_eq!("SurrealDB".parse::<StorageKind>().unwrap(), StorageKind::Surreal);
        assert_eq!("surreal".parse::<StorageKind>().unwrap(), StorageKind::Surreal);
    }

    #[test]
    fn rejects_unknown_kind() {
        let err = "mongodb".parse::<StorageKind>().unwrap_err();
        assert!(matches!(err, StorageError::Config { .. }));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn open_fails_fast_on_unknown_kind() {
        // The address would hang if a connection were attempted.
        let result = Storage::open("postgres", "ws://10.255.255.1:9", &ConnectOptions::default()).await;
        assert!(matches!(result, Err(StorageError::Config { .. })));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn open_selects_requested_backend() {
        let sqlite = Storage::open("sqlite", ":memory:", &ConnectOptions::default())
            .await
            .unwrap();
        assert_eq!(sqlite.kind(), StorageKind::Sqlite);

        let surreal = Storage::open("surrealdb", "mem://", &ConnectOptions::default())
            .await
            .unwrap();
        assert_eq!(surreal.kind(), StorageKind::Surreal);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn dispatch_reaches_backend() {
        let storage = Storage::open("sqlite", ":memory:", &ConnectOptions::default())
            .await
            .unwrap();
        let created = storage
            .upsert_client(Some(Client::new("Acme", std::time::Duration::from_secs(60))))
            .await
            .unwrap();
        assert_eq!(storage.get_client(1).await.unwrap(), created);
    }
}
