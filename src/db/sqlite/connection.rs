//! SQLite connection pool and migration management.

use std::str::FromStr;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::{debug, info, instrument};

use super::{SqliteClientRepository, SqliteProjectRepository};
use crate::db::adapter::{non_empty, require, within};
use crate::db::{
    Client, Collection, ConnectOptions, Id, Project, StorageAdapter, StorageError, StorageResult,
};

/// SQLite-backed storage adapter.
pub struct SqliteStorage {
    pool: SqlitePool,
    timeout: Duration,
}

fn is_memory(addr: &str) -> bool {
    matches!(addr, ":memory:" | "sqlite::memory:" | "sqlite://:memory:")
}

impl SqliteStorage {
    /// Open (creating if missing) the database at `addr` and run migrations.
    ///
    /// `addr` is either a plain file path, a `sqlite:` URL, or `:memory:`.
    #[instrument(skip(options))]
    pub async fn connect(addr: &str, options: &ConnectOptions) -> StorageResult<Self> {
        let in_memory = is_memory(addr);
        let connect_options = if in_memory {
            SqliteConnectOptions::from_str("sqlite::memory:")
        } else if addr.starts_with("sqlite:") {
            SqliteConnectOptions::from_str(addr)
        } else {
            Ok(SqliteConnectOptions::new().filename(addr))
        }
        .map_err(StorageError::connection)?
        .create_if_missing(true);

        let pool_options = SqlitePoolOptions::new().acquire_timeout(options.timeout);
        // Every connection to :memory: is a separate database, so keep exactly one alive.
        let pool_options = if in_memory {
            pool_options
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            pool_options
        };

        let pool = within(options.timeout, "connect", async {
            pool_options
                .connect_with(connect_options)
                .await
                .map_err(StorageError::connection)
        })
        .await?;

        let storage = Self {
            pool,
            timeout: options.timeout,
        };
        storage.migrate().await?;
        info!(addr, "opened SQLite storage");
        Ok(storage)
    }

    /// Create an in-memory database (useful for testing).
    pub async fn in_memory() -> StorageResult<Self> {
        Self::connect(":memory:", &ConnectOptions::default()).await
    }

    /// Run pending migrations. Safe to call repeatedly.
    pub async fn migrate(&self) -> StorageResult<()> {
        sqlx::migrate!("data/sql/sqlite")
            .run(&self.pool)
            .await
            .map_err(|e| StorageError::Database {
                message: format!("migration failed: {e}"),
            })?;
        debug!("SQLite migrations complete");
        Ok(())
    }

    /// Get a reference to the underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn clients(&self) -> SqliteClientRepository<'_> {
        SqliteClientRepository { pool: &self.pool }
    }

    pub fn projects(&self) -> SqliteProjectRepository<'_> {
        SqliteProjectRepository { pool: &self.pool }
    }
}

impl StorageAdapter for SqliteStorage {
    #[instrument(skip(self))]
    async fn select_clients(&self) -> StorageResult<Vec<Client>> {
        let clients = within(self.timeout, "select_clients", self.clients().select()).await?;
        non_empty(clients)
    }

    #[instrument(skip(self))]
    async fn get_client(&self, id: Id) -> StorageResult<Client> {
        within(self.timeout, "get_client", self.clients().get(id)).await
    }

    #[instrument(skip(self))]
    async fn upsert_client(&self, client: Option<Client>) -> StorageResult<Client> {
        let client = require(client, Collection::Clients)?;
        within(self.timeout, "upsert_client", self.clients().upsert(&client)).await
    }

    #[instrument(skip(self))]
    async fn delete_client(&self, id: Id) -> StorageResult<()> {
        within(self.timeout, "delete_client", self.clients().delete(id)).await
    }

    #[instrument(skip(self))]
    async fn select_projects(&self) -> StorageResult<Vec<Project>> {
        let projects = within(self.timeout, "select_projects", self.projects().select()).await?;
        non_empty(projects)
    }

    #[instrument(skip(self))]
    async fn get_project(&self, id: Id) -> StorageResult<Project> {
        within(self.timeout, "get_project", self.projects().get(id)).await
    }

    #[instrument(skip(self))]
    async fn select_projects_of_client(&self, client_id: Id) -> StorageResult<Vec<Project>> {
        let projects = within(
            self.timeout,
            "select_projects_of_client",
            self.projects().select_by_client(client_id),
        )
        .await?;
        non_empty(projects)
    }

    #[instrument(skip(self))]
    async fn upsert_project(&self, project: Option<Project>) -> StorageResult<Project> {
        let project = require(project, Collection::Projects)?;
        within(self.timeout, "upsert_project", self.projects().upsert(&project)).await
    }

    #[instrument(skip(self))]
    async fn delete_project(&self, id: Id) -> StorageResult<()> {
        within(self.timeout, "delete_project", self.projects().delete(id)).await
    }
}
