//! SurrealDB connection management.

use std::time::Duration;

use surrealdb::Surreal;
use surrealdb::engine::any::Any;
use surrealdb::opt::auth::Root;
use tokio::sync::Mutex;
use tracing::{info, instrument};

use super::{Sequence, SurrealClientRepository, SurrealProjectRepository};
use crate::db::adapter::{non_empty, require, within};
use crate::db::{
    Client, Collection, ConnectOptions, Id, Project, StorageAdapter, StorageError, StorageResult,
};

/// Namespace all collections live in.
pub const NAMESPACE: &str = "mend";
/// Database all collections live in.
pub const DATABASE: &str = "mend";

/// SurrealDB-backed storage adapter.
///
/// Accepts any address the `any` engine understands: `ws://host:8000` or
/// `http://host:8000` for a remote server, `mem://` for tests and
/// `surrealkv://path` for an embedded store.
pub struct SurrealStorage {
    db: Surreal<Any>,
    timeout: Duration,
    mint: Mutex<()>,
}

impl SurrealStorage {
    /// Connect, sign in when credentials are given, select the namespace and
    /// check the server is healthy, all within `options.timeout`.
    #[instrument(skip(options))]
    pub async fn connect(addr: &str, options: &ConnectOptions) -> StorageResult<Self> {
        let db = within(options.timeout, "connect", async {
            let db: Surreal<Any> = Surreal::init();
            db.connect(addr).await.map_err(StorageError::connection)?;

            if let (Some(username), Some(password)) =
                (options.username.as_deref(), options.password.as_deref())
            {
                db.signin(Root { username, password })
                    .await
                    .map_err(StorageError::connection)?;
            }

            db.use_ns(NAMESPACE)
                .use_db(DATABASE)
                .await
                .map_err(StorageError::connection)?;
            db.health().await.map_err(StorageError::connection)?;
            Ok(db)
        })
        .await?;

        info!(addr, "connected to SurrealDB");
        Ok(Self {
            db,
            timeout: options.timeout,
            mint: Mutex::new(()),
        })
    }

    /// Connect to an in-memory SurrealDB (for tests).
    pub async fn in_memory() -> StorageResult<Self> {
        Self::connect("mem://", &ConnectOptions::default()).await
    }

    /// Get a reference to the underlying SurrealDB client.
    pub fn client(&self) -> &Surreal<Any> {
        &self.db
    }

    pub fn sequence(&self) -> Sequence<'_> {
        Sequence {
            db: &self.db,
            lock: &self.mint,
        }
    }

    pub fn clients(&self) -> SurrealClientRepository<'_> {
        SurrealClientRepository { db: &self.db }
    }

    pub fn projects(&self) -> SurrealProjectRepository<'_> {
        SurrealProjectRepository { db: &self.db }
    }

    /// Use the caller's id, or mint one when absent.
    ///
    /// The counter is only touched when the write will insert, so updates of
    /// existing records never contend on it.
    async fn assign_id(&self, id: Option<Id>, collection: Collection) -> StorageResult<Id> {
        match id {
            Some(id) => {
                if !self.record_exists(collection, id).await? {
                    self.sequence().observe(collection, id).await?;
                }
                Ok(id)
            }
            None => self.sequence().next(collection).await,
        }
    }

    async fn record_exists(&self, collection: Collection, id: Id) -> StorageResult<bool> {
        let mut response = self
            .db
            .query("SELECT VALUE record::id(id) FROM type::thing($table, $id)")
            .bind(("table", collection.as_str()))
            .bind(("id", id))
            .await?;

        let found: Option<Id> = response.take(0)?;
        Ok(found.is_some())
    }
}

impl std::fmt::Debug for SurrealStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SurrealStorage")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl StorageAdapter for SurrealStorage {
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
        let id = within(
            self.timeout,
            "next_client_id",
            self.assign_id(client.id, Collection::Clients),
        )
        .await?;
        within(self.timeout, "upsert_client", self.clients().upsert(id, &client)).await?;
        within(self.timeout, "get_client", self.clients().get(id)).await
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
        let id = within(
            self.timeout,
            "next_project_id",
            self.assign_id(project.id, Collection::Projects),
        )
        .await?;
        within(self.timeout, "upsert_project", self.projects().upsert(id, &project)).await?;
        within(self.timeout, "get_project", self.projects().get(id)).await
    }

    #[instrument(skip(self))]
    async fn delete_project(&self, id: Id) -> StorageResult<()> {
        within(self.timeout, "delete_project", self.projects().delete(id)).await
    }
}
