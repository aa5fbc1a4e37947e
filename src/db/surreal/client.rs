//! SurrealDB client queries.

use serde::de::IgnoredAny;
use surrealdb::Surreal;
use surrealdb::engine::any::Any;

use crate::db::{Client, Collection, Id, StorageError, StorageResult};

const TABLE: &str = Collection::Clients.as_str();

/// SurrealDB-backed client repository.
pub struct SurrealClientRepository<'a> {
    pub(crate) db: &'a Surreal<Any>,
}

impl SurrealClientRepository<'_> {
    /// All clients ordered by id. The whole result set is collected before
    /// returning; a record that fails to decode fails the call.
    pub async fn select(&self) -> StorageResult<Vec<Client>> {
        let mut response = self
            .db
            .query("SELECT record::id(id) AS id, name, settings FROM type::table($table) ORDER BY id")
            .bind(("table", TABLE))
            .await?;

        Ok(response.take(0)?)
    }

    pub async fn get(&self, id: Id) -> StorageResult<Client> {
        let mut response = self
            .db
            .query("SELECT record::id(id) AS id, name, settings FROM type::thing($table, $id)")
            .bind(("table", TABLE))
            .bind(("id", id))
            .await?;

        let client: Option<Client> = response.take(0)?;
        client.ok_or_else(StorageError::not_found)
    }

    /// Write the mutable fields of `client` to record `id`, creating it if
    /// absent. The stored id is the record key and never changes.
    pub async fn upsert(&self, id: Id, client: &Client) -> StorageResult<()> {
        self.db
            .query("UPSERT type::thing($table, $id) MERGE { name: $name, settings: $settings } RETURN NONE")
            .bind(("table", TABLE))
            .bind(("id", id))
            .bind(("name", client.name.clone()))
            .bind(("settings", client.settings))
            .await?
            .check()?;
        Ok(())
    }

    pub async fn delete(&self, id: Id) -> StorageResult<()> {
        let mut response = self
            .db
            .query("DELETE type::thing($table, $id) RETURN BEFORE")
            .bind(("table", TABLE))
            .bind(("id", id))
            .await?;

        let removed: Vec<IgnoredAny> = response.take(0)?;
        if removed.is_empty() {
            return Err(StorageError::not_found());
        }
        Ok(())
    }
}
