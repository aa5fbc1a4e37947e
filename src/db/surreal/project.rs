//! SurrealDB project queries.

use serde::de::IgnoredAny;
use surrealdb::Surreal;
use surrealdb::engine::any::Any;

use crate::db::{Collection, Id, Project, StorageError, StorageResult};

const TABLE: &str = Collection::Projects.as_str();

/// SurrealDB-backed project repository.
pub struct SurrealProjectRepository<'a> {
    pub(crate) db: &'a Surreal<Any>,
}

impl SurrealProjectRepository<'_> {
    pub async fn select(&self) -> StorageResult<Vec<Project>> {
        let mut response = self
            .db
            .query("SELECT record::id(id) AS id, client_id, name FROM type::table($table) ORDER BY id")
            .bind(("table", TABLE))
            .await?;

        Ok(response.take(0)?)
    }

    pub async fn get(&self, id: Id) -> StorageResult<Project> {
        let mut response = self
            .db
            .query("SELECT record::id(id) AS id, client_id, name FROM type::thing($table, $id)")
            .bind(("table", TABLE))
            .bind(("id", id))
            .await?;

        let project: Option<Project> = response.take(0)?;
        project.ok_or_else(StorageError::not_found)
    }

    pub async fn select_by_client(&self, client_id: Id) -> StorageResult<Vec<Project>> {
        let mut response = self
            .db
            .query(
                "SELECT record::id(id) AS id, client_id, name FROM type::table($table) \
                 WHERE client_id = $client_id ORDER BY id",
            )
            .bind(("table", TABLE))
            .bind(("client_id", client_id))
            .await?;

        Ok(response.take(0)?)
    }

    /// A `None` client_id removes the field from the stored record.
    pub async fn upsert(&self, id: Id, project: &Project) -> StorageResult<()> {
        self.db
            .query("UPSERT type::thing($table, $id) MERGE { client_id: $client_id, name: $name } RETURN NONE")
            .bind(("table", TABLE))
            .bind(("id", id))
            .bind(("client_id", project.client_id))
            .bind(("name", project.name.clone()))
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
