//! SQLite project queries.

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::db::{Id, Project, StorageError, StorageResult};

/// SQLx-backed project repository.
pub struct SqliteProjectRepository<'a> {
    pub(crate) pool: &'a SqlitePool,
}

fn project_from_row(row: &SqliteRow) -> StorageResult<Project> {
    Ok(Project {
        id: Some(row.try_get("id")?),
        client_id: row.try_get("client_id")?,
        name: row.try_get("name")?,
    })
}

impl SqliteProjectRepository<'_> {
    pub async fn select(&self) -> StorageResult<Vec<Project>> {
        let rows = sqlx::query("SELECT id, client_id, name FROM projects ORDER BY id")
            .fetch_all(self.pool)
            .await?;

        rows.iter().map(project_from_row).collect()
    }

    pub async fn get(&self, id: Id) -> StorageResult<Project> {
        let row = sqlx::query("SELECT id, client_id, name FROM projects WHERE id = ?")
            .bind(id)
            .fetch_one(self.pool)
            .await?;

        project_from_row(&row)
    }

    pub async fn select_by_client(&self, client_id: Id) -> StorageResult<Vec<Project>> {
        let rows =
            sqlx::query("SELECT id, client_id, name FROM projects WHERE client_id = ? ORDER BY id")
                .bind(client_id)
                .fetch_all(self.pool)
                .await?;

        rows.iter().map(project_from_row).collect()
    }

    pub async fn upsert(&self, project: &Project) -> StorageResult<Project> {
        let row = sqlx::query(
            "INSERT INTO projects (id, client_id, name) VALUES (?, ?, ?) \
             ON CONFLICT(id) DO UPDATE SET \
                 client_id = excluded.client_id, \
                 name = excluded.name \
             RETURNING id, client_id, name",
        )
        .bind(project.id)
        .bind(project.client_id)
        .bind(&project.name)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(StorageError::not_found)?;

        project_from_row(&row)
    }

    pub async fn delete(&self, id: Id) -> StorageResult<()> {
        let result = sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::not_found());
        }

        Ok(())
    }
}
