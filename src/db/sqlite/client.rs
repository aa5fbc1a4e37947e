//! SQLite client queries.

use std::time::Duration;

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::db::{Client, ClientSettings, Id, StorageError, StorageResult};

/// SQLx-backed client repository.
pub struct SqliteClientRepository<'a> {
    pub(crate) pool: &'a SqlitePool,
}

fn client_from_row(row: &SqliteRow) -> StorageResult<Client> {
    let interval: i64 = row.try_get("code_scan_interval")?;
    let interval = u64::try_from(interval).map_err(|_| StorageError::Database {
        message: format!("negative code_scan_interval {interval}"),
    })?;

    Ok(Client {
        id: Some(row.try_get("id")?),
        name: row.try_get("name")?,
        settings: ClientSettings {
            code_scan_interval: Duration::from_secs(interval),
        },
    })
}

impl SqliteClientRepository<'_> {
    /// All clients ordered by id. Empty when the table is.
    pub async fn select(&self) -> StorageResult<Vec<Client>> {
        let rows = sqlx::query("SELECT id, name, code_scan_interval FROM clients ORDER BY id")
            .fetch_all(self.pool)
            .await?;

        rows.iter().map(client_from_row).collect()
    }

    pub async fn get(&self, id: Id) -> StorageResult<Client> {
        // fetch_one reports a missing row as RowNotFound, which maps to NotFound.
        let row = sqlx::query("SELECT id, name, code_scan_interval FROM clients WHERE id = ?")
            .bind(id)
            .fetch_one(self.pool)
            .await?;

        client_from_row(&row)
    }

    /// Insert or update in one statement and return the stored row.
    ///
    /// A `NULL` id lets SQLite allocate the next rowid.
    pub async fn upsert(&self, client: &Client) -> StorageResult<Client> {
        let interval = i64::try_from(client.settings.code_scan_interval.as_secs())
            .map_err(StorageError::database)?;

        let row = sqlx::query(
            "INSERT INTO clients (id, name, code_scan_interval) VALUES (?, ?, ?) \
             ON CONFLICT(id) DO UPDATE SET \
                 name = excluded.name, \
                 code_scan_interval = excluded.code_scan_interval \
             RETURNING id, name, code_scan_interval",
        )
        .bind(client.id)
        .bind(&client.name)
        .bind(interval)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(StorageError::not_found)?;

        client_from_row(&row)
    }

    pub async fn delete(&self, id: Id) -> StorageResult<()> {
        let result = sqlx::query("DELETE FROM clients WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::not_found());
        }

        Ok(())
    }
}
