//! Per-collection id sequences stored in the `counters` table.

use std::future::Future;
use std::time::Duration;

use surrealdb::Surreal;
use surrealdb::engine::any::Any;
use tokio::sync::Mutex;
use tracing::debug;

use crate::db::{Collection, Id, StorageError, StorageResult};

/// Table holding one `{ seq }` record per collection.
pub const COUNTERS: &str = "counters";

const MAX_ATTEMPTS: u32 = 8;

/// Id generator over the `counters` table.
///
/// Each counter write is a single `UPSERT` statement. Writers sharing one
/// adapter take `lock` first; writes from other processes that still collide
/// are rejected by the store as conflicts and retried here.
pub struct Sequence<'a> {
    pub(crate) db: &'a Surreal<Any>,
    pub(crate) lock: &'a Mutex<()>,
}

/// Embedded engines report `TxRetryable`; remote servers send its message.
fn is_conflict(e: &surrealdb::Error) -> bool {
    matches!(e, surrealdb::Error::Db(surrealdb::error::Db::TxRetryable))
        || e.to_string().contains("can be retried")
}

/// Re-run `op` while the store reports a transaction conflict.
async fn retry_conflicts<T, F, Fut>(mut op: F) -> StorageResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, surrealdb::Error>>,
{
    let mut attempt = 1;
    loop {
        match op().await {
            Err(e) if attempt < MAX_ATTEMPTS && is_conflict(&e) => {
                debug!(attempt, error = %e, "counter write conflicted, retrying");
                tokio::time::sleep(Duration::from_millis(5 * u64::from(attempt))).await;
                attempt += 1;
            }
            other => return other.map_err(StorageError::from),
        }
    }
}

impl Sequence<'_> {
    /// Increment and return the next id for `collection`. The first id is 1.
    pub async fn next(&self, collection: Collection) -> StorageResult<Id> {
        let _guard = self.lock.lock().await;

        let seq: Option<Id> = retry_conflicts(|| async {
            self.db
                .query("UPSERT type::thing($counters, $key) SET seq = (seq ?? 0) + 1 RETURN VALUE seq")
                .bind(("counters", COUNTERS))
                .bind(("key", collection.as_str()))
                .await?
                .take(0)
        })
        .await?;

        let seq = seq.ok_or_else(|| StorageError::Database {
            message: format!("counter '{collection}' returned no value"),
        })?;
        debug!(%collection, seq, "minted id");
        Ok(seq)
    }

    /// Raise the counter to at least `id`, so a later [`next`](Self::next)
    /// never hands out an id a caller already used.
    pub async fn observe(&self, collection: Collection, id: Id) -> StorageResult<()> {
        let _guard = self.lock.lock().await;

        retry_conflicts(|| async {
            self.db
                .query(
                    "UPSERT type::thing($counters, $key) SET seq = math::max([seq ?? 0, $id]) RETURN NONE",
                )
                .bind(("counters", COUNTERS))
                .bind(("key", collection.as_str()))
                .bind(("id", id))
                .await?
                .check()
                .map(drop)
        })
        .await
    }

    /// Last id handed out for `collection`, 0 if none yet.
    pub async fn current(&self, collection: Collection) -> StorageResult<Id> {
        let mut response = self
            .db
            .query("SELECT VALUE seq FROM type::thing($counters, $key)")
            .bind(("counters", COUNTERS))
            .bind(("key", collection.as_str()))
            .await?;

        let seq: Option<Id> = response.take(0)?;
        Ok(seq.unwrap_or(0))
    }
}
