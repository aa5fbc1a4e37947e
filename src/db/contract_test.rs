//! Behaviour every backend must share, run against both adapters.

use std::sync::Arc;
use std::time::Duration;

use crate::db::{
    Client, Project, SqliteStorage, StorageAdapter, StorageError, SurrealStorage,
};

/// Generate one test per backend for a contract check.
///
/// Checks listed after `spawned:` take the adapter behind an `Arc` so they can
/// drive it from several tasks.
macro_rules! contract_tests {
    ($($name:ident),* $(,)?; spawned: $($spawned:ident),* $(,)?) => {
        mod sqlite {
            $(
                #[tokio::test(flavor = "multi_thread")]
                async fn $name() {
                    let db = crate::db::SqliteStorage::in_memory().await.unwrap();
                    super::$name(&db).await;
                }
            )*
            $(
                #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
                async fn $spawned() {
                    let db = crate::db::SqliteStorage::in_memory().await.unwrap();
                    super::$spawned(std::sync::Arc::new(db)).await;
                }
            )*
        }

        mod surreal {
            $(
                #[tokio::test(flavor = "multi_thread")]
                async fn $name() {
                    let db = crate::db::SurrealStorage::in_memory().await.unwrap();
                    super::$name(&db).await;
                }
            )*
            $(
                #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
                async fn $spawned() {
                    let db = crate::db::SurrealStorage::in_memory().await.unwrap();
                    super::$spawned(std::sync::Arc::new(db)).await;
                }
            )*
        }
    };
}

contract_tests!(
    insert_assigns_sequential_ids,
    update_replaces_mutable_fields,
    upsert_with_unknown_id_inserts,
    minted_ids_skip_caller_supplied_ones,
    nil_entity_is_rejected,
    get_missing_is_not_found,
    delete_missing_is_not_found,
    delete_then_get_is_not_found,
    select_empty_is_not_found,
    select_returns_all_records,
    projects_of_client_filters_and_reports_empty;
    spawned:
    concurrent_inserts_get_consecutive_ids,
    concurrent_updates_of_distinct_records_all_succeed,
);

fn acme() -> Client {
    Client::new("Acme", Duration::from_secs(3600))
}

async fn insert_assigns_sequential_ids<A: StorageAdapter>(db: &A) {
    let first = db.upsert_client(Some(acme())).await.unwrap();
    assert_eq!(first, acme().with_id(1));

    let second = db.upsert_client(Some(acme())).await.unwrap();
    assert_eq!(second.id, Some(2));

    let project = db
        .upsert_project(Some(Project::new("Linux", None)))
        .await
        .unwrap();
    assert_eq!(project.id, Some(1), "ids are counted per entity type");
}

async fn update_replaces_mutable_fields<A: StorageAdapter>(db: &A) {
    let created = db.upsert_client(Some(acme())).await.unwrap();
    let id = created.id.unwrap();

    let updated = db
        .upsert_client(Some(Client::new("Acme Corp", Duration::from_secs(60)).with_id(id)))
        .await
        .unwrap();
    assert_eq!(updated.id, Some(id));
    assert_eq!(updated.name, "Acme Corp");
    assert_eq!(updated.settings.code_scan_interval, Duration::from_secs(60));
    assert_eq!(db.get_client(id).await.unwrap(), updated);

    let project = db
        .upsert_project(Some(Project::new("Windows", Some(id))))
        .await
        .unwrap();
    let moved = db
        .upsert_project(Some(Project::new("Windows 3.11", Some(7)).with_id(project.id.unwrap())))
        .await
        .unwrap();
    assert_eq!(moved.id, project.id);
    assert_eq!(moved.client_id, Some(7));
    assert_eq!(db.get_project(project.id.unwrap()).await.unwrap(), moved);
}

async fn upsert_with_unknown_id_inserts<A: StorageAdapter>(db: &A) {
    let client = db.upsert_client(Some(acme().with_id(42))).await.unwrap();
    assert_eq!(client.id, Some(42));
    assert_eq!(db.get_client(42).await.unwrap(), client);

    let project = db
        .upsert_project(Some(Project::new("Autopilot", Some(42)).with_id(6)))
        .await
        .unwrap();
    assert_eq!(db.get_project(6).await.unwrap(), project);
}

async fn minted_ids_skip_caller_supplied_ones<A: StorageAdapter>(db: &A) {
    db.upsert_client(Some(acme().with_id(5))).await.unwrap();

    let minted = db.upsert_client(Some(acme())).await.unwrap();
    assert!(minted.id.unwrap() > 5, "minted {:?}", minted.id);
    assert_eq!(db.select_clients().await.unwrap().len(), 2);
}

async fn nil_entity_is_rejected<A: StorageAdapter>(db: &A) {
    let err = db.upsert_client(None).await.unwrap_err();
    assert!(matches!(err, StorageError::NilEntity { entity: "client" }));

    let err = db.upsert_project(None).await.unwrap_err();
    assert!(matches!(err, StorageError::NilEntity { entity: "project" }));
}

async fn get_missing_is_not_found<A: StorageAdapter>(db: &A) {
    assert!(db.get_client(999).await.unwrap_err().is_not_found());
    assert!(db.get_project(999).await.unwrap_err().is_not_found());
}

async fn delete_missing_is_not_found<A: StorageAdapter>(db: &A) {
    assert!(db.delete_client(1).await.unwrap_err().is_not_found());
    assert!(db.delete_project(1).await.unwrap_err().is_not_found());
}

async fn delete_then_get_is_not_found<A: StorageAdapter>(db: &A) {
    db.upsert_project(Some(Project::new("User data seller", Some(4)).with_id(5)))
        .await
        .unwrap();

    db.delete_project(5).await.expect("Delete should succeed");
    assert!(db.get_project(5).await.unwrap_err().is_not_found());
    assert!(db.delete_project(5).await.unwrap_err().is_not_found());
}

async fn select_empty_is_not_found<A: StorageAdapter>(db: &A) {
    assert!(db.select_clients().await.unwrap_err().is_not_found());
    assert!(db.select_projects().await.unwrap_err().is_not_found());
}

async fn select_returns_all_records<A: StorageAdapter>(db: &A) {
    for name in ["Microsoft", "Apple", "Alphabet"] {
        db.upsert_client(Some(Client::new(name, Duration::from_secs(5000))))
            .await
            .unwrap();
    }

    let names: Vec<String> = db
        .select_clients()
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec!["Microsoft", "Apple", "Alphabet"]);

    db.upsert_project(Some(Project::new("Linux", None)))
        .await
        .unwrap();
    let projects = db.select_projects().await.unwrap();
    assert_eq!(projects, vec![Project::new("Linux", None).with_id(1)]);
}

async fn projects_of_client_filters_and_reports_empty<A: StorageAdapter>(db: &A) {
    for (name, client_id) in [
        ("Windows", Some(1)),
        ("IKettleOs", Some(2)),
        ("XBox Fridge Firmware", Some(1)),
        ("Linux", None),
    ] {
        db.upsert_project(Some(Project::new(name, client_id)))
            .await
            .unwrap();
    }

    let owned = db.select_projects_of_client(1).await.unwrap();
    assert_eq!(owned.len(), 2);
    assert!(owned.iter().all(|p| p.client_id == Some(1)));

    assert!(db.select_projects_of_client(3).await.unwrap_err().is_not_found());
}

const WRITERS: i64 = 16;

async fn concurrent_inserts_get_consecutive_ids<A: StorageAdapter + 'static>(db: Arc<A>) {
    let handles: Vec<_> = (0..WRITERS)
        .map(|_| {
            let db = Arc::clone(&db);
            tokio::spawn(async move {
                db.upsert_client(Some(acme())).await
            })
        })
        .collect();

    let mut ids = Vec::new();
    for handle in handles {
        let client = handle.await.unwrap().expect("every concurrent insert succeeds");
        ids.push(client.id.unwrap());
    }
    ids.sort_unstable();
    assert_eq!(ids, (1..=WRITERS).collect::<Vec<_>>());
}

async fn concurrent_updates_of_distinct_records_all_succeed<A: StorageAdapter + 'static>(
    db: Arc<A>,
) {
    for _ in 0..WRITERS {
        db.upsert_client(Some(acme())).await.unwrap();
    }

    let handles: Vec<_> = (1..=WRITERS)
        .map(|id| {
            let db = Arc::clone(&db);
            tokio::spawn(async move {
                let renamed = Client::new(format!("Acme {id}"), Duration::from_secs(60));
                db.upsert_client(Some(renamed.with_id(id))).await
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().expect("every concurrent update succeeds");
    }

    let clients = db.select_clients().await.unwrap();
    assert_eq!(clients.len(), WRITERS as usize);
    for client in clients {
        assert_eq!(client.name, format!("Acme {}", client.id.unwrap()));
        assert_eq!(client.settings.code_scan_interval, Duration::from_secs(60));
    }

    // Updates never advance the id counter.
    let next = db.upsert_client(Some(acme())).await.unwrap();
    assert_eq!(next.id, Some(WRITERS + 1));
}

#[tokio::test(flavor = "multi_thread")]
async fn backends_agree_on_stored_shape() {
    let sqlite = SqliteStorage::in_memory().await.unwrap();
    let surreal = SurrealStorage::in_memory().await.unwrap();

    let a = sqlite.upsert_client(Some(acme())).await.unwrap();
    let b = surreal.upsert_client(Some(acme())).await.unwrap();
    assert_eq!(a, b);

    let a = sqlite
        .upsert_project(Some(Project::new("Linux", Some(1))))
        .await
        .unwrap();
    let b = surreal
        .upsert_project(Some(Project::new("Linux", Some(1))))
        .await
        .unwrap();
    assert_eq!(a, b);
}
