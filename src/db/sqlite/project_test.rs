//! Tests for the SQLite project repository.

use crate::db::{Project, SqliteStorage, StorageAdapter};

async fn setup_db() -> SqliteStorage {
    SqliteStorage::in_memory()
        .await
        .expect("Failed to create in-memory database")
}

#[tokio::test(flavor = "multi_thread")]
async fn orphan_project_is_stored_with_null_client() {
    let db = setup_db().await;

    let project = db
        .upsert_project(Some(Project::new("Linux", None)))
        .await
        .expect("Insert should succeed");
    assert_eq!(project.client_id, None);

    let client_id: Option<i64> = sqlx::query_scalar("SELECT client_id FROM projects WHERE id = ?")
        .bind(project.id)
        .fetch_one(db.pool())
        .await
        .unwrap();
    assert_eq!(client_id, None);
}

#[tokio::test(flavor = "multi_thread")]
async fn client_reference_is_not_enforced() {
    let db = setup_db().await;

    let project = db
        .upsert_project(Some(Project::new("Fridge Firmware", Some(42))))
        .await
        .expect("Dangling client_id should be accepted");
    assert_eq!(project.client_id, Some(42));
}

#[tokio::test(flavor = "multi_thread")]
async fn update_can_clear_client_reference() {
    let db = setup_db().await;
    let project = db
        .upsert_project(Some(Project::new("Windows 3.11", Some(1))))
        .await
        .unwrap();

    let updated = db
        .upsert_project(Some(Project::new("Windows 3.11", None).with_id(project.id.unwrap())))
        .await
        .unwrap();
    assert_eq!(updated.client_id, None);
    assert_eq!(db.get_project(updated.id.unwrap()).await.unwrap(), updated);
}

#[tokio::test(flavor = "multi_thread")]
async fn projects_of_client_filters_by_reference() {
    let db = setup_db().await;
    for (name, client_id) in [("Windows", Some(1)), ("IKettleOs", Some(2)), ("XBox", Some(1))] {
        db.upsert_project(Some(Project::new(name, client_id)))
            .await
            .unwrap();
    }

    let names: Vec<String> = db
        .select_projects_of_client(1)
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(names, vec!["Windows", "XBox"]);
}
