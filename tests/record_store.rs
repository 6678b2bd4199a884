use shiptrack::{FileStorage, MemoryStorage, RecordStore, StoreError, TaskPatch};
use uuid::Uuid;

fn file_store(dir: &tempfile::TempDir) -> RecordStore<FileStorage> {
    RecordStore::new(FileStorage::new(dir.path(), "todo-master-todos").unwrap())
}

#[tokio::test]
async fn created_record_round_trips_through_file() {
    let dir = tempfile::tempdir().unwrap();
    let store = file_store(&dir);
    let created = store.create(" Pallet 9 ", " to Rotterdam ").await.unwrap();

    // a fresh store over the same slot sees the same record
    let reopened = file_store(&dir);
    let listed = reopened.list().await;
    assert_eq!(listed.len(), 1);
    let found = reopened.get(created.id).await.unwrap();
    assert_eq!(found, created);
    assert_eq!(found.heading, "Pallet 9");
    assert_eq!(found.description, "to Rotterdam");
    assert!(!found.completed);
    assert_eq!(found.created_at, found.updated_at);
}

#[tokio::test]
async fn persisted_layout_is_a_json_array_with_iso_timestamps() {
    let dir = tempfile::tempdir().unwrap();
    let store = file_store(&dir);
    store.create("h", "d").await.unwrap();

    let raw = std::fs::read_to_string(dir.path().join("todo-master-todos.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let entry = &value.as_array().unwrap()[0];
    for key in ["id", "heading", "description", "completed", "createdAt", "updatedAt"] {
        assert!(entry.get(key).is_some(), "missing {key}");
    }
    let created_at = entry["createdAt"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(created_at).is_ok());
}

#[tokio::test]
async fn invalid_create_persists_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let store = file_store(&dir);
    for (heading, description) in [("", "x"), ("   ", "x"), ("x", "")] {
        assert!(matches!(
            store.create(heading, description).await,
            Err(StoreError::Validation { .. })
        ));
    }
    assert!(!dir.path().join("todo-master-todos.json").exists());
    assert!(store.list().await.is_empty());
}

#[tokio::test]
async fn complete_then_restore() {
    let store = RecordStore::new(MemoryStorage::new());
    let task = store.create("h", "d").await.unwrap();

    let done = store
        .update(task.id, TaskPatch::new().completed(true))
        .await
        .unwrap();
    assert!(done.completed);
    assert!(done.updated_at > task.updated_at);
    assert_eq!(store.completed().await, vec![done.clone()]);

    let restored = store.set_completed(task.id, false).await.unwrap();
    assert!(!restored.completed);
    assert!(restored.updated_at > done.updated_at);
    assert_eq!(store.active().await, vec![restored]);
}

#[tokio::test]
async fn unknown_update_leaves_collection_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let store = file_store(&dir);
    store.create("h", "d").await.unwrap();
    let before = store.list().await;

    let err = store
        .update(Uuid::new_v4(), TaskPatch::new().with_heading("x"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound { .. }));
    assert_eq!(store.list().await, before);
}

#[tokio::test]
async fn double_delete_is_a_no_op() {
    let dir = tempfile::tempdir().unwrap();
    let store = file_store(&dir);
    let task = store.create("h", "d").await.unwrap();

    store.delete(task.id).await.unwrap();
    store.delete(task.id).await.unwrap();
    assert!(store.list().await.iter().all(|t| t.id != task.id));

    // deleting from a slot that never existed also succeeds
    let empty = tempfile::tempdir().unwrap();
    file_store(&empty).delete(Uuid::new_v4()).await.unwrap();
}

#[tokio::test]
async fn repeated_list_is_stable() {
    let store = RecordStore::new(MemoryStorage::new());
    for i in 0..5 {
        store.create(&format!("h{i}"), "d").await.unwrap();
    }
    let first = store.list().await;
    assert_eq!(store.list().await, first);
    assert_eq!(store.list().await, first);
}

#[tokio::test]
async fn corrupt_file_lists_empty_and_recovers_on_write() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("todo-master-todos.json"), "[{\"id\":42}]").unwrap();
    let store = file_store(&dir);

    assert!(store.list().await.is_empty());
    assert!(matches!(
        store.read_collection().await,
        Err(StoreError::StorageRead(_))
    ));

    let task = store.create("fresh", "start").await.unwrap();
    assert_eq!(store.read_collection().await.unwrap(), vec![task]);
}
