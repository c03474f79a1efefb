use chrono::{SubsecRound, Utc};
use vault_core::{MediaId, MediaPatch, MediaStore, NewMedia};
use vault_sqlite::SqliteMediaStore;

async fn memory_store() -> SqliteMediaStore {
    SqliteMediaStore::connect("sqlite::memory:").await.unwrap()
}

fn new_media(title: &str, media_type: Option<&str>, is_private: bool) -> NewMedia {
    NewMedia {
        title: title.to_string(),
        media_type: media_type.map(str::to_string),
        url: format!("/uploads/{title}.bin"),
        is_private,
        created_at: Utc::now().trunc_subsecs(3),
    }
}

#[tokio::test]
async fn insert_then_find_by_id_round_trips_every_field() {
    let store = memory_store().await;
    let media = new_media("cat", Some("photo"), true);

    let id = store.insert(media.clone()).await.unwrap();
    let found = store.find_by_id(&id).await.unwrap().unwrap();

    assert_eq!(found, media.into_record(id));
    assert!(store.find_by_id(&MediaId::new()).await.unwrap().is_none());
}

#[tokio::test]
async fn lists_keep_insertion_order_and_filter_private() {
    let store = memory_store().await;
    store.insert(new_media("a", None, false)).await.unwrap();
    store.insert(new_media("b", None, true)).await.unwrap();
    store.insert(new_media("c", None, false)).await.unwrap();

    let public: Vec<_> = store.find_public().await.unwrap().into_iter().map(|r| r.title).collect();
    assert_eq!(public, vec!["a", "c"]);

    let all: Vec<_> = store.find_all().await.unwrap().into_iter().map(|r| r.title).collect();
    assert_eq!(all, vec!["a", "b", "c"]);
}

#[tokio::test]
async fn empty_store_lists_nothing() {
    let store = memory_store().await;
    assert!(store.find_public().await.unwrap().is_empty());
    assert!(store.find_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn update_partial_merges_only_present_fields() {
    let store = memory_store().await;
    let id = store.insert(new_media("a", Some("photo"), true)).await.unwrap();

    let patch = MediaPatch {
        title: Some("B".to_string()),
        ..Default::default()
    };
    assert_eq!(store.update_partial(&id, &patch).await.unwrap(), 1);

    let rec = store.find_by_id(&id).await.unwrap().unwrap();
    assert_eq!(rec.title, "B");
    assert_eq!(rec.media_type.as_deref(), Some("photo"));
    assert!(rec.is_private);
    assert_eq!(rec.url, "/uploads/a.bin");

    let patch = MediaPatch {
        media_type: Some(None),
        is_private: Some(false),
        ..Default::default()
    };
    assert_eq!(store.update_partial(&id, &patch).await.unwrap(), 1);

    let rec = store.find_by_id(&id).await.unwrap().unwrap();
    assert_eq!(rec.title, "B");
    assert_eq!(rec.media_type, None);
    assert!(!rec.is_private);
}

#[tokio::test]
async fn empty_patch_still_matches() {
    let store = memory_store().await;
    let id = store.insert(new_media("a", None, false)).await.unwrap();

    assert_eq!(store.update_partial(&id, &MediaPatch::default()).await.unwrap(), 1);
    assert_eq!(store.update_partial(&MediaId::new(), &MediaPatch::default()).await.unwrap(), 0);
}

#[tokio::test]
async fn delete_by_id_reports_counts() {
    let store = memory_store().await;
    let id = store.insert(new_media("a", None, false)).await.unwrap();

    assert_eq!(store.delete_by_id(&id).await.unwrap(), 1);
    assert_eq!(store.delete_by_id(&id).await.unwrap(), 0);
    assert!(store.find_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn file_database_survives_reconnect() {
    let tmp = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", tmp.path().join("db").join("vault.db").display());

    let id = {
        let store = SqliteMediaStore::connect(&url).await.unwrap();
        let id = store.insert(new_media("kept", None, false)).await.unwrap();
        store.pool().close().await;
        id
    };

    let store = SqliteMediaStore::connect(&url).await.unwrap();
    let rec = store.find_by_id(&id).await.unwrap().unwrap();
    assert_eq!(rec.title, "kept");
}

#[tokio::test]
async fn connect_creates_missing_parent_directories() {
    let tmp = tempfile::tempdir().unwrap();
    let parent = tmp.path().join("data").join("nested");
    let url = format!("sqlite://{}", parent.join("vault.db").display());

    let store = SqliteMediaStore::connect(&url).await.unwrap();
    assert!(parent.is_dir());
    assert!(store.find_all().await.unwrap().is_empty());
}
