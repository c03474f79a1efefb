use bytes::Bytes;
use vault_blob::{BlobConfig, BlobName, BlobStore, LocalBlobStore, Removal};

#[tokio::test]
async fn open_creates_missing_directory_and_is_idempotent() {
    let tmp = tempfile::tempdir().unwrap();
    let config = BlobConfig::new(tmp.path().join("nested").join("uploads"));

    let store = LocalBlobStore::open(&config).await.unwrap();
    assert!(store.root().is_dir());
    assert!(store.root().is_absolute());

    // Second open over an existing directory is fine.
    LocalBlobStore::open(&config).await.unwrap();
}

#[tokio::test]
async fn open_fails_when_path_is_a_file() {
    let tmp = tempfile::tempdir().unwrap();
    let file = tmp.path().join("uploads");
    std::fs::write(&file, b"x").unwrap();

    assert!(LocalBlobStore::open(&BlobConfig::new(file)).await.is_err());
}

#[tokio::test]
async fn put_writes_bytes_under_generated_name() {
    let tmp = tempfile::tempdir().unwrap();
    let store = LocalBlobStore::open(&BlobConfig::new(tmp.path())).await.unwrap();

    let name = store.put("holiday.jpg", Bytes::from_static(b"jpeg-bytes")).await.unwrap();
    assert!(name.as_str().ends_with(".jpg"));

    let path = store.path(&name);
    assert!(path.starts_with(store.root()));
    assert_eq!(std::fs::read(path).unwrap(), b"jpeg-bytes");
}

#[tokio::test]
async fn same_original_name_gets_distinct_files() {
    let tmp = tempfile::tempdir().unwrap();
    let store = LocalBlobStore::open(&BlobConfig::new(tmp.path())).await.unwrap();

    let a = store.put("same.txt", Bytes::from_static(b"a")).await.unwrap();
    let b = store.put("same.txt", Bytes::from_static(b"b")).await.unwrap();

    assert_ne!(a, b);
    assert_eq!(std::fs::read(store.path(&a)).unwrap(), b"a");
    assert_eq!(std::fs::read(store.path(&b)).unwrap(), b"b");
}

#[tokio::test]
async fn delete_tolerates_missing_files() {
    let tmp = tempfile::tempdir().unwrap();
    let store = LocalBlobStore::open(&BlobConfig::new(tmp.path())).await.unwrap();

    let name = store.put("gone.bin", Bytes::from_static(b"1")).await.unwrap();
    assert_eq!(store.delete(&name).await.unwrap(), Removal::Removed);
    assert!(!store.path(&name).exists());
    assert_eq!(store.delete(&name).await.unwrap(), Removal::AlreadyAbsent);

    let never = BlobName::parse("1-1.bin").unwrap();
    assert_eq!(store.delete(&never).await.unwrap(), Removal::AlreadyAbsent);
}
