use rhub_blobs::*;
use tempfile::TempDir;

#[tokio::test]
async fn test_path_traversal_blocked() {
    let temp = TempDir::new().unwrap();

    let blobs = LocalBlobStore::builder().root(temp.path()).connect().await.unwrap();

    assert!(blobs.resolve("../etc/passwd").is_err());
    assert!(blobs.delete("../../etc/shadow").await.is_err());
}

#[tokio::test]
async fn test_upload_stores_bytes_on_disk() {
    let temp = TempDir::new().unwrap();
    let blobs = LocalBlobStore::builder().root(temp.path()).connect().await.unwrap();

    let payload = b"jpeg bytes";
    let stored = blobs.upload(payload, "image/jpeg").await.unwrap();

    assert!(blobs.exists(&stored.deletion_key).unwrap());
    let path = blobs.resolve(&stored.deletion_key).unwrap();
    assert_eq!(std::fs::read(path).unwrap(), payload);
}

#[tokio::test]
async fn test_url_reflects_base_and_extension() {
    let temp = TempDir::new().unwrap();
    let blobs = LocalBlobStore::builder()
        .root(temp.path())
        .base_url("/media/")
        .connect()
        .await
        .unwrap();

    let stored = blobs.upload(b"png", "image/png").await.unwrap();
    assert!(stored.url.starts_with("/media/"), "trailing slash must be collapsed");
    assert!(stored.url.ends_with(".png"));
    assert_eq!(stored.url, format!("/media/{}", stored.deletion_key));
}

#[tokio::test]
async fn test_stored_names_are_sharded() {
    let temp = TempDir::new().unwrap();
    let blobs = LocalBlobStore::builder().root(temp.path()).connect().await.unwrap();

    let stored = blobs.upload(b"x", "image/webp").await.unwrap();
    let resolved = blobs.resolve(&stored.deletion_key).unwrap();

    let relative = resolved.strip_prefix(temp.path().canonicalize().unwrap()).unwrap();
    // <aa>/<bb>/<name>.webp
    assert_eq!(relative.components().count(), 3);
}

#[tokio::test]
async fn test_delete_removes_blob() {
    let temp = TempDir::new().unwrap();
    let blobs = LocalBlobStore::builder().root(temp.path()).connect().await.unwrap();

    let stored = blobs.upload(b"x", "image/gif").await.unwrap();
    blobs.delete(&stored.deletion_key).await.unwrap();
    assert!(!blobs.exists(&stored.deletion_key).unwrap());
}

#[tokio::test]
async fn test_delete_missing_returns_blob_not_found() {
    let temp = TempDir::new().unwrap();
    let blobs = LocalBlobStore::builder().root(temp.path()).connect().await.unwrap();

    let err = blobs.delete("AbCdEfGh2345.jpg").await.expect_err("expected error");
    match err {
        BlobError::BlobNotFound { .. } => {},
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_unknown_content_type_rejected() {
    let temp = TempDir::new().unwrap();
    let blobs = LocalBlobStore::builder().root(temp.path()).connect().await.unwrap();

    let err = blobs.upload(b"x", "application/x-msdownload").await.expect_err("expected error");
    match err {
        BlobError::UnsupportedMediaType { .. } => {},
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_uploads_of_identical_bytes_get_distinct_keys() {
    let temp = TempDir::new().unwrap();
    let blobs = LocalBlobStore::builder().root(temp.path()).connect().await.unwrap();

    let a = blobs.upload(b"same", "image/jpeg").await.unwrap();
    let b = blobs.upload(b"same", "image/jpeg").await.unwrap();
    assert_ne!(a.deletion_key, b.deletion_key);
}
