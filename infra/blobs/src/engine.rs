//! Core blob engine providing sandboxed, atomic image storage.
//!
//! This module contains the primary [`LocalBlobStore`] handle together with
//! the [`BlobStore`] trait the feature crates program against. The engine
//! manages the physical filesystem root, enforces the sandbox via path
//! resolution, and shards stored blobs across directories.

use crate::builder::BlobsBuilder;
use crate::error::{BlobError, BlobErrorExt};
use crate::maintenance;
use crate::security;
use rhub_kernel::safe_nanoid;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Length of generated blob names, before the extension.
const BLOB_NAME_LEN: usize = 21;

/// An uploaded blob as seen by callers: the public URL it is served under and
/// the opaque key required to remove it again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    pub url: String,
    pub deletion_key: String,
}

/// Binary storage consumed by the item write path.
///
/// Upload and deletion are the whole surface. Callers keep the returned
/// [`StoredBlob::deletion_key`] alongside their relational row; compensation
/// logic feeds it back into [`BlobStore::delete`].
pub trait BlobStore {
    /// Stores `bytes` and returns its public URL and deletion key.
    fn upload(
        &self,
        bytes: &[u8],
        content_type: &str,
    ) -> impl Future<Output = Result<StoredBlob, BlobError>> + Send;

    /// Removes a previously uploaded blob.
    fn delete(&self, deletion_key: &str) -> impl Future<Output = Result<(), BlobError>> + Send;
}

/// Maps an uploaded content type to the on-disk file extension.
fn extension_for(content_type: &str) -> Result<&'static str, BlobError> {
    match content_type {
        "image/jpeg" => Ok("jpg"),
        "image/png" => Ok("png"),
        "image/webp" => Ok("webp"),
        "image/gif" => Ok("gif"),
        "image/avif" => Ok("avif"),
        other => Err(BlobError::UnsupportedMediaType {
            message: other.to_string().into(),
            context: None,
        }),
    }
}

/// The internal shared state of a [`LocalBlobStore`] instance.
#[derive(Debug)]
pub struct BlobsInner {
    /// The canonicalized physical path on the disk where all blobs are stored.
    pub(crate) root: PathBuf,
    /// URL prefix under which stored blobs are served.
    pub(crate) base_url: String,
    /// A unique counter used to generate temporary file names.
    pub(crate) tmp_counter: AtomicU64,
}

/// A thread-safe handle to the filesystem blob engine.
///
/// `LocalBlobStore` provides a sandboxed directory where all resolved paths
/// are validated to prevent traversal attacks. Writes use an atomic swap
/// (unique temp file + `fsync` + rename) so a crash never leaves a partially
/// written blob behind, and stored names are sharded two directory levels
/// deep to keep any single directory small.
///
/// This handle is internally reference-counted (`Arc`) and can be cheaply
/// cloned across threads or tasks.
///
/// # Example
///
/// ```rust
/// use rhub_blobs::{BlobStore, LocalBlobStore, BlobError};
///
/// #[tokio::main]
/// async fn main() -> Result<(), BlobError> {
///     # let tmp = tempfile::tempdir().unwrap();
///     # let root = tmp.path().join("blobs");
///     let blobs = LocalBlobStore::builder()
///         .root(&root)
///         .base_url("/blobs")
///         .connect()
///         .await?;
///
///     let stored = blobs.upload(b"\xff\xd8\xff", "image/jpeg").await?;
///     assert!(stored.url.starts_with("/blobs/"));
///
///     blobs.delete(&stored.deletion_key).await?;
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    pub(crate) inner: Arc<BlobsInner>,
}

impl Deref for LocalBlobStore {
    type Target = BlobsInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl LocalBlobStore {
    #[must_use = "The blob engine is not initialized until you call .connect()"]
    pub fn builder() -> BlobsBuilder {
        BlobsBuilder::new()
    }

    /// Resolves a stored blob name to its sharded physical path on disk.
    ///
    /// # Errors
    ///
    /// Returns [`BlobError::PathTraversalAttempt`] if the name tries to
    /// escape the sandbox.
    pub fn resolve(&self, name: &str) -> Result<PathBuf, BlobError> {
        security::resolve_sharding(&self.root, name)
    }

    /// Checks whether a stored blob is present on disk.
    ///
    /// # Errors
    ///
    /// Returns an `Err` only if path resolution fails; a missing blob is
    /// `Ok(false)`.
    pub fn exists(&self, name: &str) -> Result<bool, BlobError> {
        Ok(self.resolve(name)?.exists())
    }

    /// Removes stale temporary files left behind by earlier crashes.
    pub async fn purge_tmp(&self) {
        maintenance::purge_tmp(&self.root).await;
    }

    /// Atomic swap write: unique temp file, `fsync`, rename over the target.
    async fn write_atomic(&self, resolved: &Path, data: &[u8]) -> Result<(), BlobError> {
        if let Some(parent) = resolved.parent() {
            fs::create_dir_all(parent)
                .await
                .context(format!("Failed to create shards for {}", resolved.display()))?;
        }

        let temp = unique_tmp_path(resolved, &self.tmp_counter);

        {
            let mut file = fs::OpenOptions::new()
                .create_new(true)
                .write(true)
                .open(&temp)
                .await
                .context(format!("Temp creation failed: {}", temp.display()))?;
            file.write_all(data).await.context("Write failed")?;
            file.sync_all().await.context("Hardware sync failed")?;
        }

        // Generated names are unique, but a collision still must not corrupt
        // an existing blob: fall back to remove-then-rename.
        if let Err(err) = fs::rename(&temp, &resolved).await {
            if err.kind() == std::io::ErrorKind::AlreadyExists {
                fs::remove_file(&resolved)
                    .await
                    .context(format!("Failed to replace existing file: {}", resolved.display()))?;
                fs::rename(&temp, &resolved).await.context(format!(
                    "Atomic swap failed: {} -> {}",
                    temp.display(),
                    resolved.display()
                ))?;
            } else {
                return Err(BlobError::Io {
                    source: err,
                    context: Some(
                        format!("Atomic swap failed: {} -> {}", temp.display(), resolved.display())
                            .into(),
                    ),
                });
            }
        }

        if let Some(parent) = resolved.parent() {
            Self::sync_dir(parent).await;
        }

        debug!(path = %resolved.display(), "Blob saved atomically");
        Ok(())
    }

    async fn sync_dir(path: &Path) {
        match fs::File::open(path).await {
            Ok(dir) => {
                if let Err(err) = dir.sync_all().await {
                    tracing::warn!(path = %path.display(), error = %err, "Directory sync failed");
                }
            },
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "Directory open failed");
            },
        }
    }
}

impl BlobStore for LocalBlobStore {
    async fn upload(&self, bytes: &[u8], content_type: &str) -> Result<StoredBlob, BlobError> {
        let ext = extension_for(content_type)?;
        let stored_name = format!("{}.{ext}", safe_nanoid!(BLOB_NAME_LEN));

        let resolved = security::resolve_sharding(&self.root, &stored_name)?;
        self.write_atomic(&resolved, bytes).await?;

        Ok(StoredBlob {
            url: format!("{}/{stored_name}", self.base_url),
            deletion_key: stored_name,
        })
    }

    async fn delete(&self, deletion_key: &str) -> Result<(), BlobError> {
        let resolved = security::resolve_sharding(&self.root, deletion_key)?;
        match fs::remove_file(&resolved).await {
            Ok(()) => {},
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(BlobError::BlobNotFound {
                    message: resolved.display().to_string().into(),
                    context: None,
                });
            },
            Err(err) => {
                return Err(BlobError::Io {
                    source: err,
                    context: Some(format!("Failed to delete: {}", resolved.display()).into()),
                });
            },
        }
        debug!(path = %resolved.display(), "Blob deleted");
        Ok(())
    }
}

fn unique_tmp_path(target: &Path, counter: &AtomicU64) -> PathBuf {
    let n = counter.fetch_add(1, Ordering::Relaxed);
    let file_name = target.file_name().and_then(|s| s.to_str()).unwrap_or("blob");
    target.with_file_name(format!("{file_name}{}{n}", maintenance::TMP_MARKER))
}
