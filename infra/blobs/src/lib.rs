//! A sandboxed filesystem engine for item images.
//! It provides the binary half of the item write path: uploads return a
//! public URL plus an opaque deletion key, and deletion by that key is the
//! only other operation. All examples use temporary directories to avoid
//! writing to the real filesystem.
//!
//! # Core Features
//!
//! - **Sandbox Security**: Strict path traversal protection using physical path canonicalization.
//! - **Atomic Writes**: Uses an "atomic swap" pattern (unique temp write + `fsync` + `rename`) to prevent data corruption during crashes.
//! - **Directory Sharding**: Generated blob names are spread across two shard levels to maintain filesystem performance.
//! - **Self-Healing**: Automatically identifies and cleans up orphaned temporary files during initialization.
//!
//! # Example
//!
//! ```rust
//! use rhub_blobs::{BlobStore, LocalBlobStore, BlobError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), BlobError> {
//!     // Use a temp directory for examples/tests
//!     # let tmp = tempfile::tempdir().unwrap();
//!     # let root = tmp.path().join("blobs");
//!     let blobs = LocalBlobStore::builder()
//!         .root(&root)
//!         .create(true)
//!         .base_url("/blobs")
//!         .connect()
//!         .await?;
//!
//!     let stored = blobs.upload(b"png bytes", "image/png").await?;
//!     assert!(stored.url.ends_with(".png"));
//!
//!     // The deletion key is the handle for compensation cleanup.
//!     blobs.delete(&stored.deletion_key).await?;
//!
//!     Ok(())
//! }
//! ```

mod builder;
mod engine;
mod error;
mod maintenance;
mod security;

pub use builder::BlobsBuilder;
pub use engine::{BlobStore, LocalBlobStore, StoredBlob};
pub use error::{BlobError, BlobErrorExt};
