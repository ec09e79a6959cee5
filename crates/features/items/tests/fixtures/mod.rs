//! Test doubles for the item service: an in-memory blob engine with failure
//! injection, and a store wrapper that can fail specific relational writes.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rhub_blobs::{BlobError, BlobStore, StoredBlob};
use rhub_database::{Database, DatabaseError, HistoryStore, ItemStore, QuestionStore};
use rhub_domain::{
    Item, ItemImage, ItemStatus, ItemWithImages, SecurityQuestion, StatusHistoryEntry,
};
use rhub_items::{ItemDraft, NewImage};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

pub(crate) const KEY: &str = "cccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccc";

pub(crate) fn jpeg(name: &str) -> NewImage {
    NewImage {
        bytes: format!("bytes of {name}").into_bytes(),
        filename: format!("{name}.jpg"),
        content_type: "image/jpeg".to_string(),
    }
}

pub(crate) fn draft(name: &str, images: Vec<NewImage>) -> ItemDraft {
    ItemDraft {
        name: name.to_string(),
        description: "Found near the fountain".to_string(),
        category_id: None,
        keywords: vec!["test".to_string()],
        location: "Fountain square".to_string(),
        date_found: Utc::now(),
        hide_location: false,
        hide_date_found: false,
        images,
        questions: Vec::new(),
    }
}

fn injected_io() -> BlobError {
    BlobError::Io { source: std::io::Error::other("injected failure"), context: None }
}

#[derive(Debug, Default)]
struct BlobsInner {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
    uploads: AtomicUsize,
    deletes: AtomicUsize,
    /// Uploads fail once this many have succeeded.
    fail_uploads_after: Mutex<Option<usize>>,
    fail_deletes: AtomicBool,
}

/// In-memory [`BlobStore`] that counts traffic and injects failures.
#[derive(Debug, Clone, Default)]
pub(crate) struct MemoryBlobStore {
    inner: Arc<BlobsInner>,
}

impl MemoryBlobStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Let `n` uploads succeed, then fail every later one.
    pub(crate) fn fail_uploads_after(&self, n: usize) {
        *self.inner.fail_uploads_after.lock() = Some(n);
    }

    pub(crate) fn fail_deletes(&self, enable: bool) {
        self.inner.fail_deletes.store(enable, Ordering::SeqCst);
    }

    pub(crate) fn stored_count(&self) -> usize {
        self.inner.blobs.lock().len()
    }

    pub(crate) fn contains(&self, deletion_key: &str) -> bool {
        self.inner.blobs.lock().contains_key(deletion_key)
    }

    pub(crate) fn uploads(&self) -> usize {
        self.inner.uploads.load(Ordering::SeqCst)
    }

    pub(crate) fn deletes(&self) -> usize {
        self.inner.deletes.load(Ordering::SeqCst)
    }
}

impl BlobStore for MemoryBlobStore {
    async fn upload(&self, bytes: &[u8], content_type: &str) -> Result<StoredBlob, BlobError> {
        if let Some(limit) = *self.inner.fail_uploads_after.lock() {
            if self.inner.uploads.load(Ordering::SeqCst) >= limit {
                return Err(injected_io());
            }
        }
        let n = self.inner.uploads.fetch_add(1, Ordering::SeqCst);

        let ext = content_type.rsplit('/').next().unwrap_or("bin");
        let key = format!("blob-{n}.{ext}");
        self.inner.blobs.lock().insert(key.clone(), bytes.to_vec());
        Ok(StoredBlob { url: format!("/blobs/{key}"), deletion_key: key })
    }

    async fn delete(&self, deletion_key: &str) -> Result<(), BlobError> {
        self.inner.deletes.fetch_add(1, Ordering::SeqCst);
        if self.inner.fail_deletes.load(Ordering::SeqCst) {
            return Err(injected_io());
        }
        match self.inner.blobs.lock().remove(deletion_key) {
            Some(_) => Ok(()),
            None => Err(BlobError::BlobNotFound {
                message: deletion_key.to_string().into(),
                context: None,
            }),
        }
    }
}

fn injected_db() -> DatabaseError {
    DatabaseError::Internal { message: "injected failure".into(), context: None }
}

/// Wraps the in-memory [`Database`], failing the next flagged write.
#[derive(Debug, Clone, Default)]
pub(crate) struct FlakyStore {
    pub(crate) db: Database,
    fail_next_insert: Arc<AtomicBool>,
    fail_next_update: Arc<AtomicBool>,
}

impl FlakyStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn fail_next_insert(&self) {
        self.fail_next_insert.store(true, Ordering::SeqCst);
    }

    pub(crate) fn fail_next_update(&self) {
        self.fail_next_update.store(true, Ordering::SeqCst);
    }
}

impl ItemStore for FlakyStore {
    async fn insert_item(
        &self,
        item: Item,
        images: Vec<ItemImage>,
    ) -> Result<ItemWithImages, DatabaseError> {
        if self.fail_next_insert.swap(false, Ordering::SeqCst) {
            return Err(injected_db());
        }
        self.db.insert_item(item, images).await
    }

    async fn fetch_item(&self, id: &str) -> Result<Option<ItemWithImages>, DatabaseError> {
        self.db.fetch_item(id).await
    }

    async fn update_item(
        &self,
        item: Item,
        replace_images: Option<Vec<ItemImage>>,
    ) -> Result<ItemWithImages, DatabaseError> {
        if self.fail_next_update.swap(false, Ordering::SeqCst) {
            return Err(injected_db());
        }
        self.db.update_item(item, replace_images).await
    }

    async fn set_status(
        &self,
        id: &str,
        status: ItemStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<(), DatabaseError> {
        self.db.set_status(id, status, updated_at).await
    }
}

impl QuestionStore for FlakyStore {
    async fn insert_questions(
        &self,
        questions: Vec<SecurityQuestion>,
    ) -> Result<Vec<SecurityQuestion>, DatabaseError> {
        self.db.insert_questions(questions).await
    }

    async fn questions_for_item(
        &self,
        item_id: &str,
    ) -> Result<Vec<SecurityQuestion>, DatabaseError> {
        self.db.questions_for_item(item_id).await
    }

    async fn delete_questions_for_item(&self, item_id: &str) -> Result<u64, DatabaseError> {
        self.db.delete_questions_for_item(item_id).await
    }

    async fn delete_question(&self, id: &str) -> Result<bool, DatabaseError> {
        self.db.delete_question(id).await
    }

    async fn has_questions(&self, item_id: &str) -> Result<bool, DatabaseError> {
        self.db.has_questions(item_id).await
    }
}

impl HistoryStore for FlakyStore {
    async fn append_history(
        &self,
        entry: StatusHistoryEntry,
    ) -> Result<StatusHistoryEntry, DatabaseError> {
        self.db.append_history(entry).await
    }

    async fn history_for_item(
        &self,
        item_id: &str,
    ) -> Result<Vec<StatusHistoryEntry>, DatabaseError> {
        self.db.history_for_item(item_id).await
    }
}
