//! Item write orchestration across the relational store and the blob engine.

use crate::error::ItemError;
use crate::projection::{Audience, ItemView, project};
use crate::types::{ItemDraft, ItemPatch, NewImage, StatusChange};
use chrono::Utc;
use rhub_audit::AuditTrail;
use rhub_blobs::{BlobStore, StoredBlob};
use rhub_database::{HistoryStore, ItemStore, QuestionStore};
use rhub_domain::{Item, ItemImage, ItemStatus, ItemWithImages, StatusHistoryEntry};
use rhub_kernel::safe_nanoid;
use rhub_vault::Vault;
use rhub_verification::{AnswerStore, validate_specs};
use tracing::{instrument, warn};

/// Orchestrates item writes over two resources that cannot share a
/// transaction: the relational row set and the external blob engine.
///
/// Every mutation ends in one of two caller-visible outcomes. Either the
/// relational write committed, with stale blobs cleaned up best-effort, or
/// it failed, with freshly uploaded blobs compensated and the original error
/// surfaced. Asymmetries left behind by a failed cleanup are logged, never
/// escalated, so the primary error stays actionable.
///
/// Constructed per composition root with explicit collaborators; there is no
/// process-wide instance, so tests substitute a fake blob engine or a
/// failure-injecting store per test.
#[derive(Debug, Clone)]
pub struct ItemService<S, B> {
    store: S,
    blobs: B,
    answers: AnswerStore<S>,
    audit: AuditTrail<S>,
}

impl<S, B> ItemService<S, B>
where
    S: ItemStore + QuestionStore + HistoryStore + Clone + Send + Sync,
    B: BlobStore + Send + Sync,
{
    pub fn new(store: S, blobs: B, vault: Vault) -> Self {
        let answers = AnswerStore::new(store.clone(), vault);
        let audit = AuditTrail::new(store.clone());
        Self { store, blobs, answers, audit }
    }

    /// Security question management for this service's items.
    pub const fn answers(&self) -> &AnswerStore<S> {
        &self.answers
    }

    /// Status history reads.
    pub const fn audit(&self) -> &AuditTrail<S> {
        &self.audit
    }

    /// Creates an item, uploading its images first and attaching encrypted
    /// security questions last. A new item always starts
    /// [`ItemStatus::Unclaimed`].
    ///
    /// Question specs are validated before the first upload, so a malformed
    /// spec list costs no blob traffic. If the relational insert fails after
    /// uploads succeeded, every uploaded blob is deleted best-effort and the
    /// insert error is the one surfaced.
    #[instrument(level = "debug", skip_all, fields(name = %draft.name, images = draft.images.len()))]
    pub async fn create_item(
        &self,
        draft: ItemDraft,
        created_by: &str,
    ) -> Result<ItemWithImages, ItemError> {
        validate_specs(&draft.questions)?;

        let uploaded = self.upload_all(&draft.images).await?;

        let now = Utc::now();
        let item_id = safe_nanoid!();
        let item = Item {
            id: item_id.clone(),
            name: draft.name,
            description: draft.description,
            category_id: draft.category_id,
            keywords: draft.keywords,
            location: draft.location,
            date_found: draft.date_found,
            status: ItemStatus::Unclaimed,
            hide_location: draft.hide_location,
            hide_date_found: draft.hide_date_found,
            created_by_id: created_by.to_string(),
            created_at: now,
            updated_at: now,
        };
        let images = image_rows(&item_id, &draft.images, &uploaded);

        let stored = match self.store.insert_item(item, images).await {
            Ok(stored) => stored,
            Err(err) => {
                self.compensate(&uploaded).await;
                return Err(err.into());
            },
        };

        if !draft.questions.is_empty() {
            self.answers.create_questions(&item_id, draft.questions, created_by).await?;
        }

        Ok(stored)
    }

    /// Applies a partial update. When the patch carries images, the new set
    /// is uploaded first and the old blobs are deleted only after the
    /// relational update committed; a failed update instead compensates the
    /// new uploads and leaves the old blobs referenced by the unmodified row.
    ///
    /// No row locking: two concurrent updates of the same item race at the
    /// relational layer and the last write wins.
    #[instrument(level = "debug", skip_all, fields(id))]
    pub async fn update_item(
        &self,
        id: &str,
        patch: ItemPatch,
    ) -> Result<ItemWithImages, ItemError> {
        let current = self.require_item(id).await?;

        let new_images = match &patch.images {
            Some(images) => Some(self.upload_all(images).await?),
            None => None,
        };

        let mut item = current.item;
        if let Some(name) = patch.name {
            item.name = name;
        }
        if let Some(description) = patch.description {
            item.description = description;
        }
        if let Some(category_id) = patch.category_id {
            item.category_id = category_id;
        }
        if let Some(keywords) = patch.keywords {
            item.keywords = keywords;
        }
        if let Some(location) = patch.location {
            item.location = location;
        }
        if let Some(date_found) = patch.date_found {
            item.date_found = date_found;
        }
        if let Some(hide_location) = patch.hide_location {
            item.hide_location = hide_location;
        }
        if let Some(hide_date_found) = patch.hide_date_found {
            item.hide_date_found = hide_date_found;
        }
        item.updated_at = Utc::now();

        let replacement_rows = new_images
            .as_ref()
            .zip(patch.images.as_ref())
            .map(|(uploaded, submitted)| image_rows(id, submitted, uploaded));

        match self.store.update_item(item, replacement_rows).await {
            Ok(stored) => {
                // The update committed; the old blobs are now orphans.
                if new_images.is_some() {
                    let old_keys: Vec<String> =
                        current.images.iter().map(|i| i.deletion_key.clone()).collect();
                    self.delete_keys(&old_keys).await;
                }
                Ok(stored)
            },
            Err(err) => {
                if let Some(uploaded) = &new_images {
                    self.compensate(uploaded).await;
                }
                Err(err.into())
            },
        }
    }

    /// Transitions an item's status and appends the matching audit entry.
    ///
    /// The status write happens-before the audit insert, with no shared
    /// transaction between them; a crash in the gap leaves the status
    /// changed but unaudited.
    #[instrument(level = "debug", skip_all, fields(id, status = %change.status))]
    pub async fn update_status(
        &self,
        id: &str,
        change: StatusChange,
    ) -> Result<StatusHistoryEntry, ItemError> {
        let current = self.require_item(id).await?;
        let previous = current.item.status;

        self.store.set_status(id, change.status, Utc::now()).await?;

        let entry =
            self.audit.record(id, previous, change.status, &change.changed_by, change.notes).await?;

        Ok(entry)
    }

    /// Soft delete: archives the item through [`Self::update_status`] so the
    /// transition lands in the audit trail, then deletes its blobs
    /// best-effort. A failed blob cleanup does not undo the archival.
    #[instrument(level = "debug", skip_all, fields(id))]
    pub async fn archive_item(
        &self,
        id: &str,
        changed_by: &str,
        notes: Option<String>,
    ) -> Result<StatusHistoryEntry, ItemError> {
        let current = self.require_item(id).await?;

        let entry = self
            .update_status(
                id,
                StatusChange {
                    status: ItemStatus::Archived,
                    notes,
                    changed_by: changed_by.to_string(),
                },
            )
            .await?;

        let keys: Vec<String> = current.images.iter().map(|i| i.deletion_key.clone()).collect();
        self.delete_keys(&keys).await;

        Ok(entry)
    }

    /// Full-fidelity view for staff. With `include_answers` the decrypted
    /// security questions ride along; their retrieval failure fails the
    /// whole call.
    pub async fn admin_view(&self, id: &str, include_answers: bool) -> Result<ItemView, ItemError> {
        let stored = self.require_item(id).await?;
        let questions = if include_answers {
            Some(self.answers.questions_with_answers(id).await?)
        } else {
            None
        };
        Ok(project(&stored, questions, Audience::Admin))
    }

    /// Privacy-shaped view for anonymous callers. Never includes questions.
    pub async fn public_view(&self, id: &str) -> Result<ItemView, ItemError> {
        let stored = self.require_item(id).await?;
        Ok(project(&stored, None, Audience::Public))
    }

    async fn require_item(&self, id: &str) -> Result<ItemWithImages, ItemError> {
        self.store.fetch_item(id).await?.ok_or_else(|| ItemError::NotFound {
            message: format!("Item '{id}' does not exist").into(),
            context: None,
        })
    }

    /// Uploads images in submission order. A mid-batch failure deletes every
    /// blob that made it up before the failure point, then surfaces the
    /// upload error.
    async fn upload_all(&self, images: &[NewImage]) -> Result<Vec<StoredBlob>, ItemError> {
        let mut uploaded = Vec::with_capacity(images.len());
        for image in images {
            match self.blobs.upload(&image.bytes, &image.content_type).await {
                Ok(stored) => uploaded.push(stored),
                Err(err) => {
                    self.compensate(&uploaded).await;
                    return Err(err.into());
                },
            }
        }
        Ok(uploaded)
    }

    /// Best-effort removal of blobs whose relational write never landed.
    async fn compensate(&self, uploaded: &[StoredBlob]) {
        let keys: Vec<String> = uploaded.iter().map(|b| b.deletion_key.clone()).collect();
        self.delete_keys(&keys).await;
    }

    /// Deletes blobs, logging failures instead of raising them.
    async fn delete_keys(&self, keys: &[String]) {
        for key in keys {
            if let Err(err) = self.blobs.delete(key).await {
                warn!(deletion_key = %key, error = %err, "Blob cleanup failed");
            }
        }
    }
}

/// Pairs submitted images with their upload results into relational rows.
/// `display_order` follows submission order.
fn image_rows(item_id: &str, submitted: &[NewImage], uploaded: &[StoredBlob]) -> Vec<ItemImage> {
    submitted
        .iter()
        .zip(uploaded)
        .enumerate()
        .map(|(idx, (image, blob))| ItemImage {
            id: safe_nanoid!(),
            item_id: item_id.to_string(),
            url: blob.url.clone(),
            deletion_key: blob.deletion_key.clone(),
            filename: image.filename.clone(),
            mime_type: image.content_type.clone(),
            size_bytes: image.bytes.len() as u64,
            display_order: idx as u32,
        })
        .collect()
}
