//! Storage traits consumed by the feature crates.
//!
//! The in-memory [`Database`](crate::Database) engine implements all three
//! traits; a durable SQL backend would implement the same surface. Writes are
//! last-write-wins, concurrent callers are serialized by the engine.

use chrono::{DateTime, Utc};
use rhub_domain::{Item, ItemImage, ItemStatus, ItemWithImages, SecurityQuestion, StatusHistoryEntry};

use crate::error::DatabaseError;

/// Persistence for items and their image rows.
pub trait ItemStore {
    /// Inserts a new item together with its image rows.
    ///
    /// Fails with [`DatabaseError::Conflict`] when the item id is already
    /// taken or two images share a `display_order`.
    fn insert_item(
        &self,
        item: Item,
        images: Vec<ItemImage>,
    ) -> impl Future<Output = Result<ItemWithImages, DatabaseError>> + Send;

    /// Fetches an item with its images, `None` when absent.
    fn fetch_item(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<Option<ItemWithImages>, DatabaseError>> + Send;

    /// Replaces the stored item row with `item` (matched by `item.id`).
    ///
    /// When `replace_images` is `Some`, the existing image rows are dropped
    /// and the given set takes their place; `None` leaves images untouched.
    fn update_item(
        &self,
        item: Item,
        replace_images: Option<Vec<ItemImage>>,
    ) -> impl Future<Output = Result<ItemWithImages, DatabaseError>> + Send;

    /// Sets the lifecycle status and `updated_at` of an existing item.
    ///
    /// Durable implementations must wrap this together with the matching
    /// [`HistoryStore::append_history`] call in one transaction so a status
    /// never changes without its audit entry.
    fn set_status(
        &self,
        id: &str,
        status: ItemStatus,
        updated_at: DateTime<Utc>,
    ) -> impl Future<Output = Result<(), DatabaseError>> + Send;
}

/// Persistence for encrypted security questions.
pub trait QuestionStore {
    /// Inserts a batch of question rows, all for the same item.
    fn insert_questions(
        &self,
        questions: Vec<SecurityQuestion>,
    ) -> impl Future<Output = Result<Vec<SecurityQuestion>, DatabaseError>> + Send;

    /// All questions of an item, ordered by `display_order` ascending.
    fn questions_for_item(
        &self,
        item_id: &str,
    ) -> impl Future<Output = Result<Vec<SecurityQuestion>, DatabaseError>> + Send;

    /// Removes every question of an item, returning the removed count.
    fn delete_questions_for_item(
        &self,
        item_id: &str,
    ) -> impl Future<Output = Result<u64, DatabaseError>> + Send;

    /// Removes one question by id, `false` when no such row existed.
    fn delete_question(&self, id: &str) -> impl Future<Output = Result<bool, DatabaseError>> + Send;

    /// True when at least one question row exists for the item.
    fn has_questions(
        &self,
        item_id: &str,
    ) -> impl Future<Output = Result<bool, DatabaseError>> + Send;
}

/// Append-only persistence for status change records.
///
/// There is deliberately no update or delete operation on this surface;
/// recorded entries are immutable.
pub trait HistoryStore {
    /// Appends one status change record.
    fn append_history(
        &self,
        entry: StatusHistoryEntry,
    ) -> impl Future<Output = Result<StatusHistoryEntry, DatabaseError>> + Send;

    /// All recorded changes of an item, most recent first.
    fn history_for_item(
        &self,
        item_id: &str,
    ) -> impl Future<Output = Result<Vec<StatusHistoryEntry>, DatabaseError>> + Send;
}
