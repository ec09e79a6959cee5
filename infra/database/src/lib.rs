//! # Database Infrastructure
//!
//! In-memory relational storage for items, their images, encrypted security
//! questions, and the append-only status history. Feature crates talk to the
//! [`ItemStore`], [`QuestionStore`], and [`HistoryStore`] traits; this crate
//! ships the reference engine behind them.
//!
//! ## Key Features
//! - **Cheap handles**: [`Database`] is an `Arc` wrapper, clone it freely
//!   across tasks.
//! - **Serialized writes**: a single `RwLock` over all tables gives
//!   last-write-wins semantics without torn reads.
//! - **Append-only history**: status records can be added and listed, never
//!   rewritten.
//!
//! ## Example
//!
//! ```rust
//! use rhub_database::{Database, HistoryStore};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), rhub_database::DatabaseError> {
//! let db = Database::open();
//! let entries = db.history_for_item("missing").await?;
//! assert!(entries.is_empty());
//! # Ok(())
//! # }
//! ```

mod error;
mod stores;

pub use error::{DatabaseError, DatabaseErrorExt};
pub use stores::{HistoryStore, ItemStore, QuestionStore};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use rhub_domain::{
    Item, ItemImage, ItemStatus, ItemWithImages, SecurityQuestion, StatusHistoryEntry,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{instrument, trace};

/// Raw table state guarded by the engine lock.
#[derive(Debug, Default)]
struct Tables {
    items: HashMap<String, Item>,
    /// Image rows keyed by owning item id.
    images: HashMap<String, Vec<ItemImage>>,
    /// Question rows keyed by owning item id.
    questions: HashMap<String, Vec<SecurityQuestion>>,
    /// Chronological append order; readers reverse for most-recent-first.
    history: Vec<StatusHistoryEntry>,
}

/// Inner state of the [`Database`] wrapper.
#[derive(Debug, Default)]
pub struct DatabaseInner {
    tables: RwLock<Tables>,
}

/// Storage engine handle that provides thread-safety and contextual error
/// handling. Cloning shares the same underlying tables.
#[derive(Debug, Clone, Default)]
pub struct Database {
    inner: Arc<DatabaseInner>,
}

impl Database {
    /// Opens a fresh, empty engine.
    #[must_use]
    pub fn open() -> Self {
        trace!("In-memory database engine opened");
        Self::default()
    }
}

/// Rejects image sets where two rows share a `display_order`.
fn check_image_orders(images: &[ItemImage]) -> Result<(), DatabaseError> {
    let mut seen = Vec::with_capacity(images.len());
    for image in images {
        if seen.contains(&image.display_order) {
            return Err(DatabaseError::Conflict {
                message: format!("Duplicate image display_order {}", image.display_order).into(),
                context: None,
            });
        }
        seen.push(image.display_order);
    }
    Ok(())
}

fn check_images_belong_to(images: &[ItemImage], item_id: &str) -> Result<(), DatabaseError> {
    if let Some(stray) = images.iter().find(|i| i.item_id != item_id) {
        return Err(DatabaseError::Validation {
            message: format!("Image '{}' does not belong to item '{item_id}'", stray.id).into(),
            context: None,
        });
    }
    Ok(())
}

fn sorted_images(tables: &Tables, item_id: &str) -> Vec<ItemImage> {
    let mut images = tables.images.get(item_id).cloned().unwrap_or_default();
    images.sort_by_key(|i| i.display_order);
    images
}

impl ItemStore for Database {
    #[instrument(level = "trace", skip_all, fields(item_id = %item.id))]
    async fn insert_item(
        &self,
        item: Item,
        images: Vec<ItemImage>,
    ) -> Result<ItemWithImages, DatabaseError> {
        check_image_orders(&images)?;
        check_images_belong_to(&images, &item.id)?;

        let mut tables = self.inner.tables.write();
        if tables.items.contains_key(&item.id) {
            return Err(DatabaseError::Conflict {
                message: format!("Item '{}' already exists", item.id).into(),
                context: None,
            });
        }
        tables.items.insert(item.id.clone(), item.clone());
        tables.images.insert(item.id.clone(), images);
        let images = sorted_images(&tables, &item.id);

        Ok(ItemWithImages { item, images })
    }

    async fn fetch_item(&self, id: &str) -> Result<Option<ItemWithImages>, DatabaseError> {
        let tables = self.inner.tables.read();
        Ok(tables.items.get(id).map(|item| ItemWithImages {
            item: item.clone(),
            images: sorted_images(&tables, id),
        }))
    }

    #[instrument(level = "trace", skip_all, fields(item_id = %item.id))]
    async fn update_item(
        &self,
        item: Item,
        replace_images: Option<Vec<ItemImage>>,
    ) -> Result<ItemWithImages, DatabaseError> {
        if let Some(images) = &replace_images {
            check_image_orders(images)?;
            check_images_belong_to(images, &item.id)?;
        }

        let mut tables = self.inner.tables.write();
        if !tables.items.contains_key(&item.id) {
            return Err(DatabaseError::NotFound {
                message: format!("Item '{}' does not exist", item.id).into(),
                context: None,
            });
        }
        tables.items.insert(item.id.clone(), item.clone());
        if let Some(images) = replace_images {
            tables.images.insert(item.id.clone(), images);
        }
        let images = sorted_images(&tables, &item.id);

        Ok(ItemWithImages { item, images })
    }

    #[instrument(level = "trace", skip(self, updated_at))]
    async fn set_status(
        &self,
        id: &str,
        status: ItemStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<(), DatabaseError> {
        let mut tables = self.inner.tables.write();
        let Some(item) = tables.items.get_mut(id) else {
            return Err(DatabaseError::NotFound {
                message: format!("Item '{id}' does not exist").into(),
                context: None,
            });
        };
        item.status = status;
        item.updated_at = updated_at;
        Ok(())
    }
}

impl QuestionStore for Database {
    #[instrument(level = "trace", skip_all, fields(count = questions.len()))]
    async fn insert_questions(
        &self,
        questions: Vec<SecurityQuestion>,
    ) -> Result<Vec<SecurityQuestion>, DatabaseError> {
        let Some(first) = questions.first() else {
            return Ok(Vec::new());
        };
        let item_id = first.item_id.clone();
        if let Some(stray) = questions.iter().find(|q| q.item_id != item_id) {
            return Err(DatabaseError::Validation {
                message: format!(
                    "Question '{}' targets item '{}', batch targets '{item_id}'",
                    stray.id, stray.item_id
                )
                .into(),
                context: None,
            });
        }

        let mut tables = self.inner.tables.write();
        let rows = tables.questions.entry(item_id).or_default();
        let mut seen: Vec<u32> = rows.iter().map(|q| q.display_order).collect();
        for question in &questions {
            if seen.contains(&question.display_order) {
                return Err(DatabaseError::Conflict {
                    message: format!(
                        "Duplicate question display_order {}",
                        question.display_order
                    )
                    .into(),
                    context: None,
                });
            }
            seen.push(question.display_order);
        }
        rows.extend(questions.iter().cloned());

        Ok(questions)
    }

    async fn questions_for_item(
        &self,
        item_id: &str,
    ) -> Result<Vec<SecurityQuestion>, DatabaseError> {
        let tables = self.inner.tables.read();
        let mut rows = tables.questions.get(item_id).cloned().unwrap_or_default();
        rows.sort_by_key(|q| q.display_order);
        Ok(rows)
    }

    #[instrument(level = "trace", skip(self))]
    async fn delete_questions_for_item(&self, item_id: &str) -> Result<u64, DatabaseError> {
        let mut tables = self.inner.tables.write();
        let removed = tables.questions.remove(item_id).map_or(0, |rows| rows.len());
        Ok(removed as u64)
    }

    #[instrument(level = "trace", skip(self))]
    async fn delete_question(&self, id: &str) -> Result<bool, DatabaseError> {
        let mut tables = self.inner.tables.write();
        for rows in tables.questions.values_mut() {
            if let Some(pos) = rows.iter().position(|q| q.id == id) {
                rows.remove(pos);
                return Ok(true);
            }
        }
        Ok(false)
    }

    async fn has_questions(&self, item_id: &str) -> Result<bool, DatabaseError> {
        let tables = self.inner.tables.read();
        Ok(tables.questions.get(item_id).is_some_and(|rows| !rows.is_empty()))
    }
}

impl HistoryStore for Database {
    #[instrument(level = "trace", skip_all, fields(item_id = %entry.item_id))]
    async fn append_history(
        &self,
        entry: StatusHistoryEntry,
    ) -> Result<StatusHistoryEntry, DatabaseError> {
        let mut tables = self.inner.tables.write();
        tables.history.push(entry.clone());
        Ok(entry)
    }

    async fn history_for_item(
        &self,
        item_id: &str,
    ) -> Result<Vec<StatusHistoryEntry>, DatabaseError> {
        let tables = self.inner.tables.read();
        let mut entries: Vec<_> =
            tables.history.iter().filter(|e| e.item_id == item_id).cloned().collect();
        // Entries land in chronological order, so a reverse yields
        // most-recent-first with ties broken by append order.
        entries.reverse();
        Ok(entries)
    }
}
