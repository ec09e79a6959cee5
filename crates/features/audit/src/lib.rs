//! # Status Audit Trail
//!
//! Append-only record of item status transitions. The only mutating
//! operation is [`AuditTrail::record`]; entries are immutable once written,
//! including after the underlying item is archived. Reads come back most
//! recent first.

mod error;

pub use crate::error::{AuditError, AuditErrorExt};

use chrono::Utc;
use rhub_database::HistoryStore;
use rhub_domain::{ItemStatus, StatusHistoryEntry};
use rhub_kernel::safe_nanoid;
use tracing::instrument;

/// Audit trail over a [`HistoryStore`] backend. Cloning shares the backend
/// handle.
#[derive(Debug, Clone)]
pub struct AuditTrail<H> {
    store: H,
}

impl<H: HistoryStore> AuditTrail<H> {
    pub const fn new(store: H) -> Self {
        Self { store }
    }

    /// Appends one status transition record stamped with the current time.
    ///
    /// Callers are responsible for passing the item's actual previous status;
    /// the trail records what it is told and never reconciles against the
    /// item row.
    #[instrument(level = "debug", skip_all, fields(item_id, %new_status))]
    pub async fn record(
        &self,
        item_id: &str,
        previous_status: ItemStatus,
        new_status: ItemStatus,
        changed_by: &str,
        notes: Option<String>,
    ) -> Result<StatusHistoryEntry, AuditError> {
        let entry = StatusHistoryEntry {
            id: safe_nanoid!(),
            item_id: item_id.to_string(),
            previous_status,
            new_status,
            changed_by_id: changed_by.to_string(),
            notes,
            changed_at: Utc::now(),
        };
        Ok(self.store.append_history(entry).await?)
    }

    /// All recorded transitions of an item, most recent first.
    pub async fn history(&self, item_id: &str) -> Result<Vec<StatusHistoryEntry>, AuditError> {
        self.store.history_for_item(item_id).await.context("Loading status history")
    }
}
