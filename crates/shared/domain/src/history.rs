use crate::item::ItemStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One append-only record of a status transition.
///
/// Entries are immutable once written and survive the soft deletion of their
/// item. Entries for an item are totally ordered by `changed_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusHistoryEntry {
    pub id: String,
    pub item_id: String,
    pub previous_status: ItemStatus,
    pub new_status: ItemStatus,
    pub changed_by_id: String,
    pub notes: Option<String>,
    pub changed_at: DateTime<Utc>,
}
