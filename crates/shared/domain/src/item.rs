use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Lifecycle state of a found item.
///
/// Items are never physically deleted: removal is a transition to
/// [`ItemStatus::Archived`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, Default,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ItemStatus {
    #[default]
    Unclaimed,
    Claimed,
    Returned,
    Archived,
}

/// A found object registered in the system.
///
/// Every status transition on an item is accompanied by exactly one
/// [`StatusHistoryEntry`](crate::history::StatusHistoryEntry).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category_id: Option<String>,
    pub keywords: Vec<String>,
    pub location: String,
    pub date_found: DateTime<Utc>,
    pub status: ItemStatus,
    /// Privacy flag: null out `location` in the public projection.
    pub hide_location: bool,
    /// Privacy flag: null out `date_found` in the public projection.
    pub hide_date_found: bool,
    pub created_by_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An image attached to an item, stored in the external blob store.
///
/// Owned exclusively by one [`Item`]; `display_order` is unique per item and
/// index 0 is the primary image used in list views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemImage {
    pub id: String,
    pub item_id: String,
    pub url: String,
    /// Opaque key the blob store accepts for removal. Never exposed publicly.
    pub deletion_key: String,
    pub filename: String,
    pub mime_type: String,
    pub size_bytes: u64,
    pub display_order: u32,
}

/// An item row together with its owned image rows, ordered by
/// `display_order`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemWithImages {
    pub item: Item,
    pub images: Vec<ItemImage>,
}

/// Reference table entry for item categorization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub description: String,
}
