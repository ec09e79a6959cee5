//! Write-path input types for the item service.

use chrono::{DateTime, Utc};
use rhub_domain::{ItemStatus, QuestionSpec};
use serde::{Deserialize, Serialize};

/// One image submitted for upload alongside an item write.
#[derive(Clone, Serialize, Deserialize)]
pub struct NewImage {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub content_type: String,
}

impl std::fmt::Debug for NewImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewImage")
            .field("bytes", &format_args!("{} bytes", self.bytes.len()))
            .field("filename", &self.filename)
            .field("content_type", &self.content_type)
            .finish()
    }
}

/// Everything needed to create an item. Status is not part of the draft; a
/// new item always starts `unclaimed`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemDraft {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub location: String,
    pub date_found: DateTime<Utc>,
    #[serde(default)]
    pub hide_location: bool,
    #[serde(default)]
    pub hide_date_found: bool,
    #[serde(default)]
    pub images: Vec<NewImage>,
    #[serde(default)]
    pub questions: Vec<QuestionSpec>,
}

/// Partial update for an item. `None` fields are left untouched; supplying
/// `images` replaces the whole image set.
///
/// `category_id` is nullable on the item itself, so the patch nests the
/// options: absent leaves it untouched, `Some(None)` clears it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "present_as_some")]
    pub category_id: Option<Option<String>>,
    #[serde(default)]
    pub keywords: Option<Vec<String>>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub date_found: Option<DateTime<Utc>>,
    #[serde(default)]
    pub hide_location: Option<bool>,
    #[serde(default)]
    pub hide_date_found: Option<bool>,
    #[serde(default)]
    pub images: Option<Vec<NewImage>>,
}

/// Wraps a present field in `Some` so a JSON `null` deserializes to
/// `Some(None)` instead of collapsing into the outer `None`.
fn present_as_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// A requested status transition, recorded in the audit trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusChange {
    pub status: ItemStatus,
    #[serde(default)]
    pub notes: Option<String>,
    pub changed_by: String,
}
