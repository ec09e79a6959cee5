//! # Item Lifecycle
//!
//! The write side of the lost-and-found inventory. [`ItemService`] couples
//! every relational item write to the blob engine holding its images:
//! uploads happen before the row write, and whichever side loses a partial
//! failure gets cleaned up best-effort so callers only ever observe a
//! committed write or the original error. Reads go through the pure
//! [`projection`] module, which shapes an item for its audience.
//!
//! ## Hard rules
//!
//! * A new item always starts `unclaimed`.
//! * Status changes always append an audit entry, archive included.
//! * Public projections never carry security questions, and honor the
//!   per-item `hide_location`/`hide_date_found` flags.

mod error;
pub mod projection;
mod service;
mod types;

pub use crate::error::{ItemError, ItemErrorExt};
pub use crate::projection::{Audience, ItemView, project};
pub use crate::service::ItemService;
pub use crate::types::{ItemDraft, ItemPatch, NewImage, StatusChange};
