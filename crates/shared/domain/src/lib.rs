//! # Domain Models
//!
//! This crate contains pure domain types with minimal dependencies (`serde`,
//! `chrono`, `strum`). Keep it lean: no I/O, networking, or heavy logic, just
//! data and simple helpers.

pub mod config;
pub mod constants;
pub mod history;
pub mod item;
pub mod question;

pub use history::StatusHistoryEntry;
pub use item::{Category, Item, ItemImage, ItemStatus, ItemWithImages};
pub use question::{QuestionSpec, QuestionType, SecurityQuestion};
