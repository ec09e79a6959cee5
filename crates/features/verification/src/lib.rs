//! # Ownership Verification
//!
//! This crate stores the security questions a finder attaches to an item and
//! the encrypted answers a claimant must match. Answers never touch storage
//! in plaintext: every answer is sealed by [`rhub_vault::Vault`] on the way
//! in and only decrypted, all-or-nothing, on the admin read path.
//!
//! ## Semantics
//!
//! * **Replace, not patch**: [`AnswerStore::replace_questions`] deletes the
//!   whole existing set and recreates from the new specs. Old question ids do
//!   not survive an update.
//! * **Opaque retrieval failures**: if any stored answer fails to decrypt,
//!   [`AnswerStore::questions_with_answers`] reports one
//!   [`VerificationError::Retrieval`] with no per-record detail.

mod error;
mod store;

pub use crate::error::{VerificationError, VerificationErrorExt};
pub use crate::store::{AnswerStore, DecryptedQuestion, validate_specs};
