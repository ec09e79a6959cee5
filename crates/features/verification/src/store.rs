//! Encrypted question persistence on top of a [`QuestionStore`] backend.

use crate::error::{VerificationError, VerificationErrorExt};
use chrono::Utc;
use rhub_database::QuestionStore;
use rhub_domain::constants::{MAX_QUESTION_OPTIONS, MIN_QUESTION_OPTIONS};
use rhub_domain::{QuestionSpec, QuestionType, SecurityQuestion};
use rhub_kernel::safe_nanoid;
use rhub_vault::Vault;
use tracing::{instrument, warn};

/// A transient decrypted projection of one stored question. Exists only in
/// memory on the admin verification path; the plaintext answer is never a
/// persisted field.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct DecryptedQuestion {
    pub id: String,
    pub question_text: String,
    pub question_type: QuestionType,
    pub options: Option<Vec<String>>,
    pub answer: String,
    pub display_order: u32,
}

/// Rejects malformed question specs before any encryption or write occurs.
///
/// # Errors
///
/// Returns [`VerificationError::Validation`] when a `multiple_choice` spec
/// carries fewer than 2 or more than 6 options (or none at all), or when a
/// `free_text` spec carries options.
pub fn validate_specs(specs: &[QuestionSpec]) -> Result<(), VerificationError> {
    for (idx, spec) in specs.iter().enumerate() {
        match spec.question_type {
            QuestionType::MultipleChoice => {
                let count = spec.options.as_ref().map_or(0, Vec::len);
                if !(MIN_QUESTION_OPTIONS..=MAX_QUESTION_OPTIONS).contains(&count) {
                    return Err(VerificationError::Validation {
                        message: format!(
                            "Question {idx}: multiple_choice requires {MIN_QUESTION_OPTIONS}-{MAX_QUESTION_OPTIONS} options, got {count}"
                        )
                        .into(),
                        context: None,
                    });
                }
            },
            QuestionType::FreeText => {
                if spec.options.is_some() {
                    return Err(VerificationError::Validation {
                        message: format!("Question {idx}: free_text must not carry options").into(),
                        context: None,
                    });
                }
            },
        }
    }
    Ok(())
}

/// Security answer store: encrypts on write, decrypts all-or-nothing on read.
///
/// Constructed with an explicit backend and vault so tests can substitute
/// either. Cloning shares both handles.
#[derive(Debug, Clone)]
pub struct AnswerStore<Q> {
    store: Q,
    vault: Vault,
}

impl<Q: QuestionStore> AnswerStore<Q> {
    pub const fn new(store: Q, vault: Vault) -> Self {
        Self { store, vault }
    }

    /// Encrypts each spec's answer and persists one record per spec.
    ///
    /// `display_order` defaults to the spec's position in the input list when
    /// not explicitly given. `options` is persisted only for
    /// `multiple_choice` rows. An empty spec list is a no-op returning an
    /// empty result.
    ///
    /// # Errors
    ///
    /// * [`VerificationError::Validation`] for malformed specs; nothing is
    ///   encrypted or written in that case.
    /// * [`VerificationError::Encryption`] when the vault rejects an answer
    ///   (missing or malformed key included).
    /// * [`VerificationError::Database`] when persistence fails.
    #[instrument(level = "debug", skip_all, fields(item_id, count = specs.len()))]
    pub async fn create_questions(
        &self,
        item_id: &str,
        specs: Vec<QuestionSpec>,
        created_by: &str,
    ) -> Result<Vec<SecurityQuestion>, VerificationError> {
        validate_specs(&specs)?;
        if specs.is_empty() {
            return Ok(Vec::new());
        }

        let now = Utc::now();
        let mut rows = Vec::with_capacity(specs.len());
        for (idx, spec) in specs.into_iter().enumerate() {
            let sealed = self
                .vault
                .encrypt(&spec.answer)
                .map_err(|source| VerificationError::Encryption { source, context: None })?;

            let options = match spec.question_type {
                QuestionType::MultipleChoice => spec.options,
                QuestionType::FreeText => None,
            };

            rows.push(SecurityQuestion {
                id: safe_nanoid!(),
                item_id: item_id.to_string(),
                question_text: spec.question_text,
                question_type: spec.question_type,
                options,
                encrypted_answer: sealed.ciphertext,
                iv: sealed.iv,
                auth_tag: sealed.auth_tag,
                display_order: spec.display_order.unwrap_or(idx as u32),
                created_by_id: created_by.to_string(),
                created_at: now,
                updated_at: now,
            });
        }

        Ok(self.store.insert_questions(rows).await?)
    }

    /// Full replace: deletes every existing record for the item, then runs
    /// [`Self::create_questions`] with the new list. An empty list leaves
    /// zero records. Recreated questions get fresh ids.
    #[instrument(level = "debug", skip_all, fields(item_id))]
    pub async fn replace_questions(
        &self,
        item_id: &str,
        specs: Vec<QuestionSpec>,
        changed_by: &str,
    ) -> Result<Vec<SecurityQuestion>, VerificationError> {
        // Validate up front so a bad spec list cannot wipe the existing set.
        validate_specs(&specs)?;
        self.store.delete_questions_for_item(item_id).await?;
        self.create_questions(item_id, specs, changed_by).await
    }

    /// All stored records for an item, ordered by `display_order` ascending,
    /// answers left encrypted.
    pub async fn questions(&self, item_id: &str) -> Result<Vec<SecurityQuestion>, VerificationError> {
        Ok(self.store.questions_for_item(item_id).await?)
    }

    /// Loads and decrypts every answer for an item.
    ///
    /// # Errors
    ///
    /// If any single record fails to decrypt the whole call fails with one
    /// opaque [`VerificationError::Retrieval`]; no partial list is returned
    /// and the failing record is not identified to the caller.
    #[instrument(level = "debug", skip_all, fields(item_id))]
    pub async fn questions_with_answers(
        &self,
        item_id: &str,
    ) -> Result<Vec<DecryptedQuestion>, VerificationError> {
        let rows = self.store.questions_for_item(item_id).await?;

        let mut decrypted = Vec::with_capacity(rows.len());
        for row in rows {
            let answer = match self.vault.decrypt_parts(&row.encrypted_answer, &row.iv, &row.auth_tag)
            {
                Ok(answer) => answer,
                Err(_) => {
                    warn!(item_id, "Security answer decryption failed");
                    return Err(VerificationError::Retrieval { context: None });
                },
            };
            decrypted.push(DecryptedQuestion {
                id: row.id,
                question_text: row.question_text,
                question_type: row.question_type,
                options: row.options,
                answer,
                display_order: row.display_order,
            });
        }

        Ok(decrypted)
    }

    /// Removes every question of an item. Idempotent; returns the removed
    /// count, zero included.
    pub async fn delete_questions(&self, item_id: &str) -> Result<u64, VerificationError> {
        self.store
            .delete_questions_for_item(item_id)
            .await
            .context("Deleting security questions")
    }

    /// Removes one question by id; `false` when nothing was there to delete.
    pub async fn delete_question(&self, id: &str) -> Result<bool, VerificationError> {
        Ok(self.store.delete_question(id).await?)
    }

    /// Existence check without decryption.
    pub async fn has_questions(&self, item_id: &str) -> Result<bool, VerificationError> {
        Ok(self.store.has_questions(item_id).await?)
    }
}
