use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Prompt style of a claimant-verification question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum QuestionType {
    MultipleChoice,
    FreeText,
}

/// A stored claimant-verification question for one item.
///
/// The expected answer only exists at rest as the `encrypted_answer`/`iv`/
/// `auth_tag` triple, always produced together by a single vault call. Mixing
/// the iv or auth tag from a different call fails decryption instead of
/// silently corrupting the record. Plaintext answers are never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityQuestion {
    pub id: String,
    pub item_id: String,
    pub question_text: String,
    pub question_type: QuestionType,
    /// Present iff `question_type` is [`QuestionType::MultipleChoice`].
    pub options: Option<Vec<String>>,
    /// Hex-encoded ciphertext of the expected answer.
    pub encrypted_answer: String,
    /// Hex-encoded 16-byte initialization vector (32 hex chars).
    pub iv: String,
    /// Hex-encoded 16-byte GCM authentication tag (32 hex chars).
    pub auth_tag: String,
    pub display_order: u32,
    pub created_by_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Caller-supplied specification for one question, before encryption.
///
/// `display_order` defaults to the entry's position in the submitted list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionSpec {
    pub question_text: String,
    pub question_type: QuestionType,
    #[serde(default)]
    pub options: Option<Vec<String>>,
    pub answer: String,
    #[serde(default)]
    pub display_order: Option<u32>,
}

impl QuestionSpec {
    /// Convenience constructor for a free-text question.
    #[must_use]
    pub fn free_text(question_text: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question_text: question_text.into(),
            question_type: QuestionType::FreeText,
            options: None,
            answer: answer.into(),
            display_order: None,
        }
    }

    /// Convenience constructor for a multiple-choice question.
    #[must_use]
    pub fn multiple_choice(
        question_text: impl Into<String>,
        options: Vec<String>,
        answer: impl Into<String>,
    ) -> Self {
        Self {
            question_text: question_text.into(),
            question_type: QuestionType::MultipleChoice,
            options: Some(options),
            answer: answer.into(),
            display_order: None,
        }
    }
}
