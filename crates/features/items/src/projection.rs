//! Pure privacy projection of items for different audiences.
//!
//! Nothing here touches storage or crypto; the projector only reshapes data
//! it is handed. The decrypted questions an admin caller may pass in are the
//! output of [`rhub_verification::AnswerStore::questions_with_answers`].

use chrono::{DateTime, Utc};
use rhub_domain::{ItemImage, ItemStatus, ItemWithImages};
use rhub_verification::DecryptedQuestion;
use serde::Serialize;

/// Who is asking for the item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    /// Staff: every field verbatim, hide flags ignored.
    Admin,
    /// Anonymous browsing: hidden fields nulled, questions never present.
    Public,
}

/// An item shaped for one audience.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category_id: Option<String>,
    pub keywords: Vec<String>,
    /// `None` for public views of items with `hide_location` set.
    pub location: Option<String>,
    /// `None` for public views of items with `hide_date_found` set.
    pub date_found: Option<DateTime<Utc>>,
    pub status: ItemStatus,
    pub images: Vec<ItemImage>,
    pub created_by_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Only ever present for [`Audience::Admin`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub questions: Option<Vec<DecryptedQuestion>>,
}

/// Projects an item for the given audience.
///
/// Total over the 2x2 matrix of `{hide_location, hide_date_found}`: every
/// combination yields a view, never an error. For [`Audience::Public`] the
/// `questions` argument is discarded no matter what was passed.
#[must_use]
pub fn project(
    stored: &ItemWithImages,
    questions: Option<Vec<DecryptedQuestion>>,
    audience: Audience,
) -> ItemView {
    let item = &stored.item;

    let (location, date_found, questions) = match audience {
        Audience::Admin => (Some(item.location.clone()), Some(item.date_found), questions),
        Audience::Public => (
            (!item.hide_location).then(|| item.location.clone()),
            (!item.hide_date_found).then_some(item.date_found),
            None,
        ),
    };

    ItemView {
        id: item.id.clone(),
        name: item.name.clone(),
        description: item.description.clone(),
        category_id: item.category_id.clone(),
        keywords: item.keywords.clone(),
        location,
        date_found,
        status: item.status,
        images: stored.images.clone(),
        created_by_id: item.created_by_id.clone(),
        created_at: item.created_at,
        updated_at: item.updated_at,
        questions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rhub_domain::{Item, QuestionType};

    fn stored(hide_location: bool, hide_date_found: bool) -> ItemWithImages {
        let now = Utc::now();
        ItemWithImages {
            item: Item {
                id: "item-1".to_string(),
                name: "Silver watch".to_string(),
                description: "Found on platform 4".to_string(),
                category_id: Some("cat-1".to_string()),
                keywords: vec!["watch".to_string()],
                location: "Platform 4".to_string(),
                date_found: now,
                status: ItemStatus::Unclaimed,
                hide_location,
                hide_date_found,
                created_by_id: "staff-1".to_string(),
                created_at: now,
                updated_at: now,
            },
            images: Vec::new(),
        }
    }

    fn decrypted() -> Vec<DecryptedQuestion> {
        vec![DecryptedQuestion {
            id: "q-1".to_string(),
            question_text: "Brand?".to_string(),
            question_type: QuestionType::FreeText,
            options: None,
            answer: "Tissot".to_string(),
            display_order: 0,
        }]
    }

    #[test]
    fn public_view_covers_the_full_flag_matrix() {
        for (hide_location, hide_date_found) in
            [(false, false), (false, true), (true, false), (true, true)]
        {
            let view = project(&stored(hide_location, hide_date_found), None, Audience::Public);
            assert_eq!(view.location.is_none(), hide_location);
            assert_eq!(view.date_found.is_none(), hide_date_found);
            // Everything else passes through regardless of the flags.
            assert_eq!(view.name, "Silver watch");
            assert_eq!(view.status, ItemStatus::Unclaimed);
        }
    }

    #[test]
    fn public_view_never_contains_questions() {
        let view = project(&stored(false, false), Some(decrypted()), Audience::Public);
        assert!(view.questions.is_none());

        let json = serde_json::to_string(&view).unwrap();
        assert!(!json.contains("questions"));
        assert!(!json.contains("Tissot"));
    }

    #[test]
    fn admin_view_ignores_hide_flags() {
        let view = project(&stored(true, true), None, Audience::Admin);
        assert_eq!(view.location.as_deref(), Some("Platform 4"));
        assert!(view.date_found.is_some());
    }

    #[test]
    fn admin_view_passes_questions_through() {
        let view = project(&stored(true, true), Some(decrypted()), Audience::Admin);
        assert_eq!(view.questions.unwrap()[0].answer, "Tissot");
    }
}
