use chrono::{Duration, Utc};
use rhub_database::{Database, DatabaseError, HistoryStore, ItemStore, QuestionStore};
use rhub_domain::{Item, ItemImage, ItemStatus, SecurityQuestion, StatusHistoryEntry};

fn item(id: &str) -> Item {
    let now = Utc::now();
    Item {
        id: id.to_string(),
        name: "Black umbrella".to_string(),
        description: "Left near the east entrance".to_string(),
        category_id: None,
        keywords: vec!["umbrella".to_string()],
        location: "East entrance".to_string(),
        date_found: now,
        status: ItemStatus::Unclaimed,
        hide_location: false,
        hide_date_found: false,
        created_by_id: "staff-1".to_string(),
        created_at: now,
        updated_at: now,
    }
}

fn image(id: &str, item_id: &str, display_order: u32) -> ItemImage {
    ItemImage {
        id: id.to_string(),
        item_id: item_id.to_string(),
        url: format!("/blobs/{id}.jpg"),
        deletion_key: format!("del-{id}"),
        filename: format!("{id}.jpg"),
        mime_type: "image/jpeg".to_string(),
        size_bytes: 1024,
        display_order,
    }
}

fn question(id: &str, item_id: &str, display_order: u32) -> SecurityQuestion {
    let now = Utc::now();
    SecurityQuestion {
        id: id.to_string(),
        item_id: item_id.to_string(),
        question_text: "What color is the handle?".to_string(),
        question_type: rhub_domain::QuestionType::FreeText,
        options: None,
        encrypted_answer: "00".to_string(),
        iv: "11".to_string(),
        auth_tag: "22".to_string(),
        display_order,
        created_by_id: "staff-1".to_string(),
        created_at: now,
        updated_at: now,
    }
}

fn history(id: &str, item_id: &str, new_status: ItemStatus, offset_secs: i64) -> StatusHistoryEntry {
    StatusHistoryEntry {
        id: id.to_string(),
        item_id: item_id.to_string(),
        previous_status: ItemStatus::Unclaimed,
        new_status,
        changed_by_id: "staff-1".to_string(),
        notes: None,
        changed_at: Utc::now() + Duration::seconds(offset_secs),
    }
}

#[tokio::test]
async fn insert_and_fetch_returns_images_in_display_order() {
    let db = Database::open();
    let images = vec![image("img-b", "item-1", 2), image("img-a", "item-1", 1)];
    db.insert_item(item("item-1"), images).await.unwrap();

    let stored = db.fetch_item("item-1").await.unwrap().unwrap();
    assert_eq!(stored.item.id, "item-1");
    let orders: Vec<u32> = stored.images.iter().map(|i| i.display_order).collect();
    assert_eq!(orders, vec![1, 2]);
}

#[tokio::test]
async fn fetch_missing_item_is_none() {
    let db = Database::open();
    assert!(db.fetch_item("nope").await.unwrap().is_none());
}

#[tokio::test]
async fn insert_duplicate_item_id_is_conflict() {
    let db = Database::open();
    db.insert_item(item("item-1"), Vec::new()).await.unwrap();
    let err = db.insert_item(item("item-1"), Vec::new()).await.unwrap_err();
    assert!(matches!(err, DatabaseError::Conflict { .. }));
}

#[tokio::test]
async fn insert_rejects_duplicate_image_order() {
    let db = Database::open();
    let images = vec![image("img-a", "item-1", 1), image("img-b", "item-1", 1)];
    let err = db.insert_item(item("item-1"), images).await.unwrap_err();
    assert!(matches!(err, DatabaseError::Conflict { .. }));
}

#[tokio::test]
async fn insert_rejects_foreign_image_rows() {
    let db = Database::open();
    let images = vec![image("img-a", "other-item", 1)];
    let err = db.insert_item(item("item-1"), images).await.unwrap_err();
    assert!(matches!(err, DatabaseError::Validation { .. }));
}

#[tokio::test]
async fn update_missing_item_is_not_found() {
    let db = Database::open();
    let err = db.update_item(item("ghost"), None).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn update_with_replacement_swaps_image_set() {
    let db = Database::open();
    db.insert_item(item("item-1"), vec![image("old", "item-1", 1)]).await.unwrap();

    let updated = db
        .update_item(item("item-1"), Some(vec![image("new", "item-1", 1)]))
        .await
        .unwrap();
    assert_eq!(updated.images.len(), 1);
    assert_eq!(updated.images[0].id, "new");
}

#[tokio::test]
async fn update_without_replacement_keeps_images() {
    let db = Database::open();
    db.insert_item(item("item-1"), vec![image("keep", "item-1", 1)]).await.unwrap();

    let mut patched = item("item-1");
    patched.name = "Renamed".to_string();
    let updated = db.update_item(patched, None).await.unwrap();
    assert_eq!(updated.item.name, "Renamed");
    assert_eq!(updated.images[0].id, "keep");
}

#[tokio::test]
async fn set_status_updates_row() {
    let db = Database::open();
    db.insert_item(item("item-1"), Vec::new()).await.unwrap();

    let stamp = Utc::now() + Duration::seconds(5);
    db.set_status("item-1", ItemStatus::Claimed, stamp).await.unwrap();

    let stored = db.fetch_item("item-1").await.unwrap().unwrap();
    assert_eq!(stored.item.status, ItemStatus::Claimed);
    assert_eq!(stored.item.updated_at, stamp);
}

#[tokio::test]
async fn set_status_on_missing_item_is_not_found() {
    let db = Database::open();
    let err = db.set_status("ghost", ItemStatus::Claimed, Utc::now()).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn questions_come_back_in_display_order() {
    let db = Database::open();
    db.insert_questions(vec![question("q-b", "item-1", 2), question("q-a", "item-1", 1)])
        .await
        .unwrap();

    let rows = db.questions_for_item("item-1").await.unwrap();
    let ids: Vec<&str> = rows.iter().map(|q| q.id.as_str()).collect();
    assert_eq!(ids, vec!["q-a", "q-b"]);
}

#[tokio::test]
async fn question_batch_must_target_one_item() {
    let db = Database::open();
    let err = db
        .insert_questions(vec![question("q-a", "item-1", 1), question("q-b", "item-2", 2)])
        .await
        .unwrap_err();
    assert!(matches!(err, DatabaseError::Validation { .. }));
}

#[tokio::test]
async fn duplicate_question_order_is_conflict() {
    let db = Database::open();
    db.insert_questions(vec![question("q-a", "item-1", 1)]).await.unwrap();
    let err = db.insert_questions(vec![question("q-b", "item-1", 1)]).await.unwrap_err();
    assert!(matches!(err, DatabaseError::Conflict { .. }));
}

#[tokio::test]
async fn delete_question_reports_presence() {
    let db = Database::open();
    db.insert_questions(vec![question("q-a", "item-1", 1)]).await.unwrap();

    assert!(db.delete_question("q-a").await.unwrap());
    assert!(!db.delete_question("q-a").await.unwrap());
    assert!(!db.has_questions("item-1").await.unwrap());
}

#[tokio::test]
async fn delete_questions_for_item_counts_rows() {
    let db = Database::open();
    db.insert_questions(vec![question("q-a", "item-1", 1), question("q-b", "item-1", 2)])
        .await
        .unwrap();

    assert_eq!(db.delete_questions_for_item("item-1").await.unwrap(), 2);
    assert_eq!(db.delete_questions_for_item("item-1").await.unwrap(), 0);
}

#[tokio::test]
async fn history_lists_most_recent_first() {
    let db = Database::open();
    db.append_history(history("h-1", "item-1", ItemStatus::Claimed, 0)).await.unwrap();
    db.append_history(history("h-2", "item-1", ItemStatus::Returned, 10)).await.unwrap();
    db.append_history(history("h-x", "other", ItemStatus::Archived, 20)).await.unwrap();

    let entries = db.history_for_item("item-1").await.unwrap();
    let ids: Vec<&str> = entries.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["h-2", "h-1"]);
}

#[tokio::test]
async fn cloned_handles_share_tables() {
    let db = Database::open();
    let other = db.clone();
    db.insert_item(item("item-1"), Vec::new()).await.unwrap();
    assert!(other.fetch_item("item-1").await.unwrap().is_some());
}
