use super::*;

#[test]
fn file_body_uses_both_columns() {
    let body = body_from_columns("file", Some("https://h/a.pdf".into()), Some("a.pdf".into())).unwrap();
    assert_eq!(body, ItemBody::File { url: "https://h/a.pdf".into(), file_name: "a.pdf".into() });
    assert_eq!(columns_for(&body), (Some("https://h/a.pdf"), Some("a.pdf")));
}

#[test]
fn text_body_with_null_content_is_empty() {
    let body = body_from_columns("text", None, None).unwrap();
    assert_eq!(body, ItemBody::Text { body: String::new() });
}

#[test]
fn rectangle_empty_title_reads_as_none() {
    assert_eq!(body_from_columns("rectangle", Some(String::new()), None).unwrap(), ItemBody::Rectangle { title: None });
    assert_eq!(
        body_from_columns("rectangle", Some("Sprint".into()), None).unwrap(),
        ItemBody::Rectangle { title: Some("Sprint".into()) }
    );
}

#[test]
fn rectangle_without_title_writes_null() {
    assert_eq!(columns_for(&ItemBody::Rectangle { title: None }), (None, None));
}

#[test]
fn unknown_type_is_rejected() {
    let err = body_from_columns("sticky", Some("x".into()), None).unwrap_err();
    assert!(matches!(err, PersistError::Validation(ref m) if m.contains("sticky")));
}

#[test]
fn row_maps_to_item() {
    let id = Uuid::new_v4();
    let row: ItemRow =
        (id, "text".into(), 1.0, 2.0, 150.0, 40.0, Some("hi".into()), None, OffsetDateTime::UNIX_EPOCH);
    let item = item_from_row(row).unwrap();
    assert_eq!(item.id, id);
    assert_eq!(item.position(), canvas::camera::Point::new(1.0, 2.0));
    assert_eq!(item.body, ItemBody::Text { body: "hi".into() });
}

#[tokio::test]
async fn memory_repository_lists_oldest_first() {
    use super::super::test_helpers::MemoryItems;

    let repo = MemoryItems::default();
    let first = repo
        .create_item(NewItem { x: 0.0, y: 0.0, width: 150.0, height: 40.0, body: ItemBody::Text { body: "a".into() } })
        .await
        .unwrap();
    repo.create_item(NewItem { x: 0.0, y: 0.0, width: 300.0, height: 300.0, body: ItemBody::Rectangle { title: None } })
        .await
        .unwrap();

    let listed = repo.list_items().await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, first.id);
}

#[tokio::test]
async fn memory_repository_update_of_unknown_id_is_noop() {
    use super::super::test_helpers::MemoryItems;

    let repo = MemoryItems::default();
    repo.update_item(Uuid::new_v4(), PartialItem::size(1.0, 1.0)).await.unwrap();
    assert!(repo.snapshot().is_empty());
}
