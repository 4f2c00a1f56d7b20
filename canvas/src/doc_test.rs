#![allow(clippy::float_cmp)]

use serde_json::json;
use time::Duration;

use super::*;

fn at(seconds: i64) -> OffsetDateTime {
    OffsetDateTime::UNIX_EPOCH + Duration::seconds(seconds)
}

fn text_item(body: &str, created: i64) -> Item {
    Item {
        id: Uuid::new_v4(),
        x: 0.0,
        y: 0.0,
        width: 150.0,
        height: 40.0,
        body: ItemBody::Text { body: body.into() },
        created_at: at(created),
    }
}

fn rect_item(title: Option<&str>, created: i64) -> Item {
    Item {
        id: Uuid::new_v4(),
        x: 0.0,
        y: 0.0,
        width: 300.0,
        height: 300.0,
        body: ItemBody::Rectangle { title: title.map(str::to_string) },
        created_at: at(created),
    }
}

fn file_item(created: i64) -> Item {
    Item {
        id: Uuid::new_v4(),
        x: 0.0,
        y: 0.0,
        width: 200.0,
        height: 150.0,
        body: ItemBody::File { url: "https://cdn.test/files/1-a.png".into(), file_name: "a.png".into() },
        created_at: at(created),
    }
}

// =============================================================
// ItemKind
// =============================================================

#[test]
fn item_kind_parse_round_trips_wire_names() {
    for kind in [ItemKind::File, ItemKind::Text, ItemKind::Rectangle] {
        assert_eq!(ItemKind::parse(kind.as_str()), Some(kind));
    }
}

#[test]
fn item_kind_parse_rejects_unknown() {
    assert_eq!(ItemKind::parse("sticky"), None);
    assert_eq!(ItemKind::parse("Rectangle"), None);
}

// =============================================================
// ItemBody
// =============================================================

#[test]
fn body_content_per_kind() {
    assert_eq!(file_item(0).body.content(), Some("https://cdn.test/files/1-a.png"));
    assert_eq!(text_item("hello", 0).body.content(), Some("hello"));
    assert_eq!(rect_item(Some("Ideas"), 0).body.content(), Some("Ideas"));
    assert_eq!(rect_item(None, 0).body.content(), None);
}

#[test]
fn body_set_content_empty_clears_rectangle_title() {
    let mut body = ItemBody::Rectangle { title: Some("old".into()) };
    body.set_content("");
    assert_eq!(body, ItemBody::Rectangle { title: None });
}

#[test]
fn body_set_content_keeps_empty_text() {
    let mut body = ItemBody::Text { body: "x".into() };
    body.set_content("");
    assert_eq!(body, ItemBody::Text { body: String::new() });
}

// =============================================================
// Serde wire format
// =============================================================

#[test]
fn item_serializes_type_and_content_flat() {
    let item = file_item(0);
    let value = serde_json::to_value(&item).unwrap();
    assert_eq!(value["type"], "file");
    assert_eq!(value["content"], "https://cdn.test/files/1-a.png");
    assert_eq!(value["file_name"], "a.png");
    assert_eq!(value["created_at"], "1970-01-01T00:00:00Z");
}

#[test]
fn item_deserializes_rectangle_with_null_content() {
    let value = json!({
        "id": "00000000-0000-0000-0000-000000000001",
        "type": "rectangle",
        "x": 1.0, "y": 2.0, "width": 30.0, "height": 40.0,
        "content": null,
        "created_at": "2024-05-01T10:00:00Z",
    });
    let item: Item = serde_json::from_value(value).unwrap();
    assert_eq!(item.kind(), ItemKind::Rectangle);
    assert_eq!(item.body, ItemBody::Rectangle { title: None });
}

#[test]
fn item_deserialize_rejects_unknown_type() {
    let value = json!({
        "id": "00000000-0000-0000-0000-000000000001",
        "type": "sticky",
        "x": 0.0, "y": 0.0, "width": 1.0, "height": 1.0,
        "content": "x",
        "created_at": "2024-05-01T10:00:00Z",
    });
    assert!(serde_json::from_value::<Item>(value).is_err());
}

#[test]
fn partial_item_skips_absent_fields() {
    let partial = PartialItem::position(Point::new(5.0, 6.0));
    let value = serde_json::to_value(&partial).unwrap();
    assert_eq!(value, json!({"x": 5.0, "y": 6.0}));
}

// =============================================================
// Bounds
// =============================================================

#[test]
fn bounds_from_corners_normalizes() {
    let b = Bounds::from_corners(Point::new(200.0, 150.0), Point::new(10.0, 10.0));
    assert_eq!(b, Bounds { x: 10.0, y: 10.0, width: 190.0, height: 140.0 });
}

#[test]
fn bounds_contains_is_inclusive() {
    let b = Bounds { x: 0.0, y: 0.0, width: 300.0, height: 300.0 };
    assert!(b.contains(Point::new(0.0, 0.0)));
    assert!(b.contains(Point::new(300.0, 300.0)));
    assert!(b.contains(Point::new(150.0, 150.0)));
    assert!(!b.contains(Point::new(300.1, 150.0)));
    assert!(!b.contains(Point::new(-0.1, 150.0)));
}

// =============================================================
// ItemStore
// =============================================================

#[test]
fn store_new_is_empty() {
    let store = ItemStore::new();
    assert!(store.is_empty());
    assert_eq!(store.len(), 0);
}

#[test]
fn store_insert_appends_and_replaces() {
    let mut store = ItemStore::new();
    let mut a = text_item("a", 0);
    store.insert(a.clone());
    store.insert(text_item("b", 1));
    assert_eq!(store.len(), 2);

    a.x = 99.0;
    store.insert(a.clone());
    assert_eq!(store.len(), 2);
    assert_eq!(store.get(&a.id).unwrap().x, 99.0);
}

#[test]
fn store_remove_returns_item() {
    let mut store = ItemStore::new();
    let a = text_item("a", 0);
    store.insert(a.clone());
    assert_eq!(store.remove(&a.id).map(|i| i.id), Some(a.id));
    assert!(store.remove(&a.id).is_none());
}

#[test]
fn store_apply_partial_updates_geometry_and_content() {
    let mut store = ItemStore::new();
    let a = text_item("a", 0);
    store.insert(a.clone());
    let ok = store.apply_partial(
        &a.id,
        &PartialItem { x: Some(1.0), width: Some(250.0), content: Some("new".into()), ..Default::default() },
    );
    assert!(ok);
    let item = store.get(&a.id).unwrap();
    assert_eq!(item.x, 1.0);
    assert_eq!(item.y, 0.0);
    assert_eq!(item.width, 250.0);
    assert_eq!(item.body, ItemBody::Text { body: "new".into() });
}

#[test]
fn store_apply_partial_missing_is_false() {
    let mut store = ItemStore::new();
    assert!(!store.apply_partial(&Uuid::new_v4(), &PartialItem::size(1.0, 1.0)));
}

#[test]
fn store_apply_partial_never_changes_kind() {
    let mut store = ItemStore::new();
    let r = rect_item(Some("t"), 0);
    store.insert(r.clone());
    store.apply_partial(&r.id, &PartialItem { content: Some("renamed".into()), ..Default::default() });
    assert_eq!(store.get(&r.id).unwrap().kind(), ItemKind::Rectangle);
}

#[test]
fn store_load_snapshot_replaces_existing() {
    let mut store = ItemStore::new();
    store.insert(text_item("old", 0));
    store.load_snapshot(vec![text_item("a", 1), text_item("b", 2)]);
    assert_eq!(store.len(), 2);
}

#[test]
fn render_order_puts_rectangles_first() {
    let mut store = ItemStore::new();
    let note = text_item("first", 0);
    let rect = rect_item(None, 10);
    store.insert(note.clone());
    store.insert(rect.clone());
    let order: Vec<ItemId> = store.render_order().iter().map(|i| i.id).collect();
    assert_eq!(order, vec![rect.id, note.id]);
}

#[test]
fn render_order_sorts_each_tier_by_created_at() {
    let mut store = ItemStore::new();
    let r_late = rect_item(None, 5);
    let r_early = rect_item(None, 1);
    let f_late = file_item(9);
    let t_early = text_item("t", 2);
    for item in [r_late.clone(), f_late.clone(), r_early.clone(), t_early.clone()] {
        store.insert(item);
    }
    let order: Vec<ItemId> = store.render_order().iter().map(|i| i.id).collect();
    assert_eq!(order, vec![r_early.id, r_late.id, t_early.id, f_late.id]);
}

#[test]
fn render_order_ties_keep_insertion_order() {
    let mut store = ItemStore::new();
    let a = text_item("a", 3);
    let b = text_item("b", 3);
    store.insert(a.clone());
    store.insert(b.clone());
    let order: Vec<ItemId> = store.render_order().iter().map(|i| i.id).collect();
    assert_eq!(order, vec![a.id, b.id]);
}

#[test]
fn new_item_into_item_keeps_payload() {
    let draft = NewItem {
        x: 1.0,
        y: 2.0,
        width: 3.0,
        height: 4.0,
        body: ItemBody::Rectangle { title: None },
    };
    let id = Uuid::new_v4();
    let item = draft.into_item(id, at(7));
    assert_eq!(item.id, id);
    assert_eq!(item.created_at, at(7));
    assert_eq!(item.bounds(), Bounds { x: 1.0, y: 2.0, width: 3.0, height: 4.0 });
}
