#![allow(clippy::float_cmp)]

use time::OffsetDateTime;
use uuid::Uuid;

use super::*;
use crate::doc::{Item, ItemBody};

fn item(body: ItemBody, x: f64, y: f64, w: f64, h: f64) -> Item {
    Item {
        id: Uuid::new_v4(),
        x,
        y,
        width: w,
        height: h,
        body,
        created_at: OffsetDateTime::UNIX_EPOCH,
    }
}

fn note_centered_at(cx: f64, cy: f64) -> Item {
    item(ItemBody::Text { body: "n".into() }, cx - 50.0, cy - 20.0, 100.0, 40.0)
}

fn frame() -> Bounds {
    Bounds { x: 0.0, y: 0.0, width: 300.0, height: 300.0 }
}

#[test]
fn contained_uses_item_center() {
    let inside = note_centered_at(150.0, 150.0);
    let outside = note_centered_at(400.0, 400.0);
    // Overlaps the frame but its center does not.
    let straddling = note_centered_at(320.0, 150.0);
    let mut store = ItemStore::new();
    for i in [inside.clone(), outside, straddling] {
        store.insert(i);
    }
    assert_eq!(contained_in(&store, frame()), vec![inside.id]);
}

#[test]
fn contained_is_inclusive_on_edges() {
    let on_edge = note_centered_at(300.0, 0.0);
    let mut store = ItemStore::new();
    store.insert(on_edge.clone());
    assert_eq!(contained_in(&store, frame()), vec![on_edge.id]);
}

#[test]
fn contained_skips_rectangles() {
    let nested = item(ItemBody::Rectangle { title: None }, 10.0, 10.0, 50.0, 50.0);
    let mut store = ItemStore::new();
    store.insert(nested);
    assert!(contained_in(&store, frame()).is_empty());
}

#[test]
fn move_contained_translates_inside_only() {
    let inside = note_centered_at(150.0, 150.0);
    let outside = note_centered_at(400.0, 400.0);
    let mut store = ItemStore::new();
    store.insert(inside.clone());
    store.insert(outside.clone());

    let moved = move_contained(&mut store, frame(), Point::new(50.0, -20.0));

    assert_eq!(moved, vec![(inside.id, Point::new(inside.x + 50.0, inside.y - 20.0))]);
    let after = store.get(&inside.id).unwrap();
    assert_eq!((after.x, after.y), (inside.x + 50.0, inside.y - 20.0));
    let untouched = store.get(&outside.id).unwrap();
    assert_eq!((untouched.x, untouched.y), (outside.x, outside.y));
}

#[test]
fn move_contained_files_too() {
    let file = item(ItemBody::File { url: "u".into(), file_name: "f".into() }, 20.0, 20.0, 200.0, 150.0);
    let mut store = ItemStore::new();
    store.insert(file.clone());
    let moved = move_contained(&mut store, frame(), Point::new(1.0, 1.0));
    assert_eq!(moved.len(), 1);
    assert_eq!(store.get(&file.id).unwrap().x, 21.0);
}
