//! Containment resolver: items that travel with a dragged rectangle.
//!
//! Containment is geometric and recomputed on every drag-end. An item belongs
//! to a rectangle when its center lies inside the rectangle's pre-drag bounds.

#[cfg(test)]
#[path = "group_test.rs"]
mod group_test;

use crate::camera::Point;
use crate::doc::{Bounds, ItemId, ItemStore};

/// Ids of non-rectangle items whose center lies within `bounds` (inclusive).
#[must_use]
pub fn contained_in(store: &ItemStore, bounds: Bounds) -> Vec<ItemId> {
    store
        .iter()
        .filter(|item| !item.is_rectangle())
        .filter(|item| bounds.contains(item.bounds().center()))
        .map(|item| item.id)
        .collect()
}

/// Translate every item contained in `bounds` by `delta`.
///
/// Returns the new top-left position of each moved item.
pub fn move_contained(store: &mut ItemStore, bounds: Bounds, delta: Point) -> Vec<(ItemId, Point)> {
    let mut moved = Vec::new();
    for id in contained_in(store, bounds) {
        let Some(item) = store.get_mut(&id) else {
            continue;
        };
        item.x += delta.x;
        item.y += delta.y;
        moved.push((id, item.position()));
    }
    moved
}
