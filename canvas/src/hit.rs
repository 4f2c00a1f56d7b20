#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::camera::{Camera, Point};
use crate::consts::HANDLE_SIZE_PX;
use crate::doc::{Item, ItemId, ItemKind, ItemStore};

/// Which part of an item was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    Body,
    ResizeHandle(ResizeCorner),
}

/// Corner carrying a resize handle. Only the bottom-right corner is interactive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeCorner {
    Se,
}

/// Result of a hit test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub item_id: ItemId,
    pub part: HitPart,
}

/// Whether `item` shows a resize handle.
#[must_use]
pub fn is_resizable(item: &Item) -> bool {
    matches!(item.kind(), ItemKind::File | ItemKind::Rectangle)
}

/// Test which item (if any) is under `world_pt`.
///
/// Items are checked top-most first. An item's resize handle is tried before
/// its body, so a handle only wins when nothing drawn above it covers the point.
#[must_use]
pub fn hit_test(world_pt: Point, store: &ItemStore, camera: &Camera) -> Option<Hit> {
    let half = camera.screen_dist_to_world(HANDLE_SIZE_PX) / 2.0;

    store.render_order().into_iter().rev().find_map(|item| {
        if is_resizable(item) && hit_handle(world_pt, item, half) {
            Some(Hit { item_id: item.id, part: HitPart::ResizeHandle(ResizeCorner::Se) })
        } else if item.bounds().contains(world_pt) {
            Some(Hit { item_id: item.id, part: HitPart::Body })
        } else {
            None
        }
    })
}

fn hit_handle(world_pt: Point, item: &Item, half: f64) -> bool {
    let cx = item.x + item.width;
    let cy = item.y + item.height;
    (world_pt.x - cx).abs() <= half && (world_pt.y - cy).abs() <= half
}
