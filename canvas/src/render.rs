//! Render projector: maps items and camera state to a screen-space display list.
//!
//! `project` is a pure function. It never touches the browser; drawing the
//! resulting [`DisplayList`] is [`crate::paint`]'s job, and the headless host
//! serializes it as-is.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use serde::Serialize;

use crate::camera::{Camera, Point};
use crate::consts::GRID_BASE_SPACING;
use crate::doc::{Bounds, Item, ItemStore};
use crate::input::InputState;

/// Axis-aligned rectangle in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScreenRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// One item placed on screen.
#[derive(Debug, Clone, Serialize)]
pub struct DisplayEntry<'a> {
    pub item: &'a Item,
    pub screen_x: f64,
    pub screen_y: f64,
    pub screen_width: f64,
    pub screen_height: f64,
}

/// Background dot-grid parameters, locked to world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DotGrid {
    /// Distance between dots in screen pixels.
    pub spacing: f64,
    /// Screen x of the first dot column, in `[0, spacing)`.
    pub offset_x: f64,
    /// Screen y of the first dot row, in `[0, spacing)`.
    pub offset_y: f64,
}

/// Everything needed to draw one frame.
#[derive(Debug, Clone, Serialize)]
pub struct DisplayList<'a> {
    /// Items bottom-first: rectangles, then everything else.
    pub entries: Vec<DisplayEntry<'a>>,
    pub grid: DotGrid,
    /// Dashed preview of a rectangle being drawn.
    pub preview: Option<ScreenRect>,
}

/// Project the scene for the given camera and viewport (CSS pixels).
#[must_use]
pub fn project<'a>(
    camera: &Camera,
    viewport_w: f64,
    viewport_h: f64,
    store: &'a ItemStore,
    input: &InputState,
) -> DisplayList<'a> {
    let center = Point::new(viewport_w * 0.5, viewport_h * 0.5);

    let entries = store
        .render_order()
        .into_iter()
        .map(|item| {
            let r = to_screen(camera, center, item.bounds());
            DisplayEntry {
                item,
                screen_x: r.x,
                screen_y: r.y,
                screen_width: r.width,
                screen_height: r.height,
            }
        })
        .collect();

    let preview = match input {
        InputState::DrawingRect { start_world, current_world } => {
            Some(to_screen(camera, center, Bounds::from_corners(*start_world, *current_world)))
        }
        _ => None,
    };

    DisplayList { entries, grid: dot_grid(camera, center), preview }
}

/// Dot-grid spacing and phase for the camera.
#[must_use]
pub fn dot_grid(camera: &Camera, center: Point) -> DotGrid {
    let spacing = GRID_BASE_SPACING * camera.zoom;
    let origin = camera.world_to_screen(Point::new(0.0, 0.0), center);
    DotGrid {
        spacing,
        offset_x: origin.x.rem_euclid(spacing),
        offset_y: origin.y.rem_euclid(spacing),
    }
}

fn to_screen(camera: &Camera, center: Point, bounds: Bounds) -> ScreenRect {
    let top_left = camera.world_to_screen(Point::new(bounds.x, bounds.y), center);
    ScreenRect {
        x: top_left.x,
        y: top_left.y,
        width: bounds.width * camera.zoom,
        height: bounds.height * camera.zoom,
    }
}
