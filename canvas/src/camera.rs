#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use serde::{Deserialize, Serialize};

use crate::consts::{ZOOM_IN_FACTOR, ZOOM_MAX, ZOOM_MIN, ZOOM_OUT_FACTOR};

/// A point in either screen or world space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Straight-line distance to `other`.
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Which way a wheel notch zooms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomDirection {
    In,
    Out,
}

impl ZoomDirection {
    #[must_use]
    pub fn factor(self) -> f64 {
        match self {
            Self::In => ZOOM_IN_FACTOR,
            Self::Out => ZOOM_OUT_FACTOR,
        }
    }
}

/// Camera state for pan/zoom on the infinite canvas.
///
/// `x` / `y` are the world-space coordinates of the point shown at the
/// viewport center. `zoom` is a scale factor (1.0 = no zoom), kept within
/// [`ZOOM_MIN`, `ZOOM_MAX`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub x: f64,
    pub y: f64,
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self { x: 0.0, y: 0.0, zoom: 1.0 }
    }
}

impl Camera {
    /// Convert a screen-space point (CSS pixels) to world coordinates.
    #[must_use]
    pub fn screen_to_world(&self, screen: Point, center: Point) -> Point {
        Point {
            x: (screen.x - center.x) / self.zoom + self.x,
            y: (screen.y - center.y) / self.zoom + self.y,
        }
    }

    /// Convert a world-space point to screen coordinates (CSS pixels).
    #[must_use]
    pub fn world_to_screen(&self, world: Point, center: Point) -> Point {
        Point {
            x: (world.x - self.x) * self.zoom + center.x,
            y: (world.y - self.y) * self.zoom + center.y,
        }
    }

    /// Convert a screen-space distance (pixels) to world-space distance.
    #[must_use]
    pub fn screen_dist_to_world(&self, screen_dist: f64) -> f64 {
        screen_dist / self.zoom
    }

    /// Camera after dragging the content by `screen_delta` pixels.
    ///
    /// Dragging content right moves the camera's reference point left, hence
    /// the subtraction.
    #[must_use]
    pub fn pan(&self, screen_delta: Point) -> Camera {
        Camera {
            x: self.x - screen_delta.x / self.zoom,
            y: self.y - screen_delta.y / self.zoom,
            zoom: self.zoom,
        }
    }

    /// Camera after one zoom step anchored at `anchor`.
    ///
    /// The world point under `anchor` is the same before and after.
    #[must_use]
    pub fn zoom_at(&self, anchor: Point, center: Point, direction: ZoomDirection) -> Camera {
        let zoom = (self.zoom * direction.factor()).clamp(ZOOM_MIN, ZOOM_MAX);
        let pinned = self.screen_to_world(anchor, center);
        Camera {
            x: pinned.x - (anchor.x - center.x) / zoom,
            y: pinned.y - (anchor.y - center.y) / zoom,
            zoom,
        }
    }
}
