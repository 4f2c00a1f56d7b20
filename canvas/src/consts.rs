//! Shared numeric constants for the canvas crate.

// ── Camera ──────────────────────────────────────────────────────

/// Smallest allowed zoom factor (10%).
pub const ZOOM_MIN: f64 = 0.1;

/// Largest allowed zoom factor (500%).
pub const ZOOM_MAX: f64 = 5.0;

/// Zoom multiplier applied per wheel notch when zooming in.
pub const ZOOM_IN_FACTOR: f64 = 1.1;

/// Zoom multiplier applied per wheel notch when zooming out.
pub const ZOOM_OUT_FACTOR: f64 = 0.9;

// ── Gestures ────────────────────────────────────────────────────

/// Pointer travel in screen pixels below which a press-release is a click.
pub const CLICK_SLOP_PX: f64 = 5.0;

/// A drawn rectangle must exceed this size on both axes, in world units.
pub const MIN_DRAWN_RECT: f64 = 10.0;

/// Resize floor for width, in world units.
pub const RESIZE_MIN_WIDTH: f64 = 100.0;

/// Resize floor for height, in world units.
pub const RESIZE_MIN_HEIGHT: f64 = 60.0;

// ── Item defaults ───────────────────────────────────────────────

/// Default size of a dropped file card.
pub const FILE_DEFAULT_WIDTH: f64 = 200.0;
pub const FILE_DEFAULT_HEIGHT: f64 = 150.0;

/// Default (and minimum committed) size of a text note.
pub const TEXT_MIN_WIDTH: f64 = 150.0;
pub const TEXT_MIN_HEIGHT: f64 = 40.0;

/// Upper clamp for a text note measured from the edit surface.
pub const TEXT_MAX_WIDTH: f64 = 600.0;
pub const TEXT_MAX_HEIGHT: f64 = 400.0;

// ── Rendering / hit-testing ─────────────────────────────────────

/// Dot-grid spacing in world units at zoom 1.0.
pub const GRID_BASE_SPACING: f64 = 20.0;

/// Side of the square resize handle, in screen pixels.
pub const HANDLE_SIZE_PX: f64 = 8.0;
