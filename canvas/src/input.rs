//! Pointer and keyboard vocabulary for the board.
//!
//! `Tool`, `Button` and `Modifiers` describe one raw event. `InputState` is
//! the gesture in progress and remembers where it started so the release
//! can emit a single persisted mutation. `UiState` holds the overlays
//! (context menu, delete confirmation) that live beside the gesture.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::{Deserialize, Serialize};

use crate::camera::{Camera, Point};
use crate::doc::ItemId;
use crate::hit::ResizeCorner;

/// Which tool is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    /// Pointer / selection tool (default).
    #[default]
    Select,
    /// Draw one rectangle container, then revert to `Select`.
    Rect,
}

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    /// Shift key is held.
    #[serde(default)]
    pub shift: bool,
    /// Ctrl key is held.
    #[serde(default)]
    pub ctrl: bool,
    /// Alt / Option key is held.
    #[serde(default)]
    pub alt: bool,
    /// Meta / Command key is held.
    #[serde(default)]
    pub meta: bool,
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

/// A keyboard key.
///
/// The inner string holds the key name as reported by the browser (e.g. `"Escape"`, `" "`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Key(pub String);

impl Key {
    #[must_use]
    pub fn is_escape(&self) -> bool {
        self.0 == "Escape"
    }

    #[must_use]
    pub fn is_enter(&self) -> bool {
        self.0 == "Enter"
    }

    #[must_use]
    pub fn is_space(&self) -> bool {
        self.0 == " " || self.0 == "Space"
    }

    /// The rectangle-tool toggle.
    #[must_use]
    pub fn is_rect_toggle(&self) -> bool {
        self.0.eq_ignore_ascii_case("r")
    }
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down).
    pub dy: f64,
}

/// Right-click menu anchored on an item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContextMenu {
    pub item_id: ItemId,
    pub screen: Point,
}

/// Persistent UI state visible to the renderer.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// Currently active drawing tool.
    pub tool: Tool,
    /// The space bar is held (space + primary drag pans).
    pub space_held: bool,
    /// Open context menu, if any.
    pub menu: Option<ContextMenu>,
    /// Item awaiting delete confirmation, if any.
    pub pending_delete: Option<ItemId>,
}

/// The single active interaction.
///
/// Each gesture variant carries the context needed to compute deltas from
/// the press and to emit final actions on pointer-up.
#[derive(Debug, Clone, Default)]
pub enum InputState {
    /// No interaction in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// The user is panning the canvas.
    Panning {
        /// Button that started the pan; only its release ends it.
        button: Button,
        /// Screen-space position of the press.
        anchor_screen: Point,
        /// Camera at the press; every move recomputes from here.
        anchor_camera: Camera,
    },
    /// The user is dragging out a new rectangle container.
    DrawingRect {
        /// World-space corner where the drag started.
        start_world: Point,
        /// World-space position of the pointer at the latest move.
        current_world: Point,
    },
    /// The user is moving an existing item.
    DraggingItem {
        /// Id of the item being dragged.
        id: ItemId,
        /// Screen-space position of the press.
        anchor_screen: Point,
        /// Item top-left at the press.
        orig: Point,
    },
    /// The user is resizing an item from its bottom-right handle.
    ResizingItem {
        /// Id of the item being resized.
        id: ItemId,
        /// Screen-space position of the press.
        anchor_screen: Point,
        /// Item width at the press.
        orig_width: f64,
        /// Item height at the press.
        orig_height: f64,
        /// Which handle is being dragged.
        corner: ResizeCorner,
    },
    /// A text note editor is open.
    EditingText {
        /// World-space top-left of the note.
        world: Point,
        /// The note being edited; `None` when creating a new one.
        item_id: Option<ItemId>,
        /// Current editor contents.
        draft: String,
        /// Rendered size of the edit surface, as last reported by the host.
        measured: Option<(f64, f64)>,
    },
    /// A rectangle title editor is open.
    EditingRectTitle {
        item_id: ItemId,
        draft: String,
    },
}

impl InputState {
    /// Whether this state tracks the pointer outside the canvas (window-level
    /// move/up listeners must be attached while it is active).
    #[must_use]
    pub fn captures_pointer(&self) -> bool {
        matches!(
            self,
            Self::Panning { .. } | Self::DrawingRect { .. } | Self::DraggingItem { .. } | Self::ResizingItem { .. }
        )
    }

    /// Button whose release ends the current pointer gesture.
    #[must_use]
    pub fn gesture_button(&self) -> Option<Button> {
        match self {
            Self::Panning { button, .. } => Some(*button),
            Self::DrawingRect { .. } | Self::DraggingItem { .. } | Self::ResizingItem { .. } => Some(Button::Primary),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_editing(&self) -> bool {
        matches!(self, Self::EditingText { .. } | Self::EditingRectTitle { .. })
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}
