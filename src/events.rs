//! Wire types for the headless driver: one JSON `InputEvent` per stdin line,
//! one JSON `Frame` per stdout line.
//!
//! Coordinates are screen pixels relative to the viewport's top-left corner.

use std::path::PathBuf;

use canvas::camera::{Camera, Point};
use canvas::engine::Action;
use canvas::input::{Button, Modifiers, Tool};
use canvas::render::DisplayList;
use serde::{Deserialize, Serialize};

use crate::notice::Notice;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    PointerDown {
        x: f64,
        y: f64,
        #[serde(default = "primary")]
        button: Button,
        #[serde(default)]
        modifiers: Modifiers,
    },
    PointerMove {
        x: f64,
        y: f64,
        #[serde(default)]
        modifiers: Modifiers,
    },
    PointerUp {
        x: f64,
        y: f64,
        #[serde(default = "primary")]
        button: Button,
        #[serde(default)]
        modifiers: Modifiers,
    },
    DoubleClick {
        x: f64,
        y: f64,
    },
    Wheel {
        x: f64,
        y: f64,
        #[serde(default)]
        dx: f64,
        dy: f64,
        #[serde(default)]
        modifiers: Modifiers,
    },
    KeyDown {
        key: String,
        #[serde(default)]
        modifiers: Modifiers,
    },
    KeyUp {
        key: String,
        #[serde(default)]
        modifiers: Modifiers,
    },
    /// The open editor's text changed; `width`/`height` are its rendered CSS size.
    Draft {
        text: String,
        width: Option<f64>,
        height: Option<f64>,
    },
    /// The open editor lost focus.
    Blur,
    /// A local file was dropped at `(x, y)`.
    DropFile {
        x: f64,
        y: f64,
        path: PathBuf,
    },
    MenuRename,
    MenuDelete,
    MenuDismiss,
    ConfirmDelete,
    CancelDelete,
    SetTool {
        tool: Tool,
    },
    Resize {
        width: f64,
        height: f64,
        #[serde(default = "unit_dpr")]
        dpr: f64,
    },
    /// Wait for all in-flight persistence to finish before answering.
    Settle,
}

fn primary() -> Button {
    Button::Primary
}

fn unit_dpr() -> f64 {
    1.0
}

impl InputEvent {
    /// Screen position carried by pointer-like events.
    #[must_use]
    pub fn screen(&self) -> Option<Point> {
        match *self {
            Self::PointerDown { x, y, .. }
            | Self::PointerMove { x, y, .. }
            | Self::PointerUp { x, y, .. }
            | Self::DoubleClick { x, y }
            | Self::Wheel { x, y, .. }
            | Self::DropFile { x, y, .. } => Some(Point::new(x, y)),
            _ => None,
        }
    }
}

/// Everything a viewer needs after one event.
#[derive(Debug, Serialize)]
pub struct Frame<'a> {
    pub camera: Camera,
    pub tool: Tool,
    pub display: DisplayList<'a>,
    /// Overlays raised since the last frame (editors, context menu, confirm dialog).
    pub overlays: Vec<Action>,
    /// File URLs opened since the last frame.
    pub opened: Vec<String>,
    pub notices: &'a [Notice],
    /// Persistence calls still in flight.
    pub pending: usize,
}

#[cfg(test)]
#[path = "events_test.rs"]
mod tests;
