//! Board engine for the corkboard: an infinite pannable, zoomable surface of
//! notes, file cards and grouping rectangles.
//!
//! The crate builds for WebAssembly (the browser host wires DOM events into
//! [`engine::Engine`]) and natively (the headless host drives
//! [`engine::EngineCore`] directly). Input handlers never perform I/O; they
//! mutate local state optimistically and return [`engine::Action`]s for the
//! host to persist or show.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | `Engine` (browser) and the testable [`engine::EngineCore`] |
//! | [`doc`] | Item types, wire format and the in-memory [`doc::ItemStore`] |
//! | [`camera`] | Pan/zoom camera and screen/world conversions |
//! | [`input`] | Input event types and the interaction state machine |
//! | [`hit`] | Hit-testing against items and resize handles |
//! | [`group`] | Rectangle containment |
//! | [`render`] | Pure projection of the scene to a display list |
//! | [`paint`] | Draws a display list to a 2D context |
//! | [`consts`] | Shared numeric constants |

pub mod camera;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod group;
pub mod hit;
pub mod input;
pub mod paint;
pub mod render;
