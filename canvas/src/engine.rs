use serde::Serialize;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::camera::{Camera, Point, ZoomDirection};
use crate::consts::{
    CLICK_SLOP_PX, FILE_DEFAULT_HEIGHT, FILE_DEFAULT_WIDTH, MIN_DRAWN_RECT, RESIZE_MIN_HEIGHT, RESIZE_MIN_WIDTH,
    TEXT_MAX_HEIGHT, TEXT_MAX_WIDTH, TEXT_MIN_HEIGHT, TEXT_MIN_WIDTH,
};
use crate::doc::{Bounds, Item, ItemBody, ItemId, ItemKind, ItemStore, NewItem, PartialItem};
use crate::group;
use crate::hit::{self, Hit, HitPart};
use crate::input::{Button, ContextMenu, InputState, Key, Modifiers, Tool, UiState, WheelDelta};
use crate::paint;
use crate::render::{self, DisplayList};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum Action {
    /// Persist a new item; the host feeds the stored item back via `apply_create`.
    CreateItem(NewItem),
    /// Persist a partial update. Already applied locally.
    UpdateItem { id: ItemId, fields: PartialItem },
    /// Persist a delete. Already removed locally. `blob` names the backing
    /// object to remove first, for file items.
    DeleteItem { id: ItemId, blob: Option<String> },
    /// A file card was clicked.
    OpenFile { id: ItemId, url: String },
    /// Show the note editor at `screen` seeded with `text`.
    OpenTextEditor { item_id: Option<ItemId>, screen: Point, text: String },
    /// Show the rectangle title editor at `screen` seeded with `text`.
    OpenTitleEditor { item_id: ItemId, screen: Point, text: String },
    CloseEditor,
    ShowContextMenu { item_id: ItemId, screen: Point },
    HideContextMenu,
    /// Ask the user to confirm deleting `item_id`.
    ConfirmDelete { item_id: ItemId },
    /// Attach window-level pointer move/up tracking.
    CaptureStarted,
    /// Detach what `CaptureStarted` attached.
    CaptureEnded,
    SetCursor(String),
    RenderNeeded,
}

/// Engine state that does not touch the canvas element.
///
/// Separated from `Engine` so it can be tested without WASM/browser dependencies.
pub struct EngineCore {
    pub store: ItemStore,
    pub camera: Camera,
    pub ui: UiState,
    pub input: InputState,
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub dpr: f64,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self {
            store: ItemStore::new(),
            camera: Camera::default(),
            ui: UiState::default(),
            input: InputState::default(),
            viewport_width: 0.0,
            viewport_height: 0.0,
            dpr: 1.0,
        }
    }
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Data inputs ---

    /// Hydrate the store from a listing.
    pub fn load_snapshot(&mut self, items: Vec<Item>) {
        self.store.load_snapshot(items);
    }

    /// A create request came back from the collaborator with its identity.
    pub fn apply_create(&mut self, item: Item) {
        self.store.insert(item);
    }

    pub fn apply_update(&mut self, id: &ItemId, fields: &PartialItem) {
        self.store.apply_partial(id, fields);
    }

    /// Drop an item and anything that still refers to it.
    pub fn apply_delete(&mut self, id: &ItemId) -> Vec<Action> {
        let mut actions = Vec::new();
        self.store.remove(id);
        if self.ui.menu.is_some_and(|m| m.item_id == *id) {
            self.ui.menu = None;
            actions.push(Action::HideContextMenu);
        }
        if self.ui.pending_delete == Some(*id) {
            self.ui.pending_delete = None;
        }
        if self.active_item() == Some(*id) {
            let prev = self.transition(InputState::Idle, &mut actions);
            if prev.is_editing() {
                actions.push(Action::CloseEditor);
            }
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Build the create request for a file that finished uploading.
    #[must_use]
    pub fn place_file(&self, screen_pt: Point, file_name: &str, url: &str) -> Action {
        Self::place_file_at(self.screen_to_world(screen_pt), file_name, url)
    }

    /// Same as [`place_file`](Self::place_file) for a drop point already in world space.
    #[must_use]
    pub fn place_file_at(world: Point, file_name: &str, url: &str) -> Action {
        Action::CreateItem(NewItem {
            x: world.x,
            y: world.y,
            width: FILE_DEFAULT_WIDTH,
            height: FILE_DEFAULT_HEIGHT,
            body: ItemBody::File { url: url.to_string(), file_name: file_name.to_string() },
        })
    }

    // --- Viewport / tool ---

    /// Update viewport dimensions (CSS pixels) and device pixel ratio.
    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) {
        self.viewport_width = width_css;
        self.viewport_height = height_css;
        self.dpr = dpr;
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.ui.tool = tool;
    }

    // --- Queries ---

    #[must_use]
    pub fn camera(&self) -> Camera {
        self.camera
    }

    #[must_use]
    pub fn item(&self, id: &ItemId) -> Option<&Item> {
        self.store.get(id)
    }

    /// Whether window-level pointer tracking is currently attached.
    #[must_use]
    pub fn is_capturing(&self) -> bool {
        self.input.captures_pointer()
    }

    #[must_use]
    pub fn viewport_center(&self) -> Point {
        Point::new(self.viewport_width * 0.5, self.viewport_height * 0.5)
    }

    #[must_use]
    pub fn screen_to_world(&self, screen_pt: Point) -> Point {
        self.camera.screen_to_world(screen_pt, self.viewport_center())
    }

    #[must_use]
    pub fn display_list(&self) -> DisplayList<'_> {
        render::project(&self.camera, self.viewport_width, self.viewport_height, &self.store, &self.input)
    }

    // --- Pointer ---

    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button, _modifiers: Modifiers) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.ui.pending_delete.is_some() {
            return actions;
        }
        if self.ui.menu.take().is_some() {
            actions.push(Action::HideContextMenu);
        }
        if self.input.is_editing() {
            self.commit_into(&mut actions);
        }
        if !self.input.is_idle() {
            return actions;
        }

        let world = self.screen_to_world(screen_pt);
        let hit = hit::hit_test(world, &self.store, &self.camera);

        let pan = button == Button::Middle || (button == Button::Primary && hit.is_none() && self.ui.space_held);
        if pan {
            let next = InputState::Panning { button, anchor_screen: screen_pt, anchor_camera: self.camera };
            self.transition(next, &mut actions);
            actions.push(Action::SetCursor("grabbing".into()));
            return actions;
        }

        match (button, hit) {
            (Button::Primary, None) if self.ui.tool == Tool::Rect => {
                let next = InputState::DrawingRect { start_world: world, current_world: world };
                self.transition(next, &mut actions);
                actions.push(Action::SetCursor("crosshair".into()));
            }
            (Button::Primary, Some(Hit { item_id, part: HitPart::ResizeHandle(corner) })) => {
                if let Some(item) = self.store.get(&item_id) {
                    let next = InputState::ResizingItem {
                        id: item_id,
                        anchor_screen: screen_pt,
                        orig_width: item.width,
                        orig_height: item.height,
                        corner,
                    };
                    self.transition(next, &mut actions);
                    actions.push(Action::SetCursor("nwse-resize".into()));
                }
            }
            (Button::Primary, Some(Hit { item_id, part: HitPart::Body })) => {
                if let Some(item) = self.store.get(&item_id) {
                    let next = InputState::DraggingItem { id: item_id, anchor_screen: screen_pt, orig: item.position() };
                    self.transition(next, &mut actions);
                    actions.push(Action::SetCursor("move".into()));
                }
            }
            (Button::Secondary, Some(hit)) => {
                self.ui.menu = Some(ContextMenu { item_id: hit.item_id, screen: screen_pt });
                actions.push(Action::ShowContextMenu { item_id: hit.item_id, screen: screen_pt });
            }
            _ => {}
        }
        actions
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point, _modifiers: Modifiers) -> Vec<Action> {
        let world = self.screen_to_world(screen_pt);
        let zoom = self.camera.zoom;

        match self.input {
            InputState::Panning { anchor_screen, anchor_camera, .. } => {
                self.camera = anchor_camera.pan(delta(anchor_screen, screen_pt));
            }
            InputState::DrawingRect { ref mut current_world, .. } => {
                *current_world = world;
            }
            InputState::DraggingItem { id, anchor_screen, orig } => {
                self.store.set_position(&id, drag_position(orig, anchor_screen, screen_pt, zoom));
            }
            InputState::ResizingItem { id, anchor_screen, orig_width, orig_height, .. } => {
                let (w, h) = resize_size(orig_width, orig_height, anchor_screen, screen_pt, zoom);
                self.store.apply_partial(&id, &PartialItem::size(w, h));
            }
            _ => return Vec::new(),
        }
        vec![Action::RenderNeeded]
    }

    pub fn on_pointer_up(&mut self, screen_pt: Point, button: Button, _modifiers: Modifiers) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.input.gesture_button() != Some(button) {
            return actions;
        }
        let world = self.screen_to_world(screen_pt);
        let zoom = self.camera.zoom;
        let prev = self.transition(InputState::Idle, &mut actions);
        actions.push(Action::SetCursor("default".into()));

        match prev {
            InputState::DrawingRect { start_world, .. } => {
                self.ui.tool = Tool::Select;
                let bounds = Bounds::from_corners(start_world, world);
                if bounds.width > MIN_DRAWN_RECT && bounds.height > MIN_DRAWN_RECT {
                    actions.push(Action::CreateItem(NewItem {
                        x: bounds.x,
                        y: bounds.y,
                        width: bounds.width,
                        height: bounds.height,
                        body: ItemBody::Rectangle { title: None },
                    }));
                }
            }
            InputState::DraggingItem { id, anchor_screen, orig } => {
                if anchor_screen.distance(screen_pt) < CLICK_SLOP_PX {
                    self.store.set_position(&id, orig);
                    self.click_item(id, &mut actions);
                } else {
                    self.finish_drag(id, orig, drag_position(orig, anchor_screen, screen_pt, zoom), &mut actions);
                }
            }
            InputState::ResizingItem { id, anchor_screen, orig_width, orig_height, .. } => {
                let (w, h) = resize_size(orig_width, orig_height, anchor_screen, screen_pt, zoom);
                let fields = PartialItem::size(w, h);
                self.store.apply_partial(&id, &fields);
                actions.push(Action::UpdateItem { id, fields });
            }
            _ => {}
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    pub fn on_double_click(&mut self, screen_pt: Point) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.ui.pending_delete.is_some() || !self.input.is_idle() {
            return actions;
        }
        if self.ui.menu.take().is_some() {
            actions.push(Action::HideContextMenu);
        }

        let world = self.screen_to_world(screen_pt);
        match hit::hit_test(world, &self.store, &self.camera) {
            Some(hit) => match self.store.get(&hit.item_id).map(Item::kind) {
                Some(ItemKind::Text) => self.begin_text_edit(Some(hit.item_id), world, &mut actions),
                Some(ItemKind::Rectangle) => self.begin_title_edit(hit.item_id, &mut actions),
                Some(ItemKind::File) | None => {}
            },
            None => self.begin_text_edit(None, world, &mut actions),
        }
        actions
    }

    pub fn on_wheel(&mut self, screen_pt: Point, delta: WheelDelta, _modifiers: Modifiers) -> Vec<Action> {
        if delta.dy == 0.0 || self.ui.pending_delete.is_some() || self.input.captures_pointer() {
            return Vec::new();
        }
        let direction = if delta.dy > 0.0 { ZoomDirection::Out } else { ZoomDirection::In };
        self.camera = self.camera.zoom_at(screen_pt, self.viewport_center(), direction);
        vec![Action::RenderNeeded]
    }

    // --- Keyboard ---

    pub fn on_key_down(&mut self, key: Key, modifiers: Modifiers) -> Vec<Action> {
        let mut actions = Vec::new();

        if self.input.is_editing() {
            if key.is_escape() {
                return self.cancel_edit();
            }
            if key.is_enter() && !modifiers.shift {
                return self.commit_edit();
            }
            return actions;
        }

        if self.ui.pending_delete.is_some() {
            if key.is_escape() {
                self.cancel_delete();
            }
            return actions;
        }

        if key.is_space() {
            self.ui.space_held = true;
        } else if key.is_escape() {
            if self.ui.menu.take().is_some() {
                actions.push(Action::HideContextMenu);
            }
            if matches!(self.input, InputState::DrawingRect { .. }) {
                self.transition(InputState::Idle, &mut actions);
                actions.push(Action::SetCursor("default".into()));
                actions.push(Action::RenderNeeded);
            }
            self.ui.tool = Tool::Select;
        } else if key.is_rect_toggle() && self.input.is_idle() {
            self.ui.tool = match self.ui.tool {
                Tool::Select => Tool::Rect,
                Tool::Rect => Tool::Select,
            };
        }
        actions
    }

    pub fn on_key_up(&mut self, key: Key, _modifiers: Modifiers) -> Vec<Action> {
        if key.is_space() {
            self.ui.space_held = false;
        }
        Vec::new()
    }

    // --- Editors ---

    /// Record the editor's current contents and rendered size (CSS pixels).
    pub fn update_draft(&mut self, text: String, measured: Option<(f64, f64)>) {
        let zoom = self.camera.zoom;
        match &mut self.input {
            InputState::EditingText { draft, measured: m, .. } => {
                *draft = text;
                if let Some((w, h)) = measured {
                    *m = Some((w / zoom, h / zoom));
                }
            }
            InputState::EditingRectTitle { draft, .. } => *draft = text,
            _ => {}
        }
    }

    /// Save the open editor (blur or Enter).
    pub fn commit_edit(&mut self) -> Vec<Action> {
        let mut actions = Vec::new();
        self.commit_into(&mut actions);
        actions
    }

    /// Close the open editor without saving anything.
    pub fn cancel_edit(&mut self) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.input.is_editing() {
            self.transition(InputState::Idle, &mut actions);
            actions.push(Action::CloseEditor);
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    // --- Context menu / delete confirmation ---

    pub fn dismiss_menu(&mut self) -> Vec<Action> {
        match self.ui.menu.take() {
            Some(_) => vec![Action::HideContextMenu],
            None => Vec::new(),
        }
    }

    /// "Rename" from the context menu: open the editor for the item.
    pub fn menu_rename(&mut self) -> Vec<Action> {
        let Some(menu) = self.ui.menu.take() else {
            return Vec::new();
        };
        let mut actions = vec![Action::HideContextMenu];
        let Some(item) = self.store.get(&menu.item_id) else {
            return actions;
        };
        let (kind, world) = (item.kind(), item.position());
        match kind {
            ItemKind::Text => self.begin_text_edit(Some(menu.item_id), world, &mut actions),
            ItemKind::Rectangle => self.begin_title_edit(menu.item_id, &mut actions),
            ItemKind::File => {}
        }
        actions
    }

    /// "Delete" from the context menu: ask for confirmation.
    pub fn menu_delete(&mut self) -> Vec<Action> {
        let Some(menu) = self.ui.menu.take() else {
            return Vec::new();
        };
        self.ui.pending_delete = Some(menu.item_id);
        vec![Action::HideContextMenu, Action::ConfirmDelete { item_id: menu.item_id }]
    }

    /// The user confirmed the pending delete.
    pub fn confirm_delete(&mut self) -> Vec<Action> {
        let Some(id) = self.ui.pending_delete.take() else {
            return Vec::new();
        };
        let blob = match self.store.get(&id).map(|i| &i.body) {
            Some(ItemBody::File { url, .. }) => blob_name(url),
            _ => None,
        };
        let mut actions = self.apply_delete(&id);
        actions.push(Action::DeleteItem { id, blob });
        actions
    }

    pub fn cancel_delete(&mut self) {
        self.ui.pending_delete = None;
    }

    // --- Internals ---

    /// Replace the interaction state, keeping window-level tracking balanced.
    ///
    /// Every state change goes through here so each `CaptureStarted` is
    /// matched by exactly one `CaptureEnded`.
    fn transition(&mut self, next: InputState, actions: &mut Vec<Action>) -> InputState {
        let was = self.input.captures_pointer();
        let now = next.captures_pointer();
        let prev = std::mem::replace(&mut self.input, next);
        match (was, now) {
            (false, true) => actions.push(Action::CaptureStarted),
            (true, false) => actions.push(Action::CaptureEnded),
            _ => {}
        }
        prev
    }

    /// The item the current interaction is bound to, if any.
    fn active_item(&self) -> Option<ItemId> {
        match self.input {
            InputState::DraggingItem { id, .. } | InputState::ResizingItem { id, .. } => Some(id),
            InputState::EditingText { item_id, .. } => item_id,
            InputState::EditingRectTitle { item_id, .. } => Some(item_id),
            _ => None,
        }
    }

    fn click_item(&mut self, id: ItemId, actions: &mut Vec<Action>) {
        let Some(item) = self.store.get(&id) else {
            return;
        };
        let (kind, world, content) = (item.kind(), item.position(), item.body.content().map(str::to_string));
        match (kind, content) {
            (ItemKind::File, Some(url)) => actions.push(Action::OpenFile { id, url }),
            (ItemKind::Text, _) => self.begin_text_edit(Some(id), world, actions),
            _ => {}
        }
    }

    fn finish_drag(&mut self, id: ItemId, orig: Point, pos: Point, actions: &mut Vec<Action>) {
        let Some(item) = self.store.get(&id) else {
            return;
        };
        let pre_drag = Bounds { x: orig.x, y: orig.y, width: item.width, height: item.height };
        let is_rectangle = item.is_rectangle();

        self.store.set_position(&id, pos);
        actions.push(Action::UpdateItem { id, fields: PartialItem::position(pos) });

        if is_rectangle {
            let shift = Point::new(pos.x - orig.x, pos.y - orig.y);
            for (moved_id, moved_pos) in group::move_contained(&mut self.store, pre_drag, shift) {
                actions.push(Action::UpdateItem { id: moved_id, fields: PartialItem::position(moved_pos) });
            }
        }
    }

    fn begin_text_edit(&mut self, item_id: Option<ItemId>, world: Point, actions: &mut Vec<Action>) {
        let (world, text) = match item_id.and_then(|id| self.store.get(&id)) {
            Some(Item { body: ItemBody::Text { body }, x, y, .. }) => (Point::new(*x, *y), body.clone()),
            Some(_) => return,
            None => (world, String::new()),
        };
        let screen = self.camera.world_to_screen(world, self.viewport_center());
        let next = InputState::EditingText { world, item_id, draft: text.clone(), measured: None };
        self.transition(next, actions);
        actions.push(Action::OpenTextEditor { item_id, screen, text });
    }

    fn begin_title_edit(&mut self, item_id: ItemId, actions: &mut Vec<Action>) {
        let Some(item) = self.store.get(&item_id) else {
            return;
        };
        let text = item.body.content().unwrap_or_default().to_string();
        let screen = self.camera.world_to_screen(item.position(), self.viewport_center());
        self.transition(InputState::EditingRectTitle { item_id, draft: text.clone() }, actions);
        actions.push(Action::OpenTitleEditor { item_id, screen, text });
    }

    fn commit_into(&mut self, actions: &mut Vec<Action>) {
        if !self.input.is_editing() {
            return;
        }
        let prev = self.transition(InputState::Idle, actions);
        match prev {
            InputState::EditingText { world, item_id: None, draft, measured } => {
                if !draft.trim().is_empty() {
                    let (width, height) = clamp_text_size(measured.unwrap_or((TEXT_MIN_WIDTH, TEXT_MIN_HEIGHT)));
                    actions.push(Action::CreateItem(NewItem {
                        x: world.x,
                        y: world.y,
                        width,
                        height,
                        body: ItemBody::Text { body: draft },
                    }));
                }
            }
            InputState::EditingText { item_id: Some(id), draft, measured, .. } => {
                if let Some(item) = self.store.get(&id) {
                    let (width, height) = measured.map_or((item.width, item.height), clamp_text_size);
                    let unchanged = item.body.content() == Some(draft.as_str())
                        && item.width == width
                        && item.height == height;
                    if !unchanged {
                        let fields = PartialItem {
                            width: Some(width),
                            height: Some(height),
                            content: Some(draft),
                            ..Default::default()
                        };
                        self.store.apply_partial(&id, &fields);
                        actions.push(Action::UpdateItem { id, fields });
                    }
                }
            }
            InputState::EditingRectTitle { item_id, draft } => {
                if let Some(item) = self.store.get(&item_id) {
                    if item.body.content().unwrap_or_default() != draft {
                        let fields = PartialItem { content: Some(draft), ..Default::default() };
                        self.store.apply_partial(&item_id, &fields);
                        actions.push(Action::UpdateItem { id: item_id, fields });
                    }
                }
            }
            _ => {}
        }
        actions.push(Action::CloseEditor);
        actions.push(Action::RenderNeeded);
    }
}

fn delta(from: Point, to: Point) -> Point {
    Point::new(to.x - from.x, to.y - from.y)
}

fn drag_position(orig: Point, anchor_screen: Point, screen_pt: Point, zoom: f64) -> Point {
    let d = delta(anchor_screen, screen_pt);
    Point::new(orig.x + d.x / zoom, orig.y + d.y / zoom)
}

fn resize_size(orig_width: f64, orig_height: f64, anchor_screen: Point, screen_pt: Point, zoom: f64) -> (f64, f64) {
    let d = delta(anchor_screen, screen_pt);
    ((orig_width + d.x / zoom).max(RESIZE_MIN_WIDTH), (orig_height + d.y / zoom).max(RESIZE_MIN_HEIGHT))
}

fn clamp_text_size((w, h): (f64, f64)) -> (f64, f64) {
    (w.clamp(TEXT_MIN_WIDTH, TEXT_MAX_WIDTH), h.clamp(TEXT_MIN_HEIGHT, TEXT_MAX_HEIGHT))
}

/// Storage object name for a public URL: its last path segment.
#[must_use]
pub fn blob_name(url: &str) -> Option<String> {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    path.rsplit('/').next().filter(|s| !s.is_empty()).map(str::to_string)
}

/// Browser pointer capture held for the duration of a pointer gesture.
///
/// Released when dropped, so every exit path of a gesture (pointer-up,
/// Escape, item deleted underneath) detaches the tracking it attached.
struct PointerCapture {
    canvas: HtmlCanvasElement,
    pointer_id: i32,
}

impl PointerCapture {
    fn acquire(canvas: &HtmlCanvasElement, pointer_id: i32) -> Option<Self> {
        match canvas.set_pointer_capture(pointer_id) {
            Ok(()) => Some(Self { canvas: canvas.clone(), pointer_id }),
            Err(e) => {
                web_sys::console::warn_2(&"pointer capture failed".into(), &e);
                None
            }
        }
    }
}

impl Drop for PointerCapture {
    fn drop(&mut self) {
        if let Err(e) = self.canvas.release_pointer_capture(self.pointer_id) {
            web_sys::console::warn_2(&"pointer release failed".into(), &e);
        }
    }
}

/// The full canvas engine. Wraps `EngineCore` and owns the browser canvas element.
pub struct Engine {
    canvas: HtmlCanvasElement,
    capture: Option<PointerCapture>,
    pub core: EngineCore,
}

impl Engine {
    /// Create a new engine bound to the given canvas element.
    #[must_use]
    pub fn new(canvas: HtmlCanvasElement) -> Self {
        Self { canvas, capture: None, core: EngineCore::new() }
    }

    // --- Delegated data inputs ---

    pub fn load_snapshot(&mut self, items: Vec<Item>) {
        self.core.load_snapshot(items);
    }

    /// Hydrate from the JSON array returned by the item listing.
    ///
    /// # Errors
    ///
    /// Returns the decode error if the payload is not a list of items.
    pub fn load_snapshot_json(&mut self, json: &str) -> Result<(), serde_json::Error> {
        let items: Vec<Item> = serde_json::from_str(json)?;
        self.core.load_snapshot(items);
        Ok(())
    }

    pub fn apply_create(&mut self, item: Item) {
        self.core.apply_create(item);
    }

    pub fn apply_update(&mut self, id: &ItemId, fields: &PartialItem) {
        self.core.apply_update(id, fields);
    }

    pub fn apply_delete(&mut self, id: &ItemId) -> Vec<Action> {
        let actions = self.core.apply_delete(id);
        self.sync_capture(&actions, None)
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.core.set_tool(tool);
    }

    // --- Viewport ---

    /// Update viewport dimensions and resize the backing store to device pixels.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) {
        self.core.set_viewport(width_css, height_css, dpr);
        self.canvas.set_width((width_css * dpr).round().max(0.0) as u32);
        self.canvas.set_height((height_css * dpr).round().max(0.0) as u32);
    }

    // --- Input events ---

    pub fn on_pointer_down(
        &mut self,
        screen_pt: Point,
        button: Button,
        modifiers: Modifiers,
        pointer_id: i32,
    ) -> Vec<Action> {
        let actions = self.core.on_pointer_down(screen_pt, button, modifiers);
        self.sync_capture(&actions, Some(pointer_id))
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_pointer_move(screen_pt, modifiers)
    }

    pub fn on_pointer_up(&mut self, screen_pt: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        let actions = self.core.on_pointer_up(screen_pt, button, modifiers);
        self.sync_capture(&actions, None)
    }

    pub fn on_double_click(&mut self, screen_pt: Point) -> Vec<Action> {
        self.core.on_double_click(screen_pt)
    }

    pub fn on_wheel(&mut self, screen_pt: Point, delta: WheelDelta, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_wheel(screen_pt, delta, modifiers)
    }

    pub fn on_key_down(&mut self, key: Key, modifiers: Modifiers) -> Vec<Action> {
        let actions = self.core.on_key_down(key, modifiers);
        self.sync_capture(&actions, None)
    }

    pub fn on_key_up(&mut self, key: Key, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_key_up(key, modifiers)
    }

    // --- Render ---

    /// Draw the current state to the canvas.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the 2D context is unavailable or a draw call fails.
    pub fn render(&self) -> Result<(), JsValue> {
        let ctx = self.context()?;
        let list = self.core.display_list();
        paint::draw(
            &ctx,
            &list,
            self.core.camera.zoom,
            self.core.viewport_width,
            self.core.viewport_height,
            self.core.dpr,
        )
    }

    fn context(&self) -> Result<CanvasRenderingContext2d, JsValue> {
        self.canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(JsValue::from)
    }

    /// Mirror `CaptureStarted` / `CaptureEnded` onto real pointer capture.
    fn sync_capture(&mut self, actions: &[Action], pointer_id: Option<i32>) -> Vec<Action> {
        for action in actions {
            match action {
                Action::CaptureStarted => {
                    self.capture = pointer_id.and_then(|id| PointerCapture::acquire(&self.canvas, id));
                }
                Action::CaptureEnded => self.capture = None,
                _ => {}
            }
        }
        actions.to_vec()
    }

    // --- Delegated queries ---

    #[must_use]
    pub fn camera(&self) -> Camera {
        self.core.camera()
    }

    #[must_use]
    pub fn item(&self, id: &ItemId) -> Option<&Item> {
        self.core.item(id)
    }
}
