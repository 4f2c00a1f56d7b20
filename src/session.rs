//! Session: feeds input into the engine and persists what it decides.
//!
//! DESIGN
//! ======
//! Input handling is synchronous. Each event runs through [`EngineCore`],
//! which mutates the local store optimistically and returns actions.
//! Persistence actions are spawned as tasks on the current-thread runtime;
//! every task reports back with exactly one message on an unbounded channel,
//! and `pump` applies those messages before the next event.
//!
//! ERROR HANDLING
//! ==============
//! Failures are logged and raised as notices. Nothing is retried and
//! optimistic local state is never rolled back. Late results apply
//! regardless of what happened in between.

use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use canvas::camera::Point;
use canvas::doc::{Item, ItemId, NewItem, PartialItem};
use canvas::engine::{Action, EngineCore};
use canvas::input::{Key, WheelDelta};
use time::OffsetDateTime;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::events::{Frame, InputEvent};
use crate::notice::Notices;
use crate::services::blobs::{BlobStore, blob_path};
use crate::services::items::ItemRepository;
use crate::services::{ErrorCode, PersistError};

/// Result of background work, applied on the session's thread.
#[derive(Debug)]
enum Outcome {
    Created(Item),
    /// Upload finished; the card goes where the file was dropped (world space).
    Uploaded { world: Point, file_name: String, url: String },
    Failed { op: &'static str, error: PersistError },
}

/// Sends a task's outcomes exactly once. A task that dies before reporting
/// still reports a failure from `Drop`, so `pending` always drains.
struct Report {
    tx: Option<mpsc::UnboundedSender<Vec<Outcome>>>,
}

impl Report {
    fn send(&mut self, outcomes: Vec<Outcome>) {
        if let Some(tx) = self.tx.take() {
            if tx.send(outcomes).is_err() {
                warn!("session closed before persistence finished");
            }
        }
    }
}

impl Drop for Report {
    fn drop(&mut self) {
        if self.tx.is_some() {
            error!("persistence task ended without reporting");
            let error = PersistError::Connectivity("background task aborted".into());
            self.send(vec![Outcome::Failed { op: "finish saving", error }]);
        }
    }
}

pub struct Session {
    pub core: EngineCore,
    items: Arc<dyn ItemRepository>,
    blobs: Arc<dyn BlobStore>,
    notices: Notices,
    overlays: Vec<Action>,
    opened: Vec<String>,
    pending: usize,
    tx: mpsc::UnboundedSender<Vec<Outcome>>,
    rx: mpsc::UnboundedReceiver<Vec<Outcome>>,
}

impl Session {
    #[must_use]
    pub fn new(
        core: EngineCore,
        items: Arc<dyn ItemRepository>,
        blobs: Arc<dyn BlobStore>,
        notice_ttl: Duration,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            core,
            items,
            blobs,
            notices: Notices::new(notice_ttl),
            overlays: Vec::new(),
            opened: Vec::new(),
            pending: 0,
            tx,
            rx,
        }
    }

    /// Persistence calls still in flight.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Load the board. A failed listing leaves it empty.
    pub async fn hydrate(&mut self) {
        match self.items.list_items().await {
            Ok(items) => {
                info!(count = items.len(), "board loaded");
                self.core.load_snapshot(items);
            }
            Err(e) => {
                error!(error = %e, code = e.error_code(), "list items failed");
                self.notices.raise("load the board", &e, Instant::now());
            }
        }
    }

    // =========================================================================
    // INPUT
    // =========================================================================

    pub async fn handle(&mut self, event: InputEvent) {
        self.pump();
        let actions = match event {
            InputEvent::PointerDown { x, y, button, modifiers } => self.core.on_pointer_down(Point::new(x, y), button, modifiers),
            InputEvent::PointerMove { x, y, modifiers } => self.core.on_pointer_move(Point::new(x, y), modifiers),
            InputEvent::PointerUp { x, y, button, modifiers } => self.core.on_pointer_up(Point::new(x, y), button, modifiers),
            InputEvent::DoubleClick { x, y } => self.core.on_double_click(Point::new(x, y)),
            InputEvent::Wheel { x, y, dx, dy, modifiers } => self.core.on_wheel(Point::new(x, y), WheelDelta { dx, dy }, modifiers),
            InputEvent::KeyDown { key, modifiers } => self.core.on_key_down(Key(key), modifiers),
            InputEvent::KeyUp { key, modifiers } => self.core.on_key_up(Key(key), modifiers),
            InputEvent::Draft { text, width, height } => {
                self.core.update_draft(text, width.zip(height));
                Vec::new()
            }
            InputEvent::Blur => self.core.commit_edit(),
            InputEvent::MenuRename => self.core.menu_rename(),
            InputEvent::MenuDelete => self.core.menu_delete(),
            InputEvent::MenuDismiss => self.core.dismiss_menu(),
            InputEvent::ConfirmDelete => self.core.confirm_delete(),
            InputEvent::CancelDelete => {
                self.core.cancel_delete();
                Vec::new()
            }
            InputEvent::SetTool { tool } => {
                self.core.set_tool(tool);
                Vec::new()
            }
            InputEvent::Resize { width, height, dpr } => {
                self.core.set_viewport(width, height, dpr);
                Vec::new()
            }
            InputEvent::DropFile { x, y, path } => {
                self.drop_path(Point::new(x, y), &path).await;
                Vec::new()
            }
            InputEvent::Settle => {
                self.settle().await;
                Vec::new()
            }
        };
        self.dispatch(actions);
    }

    /// Route engine actions: persistence is spawned, overlays are queued for
    /// the next frame, pointer bookkeeping needs nothing from a headless host.
    pub fn dispatch(&mut self, actions: Vec<Action>) {
        for action in actions {
            match action {
                Action::CreateItem(new) => self.spawn_create(new),
                Action::UpdateItem { id, fields } => self.spawn_update(id, fields),
                Action::DeleteItem { id, blob } => self.spawn_delete(id, blob),
                Action::OpenFile { id, url } => {
                    info!(%id, %url, "file opened");
                    self.opened.push(url);
                }
                overlay @ (Action::OpenTextEditor { .. }
                | Action::OpenTitleEditor { .. }
                | Action::CloseEditor
                | Action::ShowContextMenu { .. }
                | Action::HideContextMenu
                | Action::ConfirmDelete { .. }) => self.overlays.push(overlay),
                Action::CaptureStarted | Action::CaptureEnded | Action::SetCursor(_) | Action::RenderNeeded => {}
            }
        }
    }

    /// Read a dropped local file and upload it.
    pub async fn drop_path(&mut self, screen: Point, path: &Path) {
        let Some(file_name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            let err = PersistError::Validation(format!("not a file: {}", path.display()));
            self.notices.raise("upload the file", &err, Instant::now());
            return;
        };
        match tokio::fs::read(path).await {
            Ok(bytes) => self.drop_file(screen, &file_name, bytes),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "dropped file unreadable");
                let err = PersistError::Validation(format!("{}: {e}", path.display()));
                self.notices.raise("upload the file", &err, Instant::now());
            }
        }
    }

    /// Upload dropped bytes; the file card is created once the upload lands.
    pub fn drop_file(&mut self, screen: Point, file_name: &str, bytes: Vec<u8>) {
        let world = self.core.screen_to_world(screen);
        let path = blob_path(file_name, OffsetDateTime::now_utc());
        let file_name = file_name.to_string();
        let blobs = Arc::clone(&self.blobs);
        self.spawn(async move {
            match blobs.upload_blob(&path, bytes).await {
                Ok(stored) => {
                    let url = blobs.public_url(&stored);
                    vec![Outcome::Uploaded { world, file_name, url }]
                }
                Err(error) => vec![Outcome::Failed { op: "upload the file", error }],
            }
        });
    }

    // =========================================================================
    // BACKGROUND WORK
    // =========================================================================

    fn spawn<F>(&mut self, task: F)
    where
        F: Future<Output = Vec<Outcome>> + Send + 'static,
    {
        let mut report = Report { tx: Some(self.tx.clone()) };
        self.pending += 1;
        tokio::spawn(async move {
            let outcomes = task.await;
            report.send(outcomes);
        });
    }

    fn spawn_create(&mut self, new: NewItem) {
        let items = Arc::clone(&self.items);
        self.spawn(async move {
            let kind = new.kind();
            match items.create_item(new).await {
                Ok(item) => {
                    info!(id = %item.id, kind = kind.as_str(), "item created");
                    vec![Outcome::Created(item)]
                }
                Err(error) => vec![Outcome::Failed { op: "save the new item", error }],
            }
        });
    }

    fn spawn_update(&mut self, id: ItemId, fields: PartialItem) {
        let items = Arc::clone(&self.items);
        self.spawn(async move {
            match items.update_item(id, fields).await {
                Ok(()) => {
                    debug!(%id, "item updated");
                    Vec::new()
                }
                Err(error) => vec![Outcome::Failed { op: "save changes", error }],
            }
        });
    }

    /// Remove the backing blob (if any), then the record. A failed blob
    /// removal is reported but does not keep the record alive.
    fn spawn_delete(&mut self, id: ItemId, blob: Option<String>) {
        let items = Arc::clone(&self.items);
        let blobs = Arc::clone(&self.blobs);
        self.spawn(async move {
            let mut outcomes = Vec::new();
            if let Some(name) = blob {
                if let Err(error) = blobs.remove_blob(&name).await {
                    warn!(%id, blob = %name, error = %error, "blob removal failed; deleting record anyway");
                    outcomes.push(Outcome::Failed { op: "remove the file", error });
                }
            }
            match items.delete_item(id).await {
                Ok(()) => info!(%id, "item deleted"),
                Err(error) => outcomes.push(Outcome::Failed { op: "delete the item", error }),
            }
            outcomes
        });
    }

    /// Apply every finished task without waiting.
    pub fn pump(&mut self) {
        while let Ok(outcomes) = self.rx.try_recv() {
            self.pending = self.pending.saturating_sub(1);
            self.apply(outcomes);
        }
    }

    /// Wait until nothing is in flight, including work spawned by results.
    pub async fn settle(&mut self) {
        while self.pending > 0 {
            let Some(outcomes) = self.rx.recv().await else {
                break;
            };
            self.pending -= 1;
            self.apply(outcomes);
        }
    }

    fn apply(&mut self, outcomes: Vec<Outcome>) {
        for outcome in outcomes {
            match outcome {
                Outcome::Created(item) => self.core.apply_create(item),
                Outcome::Uploaded { world, file_name, url } => {
                    self.dispatch(vec![EngineCore::place_file_at(world, &file_name, &url)]);
                }
                Outcome::Failed { op, error } => {
                    error!(op, code = error.error_code(), error = %error, "persistence failed");
                    self.notices.raise(op, &error, Instant::now());
                }
            }
        }
    }

    // =========================================================================
    // OUTPUT
    // =========================================================================

    /// Snapshot for the viewer. Drains queued overlays and opened URLs.
    pub fn frame(&mut self, now: Instant) -> Frame<'_> {
        Frame {
            camera: self.core.camera(),
            tool: self.core.ui.tool,
            display: self.core.display_list(),
            overlays: std::mem::take(&mut self.overlays),
            opened: std::mem::take(&mut self.opened),
            notices: self.notices.current(now),
            pending: self.pending,
        }
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
