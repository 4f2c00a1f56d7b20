//! Document model: placed items, their kinds, and the in-memory store.
//!
//! This module defines what is on the canvas (`Item`, `ItemBody`), the
//! create payload (`NewItem`), a sparse-update type for incremental edits
//! (`PartialItem`), and the runtime store that owns all live items
//! (`ItemStore`).
//!
//! Data flows into this layer from the persistence collaborator (JSON or row
//! decoding) and from the input engine (optimistic mutations). The renderer
//! reads from `ItemStore` via `render_order` to determine draw order.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::camera::Point;

/// Unique, server-assigned identifier for an item.
pub type ItemId = Uuid;

/// The kind of an item. Fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    /// A dropped file, shown as a card.
    File,
    /// A free-floating text note.
    Text,
    /// A titled background container.
    Rectangle,
}

impl ItemKind {
    /// Wire name, as stored in the `type` column.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Text => "text",
            Self::Rectangle => "rectangle",
        }
    }

    /// Parse a wire name. Returns `None` for anything outside the three kinds.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "file" => Some(Self::File),
            "text" => Some(Self::Text),
            "rectangle" => Some(Self::Rectangle),
            _ => None,
        }
    }
}

/// Kind-specific payload of an item.
///
/// On the wire the variant is the `type` field and the payload string is
/// `content`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ItemBody {
    File {
        /// Public URL of the uploaded blob.
        #[serde(rename = "content")]
        url: String,
        file_name: String,
    },
    Text {
        #[serde(rename = "content")]
        body: String,
    },
    Rectangle {
        #[serde(rename = "content", default)]
        title: Option<String>,
    },
}

impl ItemBody {
    #[must_use]
    pub fn kind(&self) -> ItemKind {
        match self {
            Self::File { .. } => ItemKind::File,
            Self::Text { .. } => ItemKind::Text,
            Self::Rectangle { .. } => ItemKind::Rectangle,
        }
    }

    /// The `content` string for this body, if any.
    #[must_use]
    pub fn content(&self) -> Option<&str> {
        match self {
            Self::File { url, .. } => Some(url),
            Self::Text { body } => Some(body),
            Self::Rectangle { title } => title.as_deref(),
        }
    }

    /// Replace the `content` string. An empty rectangle title clears it.
    pub fn set_content(&mut self, content: &str) {
        match self {
            Self::File { url, .. } => *url = content.to_string(),
            Self::Text { body } => *body = content.to_string(),
            Self::Rectangle { title } => {
                *title = if content.is_empty() { None } else { Some(content.to_string()) };
            }
        }
    }
}

/// Axis-aligned bounds in world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    /// Bounds spanning two arbitrary corners.
    #[must_use]
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: (b.x - a.x).abs(),
            height: (b.y - a.y).abs(),
        }
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Inclusive point containment.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }
}

/// A placed item as stored in the document and on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Unique identifier for this item.
    pub id: ItemId,
    /// Left edge in world coordinates.
    pub x: f64,
    /// Top edge in world coordinates.
    pub y: f64,
    /// Width in world units.
    pub width: f64,
    /// Height in world units.
    pub height: f64,
    /// Kind and kind-specific payload.
    #[serde(flatten)]
    pub body: ItemBody,
    /// Creation time; orders items within a render tier.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Item {
    #[must_use]
    pub fn kind(&self) -> ItemKind {
        self.body.kind()
    }

    #[must_use]
    pub fn is_rectangle(&self) -> bool {
        self.kind() == ItemKind::Rectangle
    }

    #[must_use]
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    #[must_use]
    pub fn bounds(&self) -> Bounds {
        Bounds { x: self.x, y: self.y, width: self.width, height: self.height }
    }
}

/// An item that has not been persisted yet (no id, no timestamp).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewItem {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(flatten)]
    pub body: ItemBody,
}

impl NewItem {
    #[must_use]
    pub fn kind(&self) -> ItemKind {
        self.body.kind()
    }

    /// Attach the identity the collaborator assigned.
    #[must_use]
    pub fn into_item(self, id: ItemId, created_at: OffsetDateTime) -> Item {
        Item {
            id,
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
            body: self.body,
            created_at,
        }
    }
}

/// Sparse update for an item. Only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    /// New `content`, routed to the body field for the item's kind.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl PartialItem {
    #[must_use]
    pub fn position(p: Point) -> Self {
        Self { x: Some(p.x), y: Some(p.y), ..Default::default() }
    }

    #[must_use]
    pub fn size(width: f64, height: f64) -> Self {
        Self { width: Some(width), height: Some(height), ..Default::default() }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.x.is_none() && self.y.is_none() && self.width.is_none() && self.height.is_none() && self.content.is_none()
    }
}

/// In-memory, insertion-ordered store of items.
#[derive(Debug, Default)]
pub struct ItemStore {
    items: Vec<Item>,
}

impl ItemStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Append an item, or replace the one with the same `id`.
    pub fn insert(&mut self, item: Item) {
        if let Some(existing) = self.get_mut(&item.id) {
            *existing = item;
        } else {
            self.items.push(item);
        }
    }

    /// Remove an item by id, returning it if it was present.
    pub fn remove(&mut self, id: &ItemId) -> Option<Item> {
        let idx = self.items.iter().position(|i| i.id == *id)?;
        Some(self.items.remove(idx))
    }

    #[must_use]
    pub fn get(&self, id: &ItemId) -> Option<&Item> {
        self.items.iter().find(|i| i.id == *id)
    }

    pub fn get_mut(&mut self, id: &ItemId) -> Option<&mut Item> {
        self.items.iter_mut().find(|i| i.id == *id)
    }

    /// Move an item's top-left corner. Returns false if the item doesn't exist.
    pub fn set_position(&mut self, id: &ItemId, pos: Point) -> bool {
        let Some(item) = self.get_mut(id) else {
            return false;
        };
        item.x = pos.x;
        item.y = pos.y;
        true
    }

    /// Apply a partial update to an existing item. Returns false if the item doesn't exist.
    pub fn apply_partial(&mut self, id: &ItemId, partial: &PartialItem) -> bool {
        let Some(item) = self.get_mut(id) else {
            return false;
        };
        if let Some(x) = partial.x {
            item.x = x;
        }
        if let Some(y) = partial.y {
            item.y = y;
        }
        if let Some(w) = partial.width {
            item.width = w;
        }
        if let Some(h) = partial.height {
            item.height = h;
        }
        if let Some(ref content) = partial.content {
            item.body.set_content(content);
        }
        true
    }

    /// Replace all items with a full snapshot.
    pub fn load_snapshot(&mut self, items: Vec<Item>) {
        self.items = items;
    }

    /// All items in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    /// Items in draw order: rectangles first, then everything else, each tier
    /// by `created_at` ascending. Ties keep insertion order.
    #[must_use]
    pub fn render_order(&self) -> Vec<&Item> {
        let mut items: Vec<&Item> = self.items.iter().collect();
        items.sort_by(|a, b| {
            b.is_rectangle()
                .cmp(&a.is_rectangle())
                .then_with(|| a.created_at.cmp(&b.created_at))
        });
        items
    }

    /// Number of items currently in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the store contains no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
