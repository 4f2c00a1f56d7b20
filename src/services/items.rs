//! Item repository: the `items` table.
//!
//! DESIGN
//! ======
//! One row per item. The kind-specific payload is split across two nullable
//! columns: `content` (file URL, note text or rectangle title) and
//! `file_name` (files only). Rows are decoded into the engine's
//! [`ItemBody`] sum type at the edge so nothing downstream sees the flat
//! column layout.

use canvas::doc::{Item, ItemBody, ItemId, ItemKind, NewItem, PartialItem};
use sqlx::PgPool;
use time::OffsetDateTime;
use tracing::debug;
use uuid::Uuid;

use super::PersistError;

// =============================================================================
// TRAIT
// =============================================================================

#[async_trait::async_trait]
pub trait ItemRepository: Send + Sync {
    /// All items, oldest first.
    async fn list_items(&self) -> Result<Vec<Item>, PersistError>;

    /// Insert an item; the repository assigns `id` and `created_at`.
    async fn create_item(&self, new: NewItem) -> Result<Item, PersistError>;

    /// Apply the present fields. Unknown ids are a no-op.
    async fn update_item(&self, id: ItemId, fields: PartialItem) -> Result<(), PersistError>;

    async fn delete_item(&self, id: ItemId) -> Result<(), PersistError>;
}

// =============================================================================
// POSTGRES
// =============================================================================

type ItemRow = (Uuid, String, f64, f64, f64, f64, Option<String>, Option<String>, OffsetDateTime);

const ITEM_COLUMNS: &str = "id, type, x, y, width, height, content, file_name, created_at";

pub struct PgItems {
    pool: PgPool,
}

impl PgItems {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ItemRepository for PgItems {
    async fn list_items(&self) -> Result<Vec<Item>, PersistError> {
        let rows = sqlx::query_as::<_, ItemRow>(&format!("SELECT {ITEM_COLUMNS} FROM items ORDER BY created_at ASC"))
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(item_from_row).collect()
    }

    async fn create_item(&self, new: NewItem) -> Result<Item, PersistError> {
        let id = Uuid::new_v4();
        let (content, file_name) = columns_for(&new.body);
        let row = sqlx::query_as::<_, ItemRow>(&format!(
            "INSERT INTO items (id, type, x, y, width, height, content, file_name)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {ITEM_COLUMNS}"
        ))
        .bind(id)
        .bind(new.kind().as_str())
        .bind(new.x)
        .bind(new.y)
        .bind(new.width)
        .bind(new.height)
        .bind(content)
        .bind(file_name)
        .fetch_one(&self.pool)
        .await?;
        item_from_row(row)
    }

    async fn update_item(&self, id: ItemId, fields: PartialItem) -> Result<(), PersistError> {
        if fields.is_empty() {
            return Ok(());
        }
        let result = sqlx::query(
            "UPDATE items SET
                x = COALESCE($2, x),
                y = COALESCE($3, y),
                width = COALESCE($4, width),
                height = COALESCE($5, height),
                content = COALESCE($6, content)
             WHERE id = $1",
        )
        .bind(id)
        .bind(fields.x)
        .bind(fields.y)
        .bind(fields.width)
        .bind(fields.height)
        .bind(fields.content)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            debug!(%id, "update for unknown item ignored");
        }
        Ok(())
    }

    async fn delete_item(&self, id: ItemId) -> Result<(), PersistError> {
        let result = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(PersistError::NotFound(id));
        }
        Ok(())
    }
}

// =============================================================================
// ROW MAPPING
// =============================================================================

/// `(content, file_name)` column values for a body.
#[must_use]
pub fn columns_for(body: &ItemBody) -> (Option<&str>, Option<&str>) {
    match body {
        ItemBody::File { url, file_name } => (Some(url), Some(file_name)),
        ItemBody::Text { body } => (Some(body), None),
        ItemBody::Rectangle { title } => (title.as_deref(), None),
    }
}

/// Rebuild a body from its `type` and payload columns.
///
/// # Errors
///
/// Returns `Validation` for a `type` outside `file | text | rectangle`.
pub fn body_from_columns(kind: &str, content: Option<String>, file_name: Option<String>) -> Result<ItemBody, PersistError> {
    let Some(kind) = ItemKind::parse(kind) else {
        return Err(PersistError::Validation(format!("unknown item type '{kind}'")));
    };
    Ok(match kind {
        ItemKind::File => ItemBody::File { url: content.unwrap_or_default(), file_name: file_name.unwrap_or_default() },
        ItemKind::Text => ItemBody::Text { body: content.unwrap_or_default() },
        ItemKind::Rectangle => ItemBody::Rectangle { title: content.filter(|t| !t.is_empty()) },
    })
}

fn item_from_row(row: ItemRow) -> Result<Item, PersistError> {
    let (id, kind, x, y, width, height, content, file_name, created_at) = row;
    Ok(Item { id, x, y, width, height, body: body_from_columns(&kind, content, file_name)?, created_at })
}

#[cfg(test)]
#[path = "items_test.rs"]
mod tests;
