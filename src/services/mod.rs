//! Persistence collaborators: the item repository and the blob store.
//!
//! Both sit behind async traits so the session can run against Postgres and
//! the storage REST API in production and against in-memory doubles in tests.

pub mod blobs;
pub mod items;

use uuid::Uuid;

// =============================================================================
// ERROR
// =============================================================================

/// Stable machine-readable code for an error, shown alongside its message.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;
}

/// Failure of a persistence call. Never fatal; never retried.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    /// The backend could not be reached or the request did not complete.
    #[error("backend unreachable: {0}")]
    Connectivity(String),
    /// The backend answered and refused the request.
    #[error("rejected by backend: {0}")]
    Validation(String),
    #[error("item not found: {0}")]
    NotFound(Uuid),
}

impl ErrorCode for PersistError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Connectivity(_) => "E_CONNECTIVITY",
            Self::Validation(_) => "E_VALIDATION",
            Self::NotFound(_) => "E_NOT_FOUND",
        }
    }
}

impl From<sqlx::Error> for PersistError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::Database(db) => Self::Validation(db.message().to_string()),
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) | sqlx::Error::TypeNotFound { .. } => {
                Self::Validation(e.to_string())
            }
            other => Self::Connectivity(other.to_string()),
        }
    }
}

impl From<reqwest::Error> for PersistError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_status() || e.is_decode() || e.is_builder() {
            Self::Validation(e.to_string())
        } else {
            Self::Connectivity(e.to_string())
        }
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

// =============================================================================
// TEST HELPERS
// =============================================================================

#[cfg(test)]
pub mod test_helpers {
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    use canvas::doc::{Item, ItemId, NewItem, PartialItem};
    use time::{Duration, OffsetDateTime};

    use super::blobs::BlobStore;
    use super::items::ItemRepository;
    use super::PersistError;

    fn refused(what: &str) -> PersistError {
        PersistError::Connectivity(format!("{what}: connection refused"))
    }

    /// In-memory item table. Each `fail_*` flag makes that call error.
    #[derive(Default)]
    pub struct MemoryItems {
        pub items: Mutex<Vec<Item>>,
        pub fail_list: AtomicBool,
        pub fail_create: AtomicBool,
        pub fail_update: AtomicBool,
        pub fail_delete: AtomicBool,
    }

    impl MemoryItems {
        #[must_use]
        pub fn with_items(items: Vec<Item>) -> Self {
            Self { items: Mutex::new(items), ..Self::default() }
        }

        pub fn snapshot(&self) -> Vec<Item> {
            self.items.lock().expect("items mutex should lock").clone()
        }

        pub fn get(&self, id: &ItemId) -> Option<Item> {
            self.snapshot().into_iter().find(|i| i.id == *id)
        }
    }

    #[async_trait::async_trait]
    impl ItemRepository for MemoryItems {
        async fn list_items(&self) -> Result<Vec<Item>, PersistError> {
            if self.fail_list.load(Ordering::SeqCst) {
                return Err(refused("list"));
            }
            let mut items = self.snapshot();
            items.sort_by_key(|i| i.created_at);
            Ok(items)
        }

        async fn create_item(&self, new: NewItem) -> Result<Item, PersistError> {
            if self.fail_create.load(Ordering::SeqCst) {
                return Err(refused("create"));
            }
            let mut items = self.items.lock().expect("items mutex should lock");
            let seq = i64::try_from(items.len()).unwrap_or_default();
            let item = new.into_item(uuid::Uuid::new_v4(), OffsetDateTime::UNIX_EPOCH + Duration::seconds(seq));
            items.push(item.clone());
            Ok(item)
        }

        async fn update_item(&self, id: ItemId, fields: PartialItem) -> Result<(), PersistError> {
            if self.fail_update.load(Ordering::SeqCst) {
                return Err(refused("update"));
            }
            let mut items = self.items.lock().expect("items mutex should lock");
            if let Some(item) = items.iter_mut().find(|i| i.id == id) {
                if let Some(x) = fields.x {
                    item.x = x;
                }
                if let Some(y) = fields.y {
                    item.y = y;
                }
                if let Some(w) = fields.width {
                    item.width = w;
                }
                if let Some(h) = fields.height {
                    item.height = h;
                }
                if let Some(content) = &fields.content {
                    item.body.set_content(content);
                }
            }
            Ok(())
        }

        async fn delete_item(&self, id: ItemId) -> Result<(), PersistError> {
            if self.fail_delete.load(Ordering::SeqCst) {
                return Err(refused("delete"));
            }
            let mut items = self.items.lock().expect("items mutex should lock");
            let before = items.len();
            items.retain(|i| i.id != id);
            if items.len() == before {
                return Err(PersistError::NotFound(id));
            }
            Ok(())
        }
    }

    /// In-memory bucket. Public URLs are `mem://{path}`.
    #[derive(Default)]
    pub struct MemoryBlobs {
        pub objects: Mutex<HashMap<String, Vec<u8>>>,
        pub fail_upload: AtomicBool,
        pub fail_remove: AtomicBool,
    }

    impl MemoryBlobs {
        pub fn names(&self) -> Vec<String> {
            let mut names: Vec<_> = self.objects.lock().expect("blobs mutex should lock").keys().cloned().collect();
            names.sort();
            names
        }
    }

    #[async_trait::async_trait]
    impl BlobStore for MemoryBlobs {
        async fn upload_blob(&self, path: &str, bytes: Vec<u8>) -> Result<String, PersistError> {
            if self.fail_upload.load(Ordering::SeqCst) {
                return Err(PersistError::Validation("payload too large".into()));
            }
            self.objects.lock().expect("blobs mutex should lock").insert(path.to_string(), bytes);
            Ok(path.to_string())
        }

        fn public_url(&self, path: &str) -> String {
            format!("mem://bucket/{path}")
        }

        async fn remove_blob(&self, name: &str) -> Result<(), PersistError> {
            if self.fail_remove.load(Ordering::SeqCst) {
                return Err(refused("remove"));
            }
            self.objects.lock().expect("blobs mutex should lock").remove(name);
            Ok(())
        }
    }
}
