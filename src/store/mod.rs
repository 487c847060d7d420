//! Comment store abstraction
//!
//! The HTTP layer only ever talks to a [`CommentStore`]. Which document store
//! sits behind it is decided once at startup by [`create_store`].

use async_trait::async_trait;
use std::sync::Arc;

use crate::storage::{create_storage, StorageBackend, StorageConfig};
use crate::types::{Comment, Fields};
use crate::Result;

pub mod memory;
pub mod object;

pub use memory::MemoryStore;
pub use object::ObjectStore;

/// Document store client for the comments collection
#[async_trait]
pub trait CommentStore: Send + Sync {
    /// Every stored comment, in store order
    async fn find_all(&self) -> Result<Vec<Comment>>;

    /// Persist a new comment and return it with its generated id
    async fn insert_one(&self, fields: Fields) -> Result<Comment>;

    /// Remove a comment, returning it, or `None` if no comment has this id
    async fn delete_by_id(&self, id: &str) -> Result<Option<Comment>>;
}

/// Which document store backs the service
#[derive(Debug, Clone, PartialEq)]
pub enum StoreConfig {
    Memory,
    Object {
        storage: StorageConfig,
        collection: String,
    },
}

/// Create comment store from config
pub async fn create_store(config: StoreConfig) -> Result<Box<dyn CommentStore>> {
    match config {
        StoreConfig::Memory => Ok(Box::new(MemoryStore::new())),
        StoreConfig::Object {
            storage,
            collection,
        } => {
            let backend: Arc<dyn StorageBackend> = Arc::from(create_storage(storage).await?);
            Ok(Box::new(ObjectStore::new(backend, collection)))
        }
    }
}
