//! API server state

use std::sync::Arc;

use crate::store::CommentStore;

/// API server state
#[derive(Clone)]
pub struct AppState {
    /// Document store holding the comments collection
    pub store: Arc<dyn CommentStore>,

    /// Collection name, reported by the health endpoint
    pub collection: String,
}

impl AppState {
    pub fn new(store: Arc<dyn CommentStore>, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
        }
    }
}
