//! In-process comment store
//!
//! Keeps comments in insertion order. Nothing survives a restart.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::types::{Comment, CommentId, Fields};
use crate::Result;

use super::CommentStore;

#[derive(Debug, Default)]
pub struct MemoryStore {
    comments: RwLock<Vec<Comment>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CommentStore for MemoryStore {
    async fn find_all(&self) -> Result<Vec<Comment>> {
        Ok(self.comments.read().await.clone())
    }

    async fn insert_one(&self, fields: Fields) -> Result<Comment> {
        let comment = Comment::new(CommentId::generate(), fields);
        self.comments.write().await.push(comment.clone());
        tracing::debug!(id = %comment.id, "Inserted comment");
        Ok(comment)
    }

    async fn delete_by_id(&self, id: &str) -> Result<Option<Comment>> {
        let id = CommentId::parse(id)?;

        let mut comments = self.comments.write().await;
        let position = comments.iter().position(|c| c.id == id);
        let removed = position.map(|idx| comments.remove(idx));

        tracing::debug!(%id, found = removed.is_some(), "Deleted comment");
        Ok(removed)
    }
}
