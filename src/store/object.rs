//! Object-storage backed comment store
//!
//! Each comment is a JSON document at `<collection>/<id>.json`. Ids are
//! time-ordered, so listing keys in lexical order yields creation order.

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{self, StreamExt, TryStreamExt};
use std::sync::Arc;

use crate::storage::StorageBackend;
use crate::types::{Comment, CommentId, Fields};
use crate::{Error, Result};

use super::CommentStore;

const DOCUMENT_EXTENSION: &str = ".json";

/// Documents fetched in flight at once while listing
const LOAD_CONCURRENCY: usize = 16;

pub struct ObjectStore {
    storage: Arc<dyn StorageBackend>,
    collection: String,
}

impl ObjectStore {
    pub fn new(storage: Arc<dyn StorageBackend>, collection: impl Into<String>) -> Self {
        Self {
            storage,
            collection: collection.into(),
        }
    }

    fn document_key(&self, id: &CommentId) -> String {
        format!("{}/{}{}", self.collection, id, DOCUMENT_EXTENSION)
    }

    async fn load(&self, key: &str) -> Result<Option<Comment>> {
        match self.storage.get(key).await {
            Ok(data) => Ok(Some(serde_json::from_slice(&data)?)),
            Err(Error::ObjectNotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl CommentStore for ObjectStore {
    async fn find_all(&self) -> Result<Vec<Comment>> {
        let keys: Vec<String> = self
            .storage
            .list(&self.collection)
            .await?
            .into_iter()
            .filter(|k| k.ends_with(DOCUMENT_EXTENSION))
            .collect();

        // `buffered` keeps key order. A concurrent delete may remove a
        // document between list and get, which loads as `None`.
        let loaded: Vec<Option<Comment>> = stream::iter(keys)
            .map(|key| async move { self.load(&key).await })
            .buffered(LOAD_CONCURRENCY)
            .try_collect()
            .await?;
        let comments: Vec<Comment> = loaded.into_iter().flatten().collect();

        tracing::debug!(
            collection = %self.collection,
            count = comments.len(),
            "Listed comments"
        );
        Ok(comments)
    }

    async fn insert_one(&self, fields: Fields) -> Result<Comment> {
        let comment = Comment::new(CommentId::generate(), fields);
        let data = Bytes::from(serde_json::to_vec(&comment)?);

        self.storage
            .put(&self.document_key(&comment.id), data)
            .await?;

        tracing::debug!(collection = %self.collection, id = %comment.id, "Inserted comment");
        Ok(comment)
    }

    async fn delete_by_id(&self, id: &str) -> Result<Option<Comment>> {
        let id = CommentId::parse(id)?;
        let key = self.document_key(&id);

        let Some(comment) = self.load(&key).await? else {
            return Ok(None);
        };

        // Lost a race with another delete of the same id
        if !self.storage.delete(&key).await? {
            return Ok(None);
        }

        tracing::debug!(collection = %self.collection, %id, "Deleted comment");
        Ok(Some(comment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::local::LocalStorage;
    use serde_json::json;
    use tempfile::TempDir;

    fn store(temp_dir: &TempDir) -> ObjectStore {
        let storage = Arc::new(LocalStorage::new(temp_dir.path()).unwrap());
        ObjectStore::new(storage, "comments")
    }

    fn fields(value: serde_json::Value) -> Fields {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_insert_writes_one_document_per_comment() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(&temp_dir);

        let comment = store
            .insert_one(fields(json!({ "text": "hi", "author": "sam" })))
            .await
            .unwrap();

        let path = temp_dir
            .path()
            .join("comments")
            .join(format!("{}.json", comment.id));
        let on_disk: serde_json::Value =
            serde_json::from_slice(&std::fs::read(path).unwrap()).unwrap();
        assert_eq!(
            on_disk,
            json!({ "_id": comment.id.to_string(), "text": "hi", "author": "sam" })
        );
    }

    #[tokio::test]
    async fn test_find_all_returns_creation_order() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(&temp_dir);

        let mut created = Vec::new();
        for i in 0..5 {
            created.push(store.insert_one(fields(json!({ "n": i }))).await.unwrap());
        }

        assert_eq!(store.find_all().await.unwrap(), created);
    }

    #[tokio::test]
    async fn test_find_all_keeps_order_beyond_one_batch() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(&temp_dir);

        let mut created = Vec::new();
        for i in 0..(LOAD_CONCURRENCY * 3 + 1) {
            created.push(store.insert_one(fields(json!({ "n": i }))).await.unwrap());
        }

        assert_eq!(store.find_all().await.unwrap(), created);
    }

    #[tokio::test]
    async fn test_concurrent_deletes_of_one_id() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(&temp_dir);
        let comment = store.insert_one(fields(json!({ "text": "once" }))).await.unwrap();
        let id = comment.id.to_string();

        let results = futures::future::join_all((0..8).map(|_| store.delete_by_id(&id))).await;
        let removed = results
            .into_iter()
            .filter(|r| r.as_ref().unwrap().is_some())
            .count();

        assert_eq!(removed, 1);
        assert!(store.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_find_all_skips_foreign_files() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(&temp_dir);
        let comment = store.insert_one(fields(json!({ "text": "a" }))).await.unwrap();

        std::fs::write(temp_dir.path().join("comments").join("README"), b"notes").unwrap();

        assert_eq!(store.find_all().await.unwrap(), vec![comment]);
    }

    #[tokio::test]
    async fn test_delete_by_id() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(&temp_dir);

        let keep = store.insert_one(fields(json!({ "text": "keep" }))).await.unwrap();
        let gone = store.insert_one(fields(json!({ "text": "gone" }))).await.unwrap();

        let removed = store.delete_by_id(&gone.id.to_string()).await.unwrap();
        assert_eq!(removed, Some(gone.clone()));
        assert_eq!(store.find_all().await.unwrap(), vec![keep]);

        assert_eq!(store.delete_by_id(&gone.id.to_string()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_rejects_path_like_ids() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(&temp_dir);

        let result = store.delete_by_id("../../etc/passwd").await;
        assert!(matches!(result, Err(Error::InvalidId(_))));
    }

    #[tokio::test]
    async fn test_corrupt_document_surfaces_as_error() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(&temp_dir);
        let comment = store.insert_one(fields(json!({ "text": "a" }))).await.unwrap();

        let path = temp_dir
            .path()
            .join("comments")
            .join(format!("{}.json", comment.id));
        std::fs::write(path, b"{ not json").unwrap();

        assert!(matches!(
            store.find_all().await,
            Err(Error::Serialization(_))
        ));
    }
}
