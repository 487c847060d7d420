//! Object storage layer
//!
//! Key/value blobs on S3 or the local filesystem. The object-backed comment
//! store keeps one JSON document per key on top of this.

use async_trait::async_trait;
use bytes::Bytes;

use crate::Result;

pub mod local;
pub mod s3;

/// Storage backend trait
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Read an object. Missing keys yield [`crate::Error::ObjectNotFound`].
    async fn get(&self, key: &str) -> Result<Bytes>;

    /// Write an object, replacing any previous content
    async fn put(&self, key: &str, data: Bytes) -> Result<()>;

    /// Delete an object, reporting whether it existed
    async fn delete(&self, key: &str) -> Result<bool>;

    /// List keys directly under `prefix`, in lexical order
    async fn list(&self, prefix: &str) -> Result<Vec<String>>;
}

/// Storage configuration
#[derive(Debug, Clone, PartialEq)]
pub enum StorageConfig {
    S3 {
        bucket: String,
        region: String,
        endpoint: Option<String>,
        prefix: Option<String>,
    },
    Local {
        root_path: String,
    },
}

/// Create storage backend from config
pub async fn create_storage(config: StorageConfig) -> Result<Box<dyn StorageBackend>> {
    match config {
        StorageConfig::S3 {
            bucket,
            region,
            endpoint,
            prefix,
        } => {
            let backend = s3::S3Storage::new(bucket, region, endpoint, prefix).await?;
            Ok(Box::new(backend))
        }
        StorageConfig::Local { root_path } => {
            let backend = local::LocalStorage::new(root_path)?;
            Ok(Box::new(backend))
        }
    }
}
