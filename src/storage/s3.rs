//! S3 storage backend

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use bytes::Bytes;

use crate::{Error, Result};

use super::StorageBackend;

/// S3 storage backend
///
/// All keys are placed under an optional prefix so several deployments can
/// share one bucket.
pub struct S3Storage {
    client: Client,
    bucket: String,
    prefix: Option<String>,
}

impl S3Storage {
    pub async fn new(
        bucket: String,
        region: String,
        endpoint: Option<String>,
        prefix: Option<String>,
    ) -> Result<Self> {
        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region))
            .load()
            .await;

        let mut s3_config_builder = aws_sdk_s3::config::Builder::from(&config);

        if let Some(endpoint_url) = endpoint {
            s3_config_builder = s3_config_builder
                .endpoint_url(endpoint_url)
                .force_path_style(true);
        }

        let client = Client::from_conf(s3_config_builder.build());
        let prefix = prefix
            .map(|p| p.trim_matches('/').to_string())
            .filter(|p| !p.is_empty());

        Ok(Self {
            client,
            bucket,
            prefix,
        })
    }

    fn full_key(&self, key: &str) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}/{}", prefix, key),
            None => key.to_string(),
        }
    }

    fn relative_key<'a>(&self, key: &'a str) -> &'a str {
        match &self.prefix {
            Some(prefix) => key
                .strip_prefix(prefix.as_str())
                .and_then(|k| k.strip_prefix('/'))
                .unwrap_or(key),
            None => key,
        }
    }
}

#[async_trait]
impl StorageBackend for S3Storage {
    async fn get(&self, key: &str) -> Result<Bytes> {
        let response = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(self.full_key(key))
            .send()
            .await
            .map_err(|e| match e.into_service_error() {
                err if err.is_no_such_key() => Error::ObjectNotFound(key.to_string()),
                err => Error::storage(format!("S3 get failed: {}", DisplayErrorContext(&err))),
            })?;

        let data = response
            .body
            .collect()
            .await
            .map_err(|e| Error::storage(format!("S3 body read failed: {}", e)))?;

        Ok(data.into_bytes())
    }

    async fn put(&self, key: &str, data: Bytes) -> Result<()> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(self.full_key(key))
            .content_type("application/json")
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|e| Error::storage(format!("S3 put failed: {}", DisplayErrorContext(&e))))?;

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let full_key = self.full_key(key);

        // DeleteObject succeeds for missing keys, so check existence first.
        // Not atomic: two racing deletes can both see the key and both
        // report true.
        match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(&full_key)
            .send()
            .await
        {
            Ok(_) => {}
            Err(e) => {
                let err = e.into_service_error();
                if err.is_not_found() {
                    return Ok(false);
                }
                return Err(Error::storage(format!(
                    "S3 head failed: {}",
                    DisplayErrorContext(&err)
                )));
            }
        }

        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(full_key)
            .send()
            .await
            .map_err(|e| Error::storage(format!("S3 delete failed: {}", DisplayErrorContext(&e))))?;

        Ok(true)
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>> {
        let list_prefix = format!("{}/", self.full_key(prefix.trim_end_matches('/')));
        let mut keys = Vec::new();
        let mut continuation_token = None;

        loop {
            let response = self
                .client
                .list_objects_v2()
                .bucket(&self.bucket)
                .prefix(&list_prefix)
                .delimiter("/")
                .set_continuation_token(continuation_token)
                .send()
                .await
                .map_err(|e| Error::storage(format!("S3 list failed: {}", DisplayErrorContext(&e))))?;

            keys.extend(
                response
                    .contents()
                    .iter()
                    .filter_map(|obj| obj.key())
                    .map(|k| self.relative_key(k).to_string()),
            );

            match response.next_continuation_token() {
                Some(token) => continuation_token = Some(token.to_string()),
                None => break,
            }
        }

        keys.sort();
        Ok(keys)
    }
}
