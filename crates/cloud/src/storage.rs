//! S3-compatible object storage for product photos.

use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use serde::Serialize;

use crate::config::ObjectStoreConfig;
use crate::error::CloudError;

/// An uploaded object: its key and its public (unsigned) URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredObject {
    pub key: String,
    pub url: String,
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// False for the stand-in used when credentials are missing.
    fn is_configured(&self) -> bool {
        true
    }

    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<StoredObject, CloudError>;

    /// A time-limited GET URL for a private object.
    async fn signed_url(&self, key: &str, ttl: Duration) -> Result<String, CloudError>;
}

/// [`ObjectStore`] backed by any S3-compatible endpoint (Aliyun OSS, MinIO, S3).
pub struct S3ObjectStore {
    client: aws_sdk_s3::Client,
    bucket: String,
    public_base_url: String,
}

impl S3ObjectStore {
    /// Build a client from static credentials against a custom endpoint.
    pub async fn connect(config: &ObjectStoreConfig) -> Self {
        let credentials = aws_credential_types::Credentials::new(
            config.access_key_id.clone(),
            config.access_key_secret.clone(),
            None,
            None,
            "stockroom-env",
        );
        let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(config.region.clone()))
            .endpoint_url(config.endpoint.clone())
            .credentials_provider(credentials)
            .load()
            .await;

        Self {
            client: aws_sdk_s3::Client::new(&sdk_config),
            bucket: config.bucket.clone(),
            public_base_url: config.public_base_url.trim_end_matches('/').to_string(),
        }
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{key}", self.public_base_url)
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<StoredObject, CloudError> {
        let size = bytes.len();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| CloudError::Storage(DisplayErrorContext(&e).to_string()))?;

        tracing::debug!(key, size, "Stored object");
        Ok(StoredObject {
            key: key.to_string(),
            url: self.public_url(key),
        })
    }

    async fn signed_url(&self, key: &str, ttl: Duration) -> Result<String, CloudError> {
        let presigning =
            PresigningConfig::expires_in(ttl).map_err(|e| CloudError::Storage(e.to_string()))?;
        let request = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(|e| CloudError::Storage(DisplayErrorContext(&e).to_string()))?;
        Ok(request.uri().to_string())
    }
}
