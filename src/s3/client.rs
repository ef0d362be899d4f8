//! The object-store client seam.
//!
//! All network access goes through [`ObjectStoreClient`], so the sync
//! operations can run against an in-memory store in tests. The real
//! implementation wraps [`aws_sdk_s3::Client`].

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::StorageClass;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::error::SyncError;
use crate::utils::get_mime_type;

/// Provider options forwarded verbatim to the underlying client call.
///
/// Put-side fields (content type, cache control, storage class, metadata)
/// apply to uploads; `version_id` applies to downloads. Unset fields are
/// omitted from the request.
#[derive(Debug, Clone, Default)]
pub struct TransferOptions {
    pub content_type: Option<String>,
    pub cache_control: Option<String>,
    pub storage_class: Option<String>,
    pub metadata: HashMap<String, String>,
    pub version_id: Option<String>,
}

impl TransferOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn with_cache_control(mut self, cache_control: impl Into<String>) -> Self {
        self.cache_control = Some(cache_control.into());
        self
    }

    pub fn with_storage_class(mut self, storage_class: impl Into<String>) -> Self {
        self.storage_class = Some(storage_class.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// One page of a `list_objects_v2`-style prefix listing.
#[derive(Debug, Clone, Default)]
pub struct ListPage {
    /// Keys in the provider's listing order.
    pub keys: Vec<String>,
    /// Number of keys the provider reported for this page.
    pub key_count: usize,
    /// Whether more pages follow.
    pub is_truncated: bool,
    /// Cursor for the next page. Must be present when `is_truncated` is set.
    pub next_continuation_token: Option<String>,
}

/// Single-object transfer and prefix listing against one storage provider.
#[async_trait]
pub trait ObjectStoreClient: Send + Sync {
    /// Download one object to `local_path`. The parent directory must exist.
    async fn download_file(
        &self,
        bucket: &str,
        key: &str,
        local_path: &Path,
        opts: &TransferOptions,
    ) -> Result<(), SyncError>;

    /// Upload one local file to `key`, replacing any existing object.
    async fn upload_file(
        &self,
        bucket: &str,
        local_path: &Path,
        key: &str,
        opts: &TransferOptions,
    ) -> Result<(), SyncError>;

    /// Fetch one listing page for `prefix`, starting at `continuation_token`.
    async fn list_page(
        &self,
        bucket: &str,
        prefix: &str,
        continuation_token: Option<&str>,
    ) -> Result<ListPage, SyncError>;
}

/// [`ObjectStoreClient`] backed by the AWS SDK.
pub struct S3StoreClient {
    client: Client,
}

impl S3StoreClient {
    /// Creates a client from the default credential chain.
    pub async fn from_env(region: Option<String>) -> Self {
        let mut loader = aws_config::from_env();
        if let Some(region) = region {
            loader = loader.region(Region::new(region));
        }
        let config = loader.load().await;
        Self {
            client: Client::new(&config),
        }
    }

    /// Creates a client with explicit credentials and region.
    pub async fn with_credentials(
        acc_key: String,
        sec_key: String,
        sess_token: Option<String>,
        region: String,
    ) -> Self {
        let credentials = Credentials::new(acc_key, sec_key, sess_token, None, "manual");
        let config = aws_config::from_env()
            .credentials_provider(credentials)
            .region(Region::new(region))
            .load()
            .await;
        Self {
            client: Client::new(&config),
        }
    }

    /// Wraps a pre-configured SDK client.
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ObjectStoreClient for S3StoreClient {
    async fn download_file(
        &self,
        bucket: &str,
        key: &str,
        local_path: &Path,
        opts: &TransferOptions,
    ) -> Result<(), SyncError> {
        let mut request = self.client.get_object().bucket(bucket).key(key);
        if let Some(ref version_id) = opts.version_id {
            request = request.version_id(version_id);
        }

        let response = request.send().await.map_err(|err| {
            let service_err = err.into_service_error();
            if service_err.is_no_such_key() {
                SyncError::NotFound {
                    bucket: bucket.to_string(),
                    key: key.to_string(),
                }
            } else {
                SyncError::Provider {
                    message: service_err.to_string(),
                }
            }
        })?;

        let mut file = File::create(local_path)
            .await
            .map_err(|e| SyncError::io(local_path.display().to_string(), e))?;
        let mut body = response.body.into_async_read();
        tokio::io::copy(&mut body, &mut file)
            .await
            .map_err(|e| SyncError::io(local_path.display().to_string(), e))?;
        file.flush()
            .await
            .map_err(|e| SyncError::io(local_path.display().to_string(), e))?;

        Ok(())
    }

    async fn upload_file(
        &self,
        bucket: &str,
        local_path: &Path,
        key: &str,
        opts: &TransferOptions,
    ) -> Result<(), SyncError> {
        let body = ByteStream::from_path(local_path)
            .await
            .map_err(|e| SyncError::io(local_path.display().to_string(), e))?;

        let content_type = opts
            .content_type
            .clone()
            .unwrap_or_else(|| get_mime_type(local_path).to_string());

        let mut request = self
            .client
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_type(content_type)
            .body(body);
        if let Some(ref cache_control) = opts.cache_control {
            request = request.cache_control(cache_control);
        }
        if let Some(ref storage_class) = opts.storage_class {
            request = request.storage_class(StorageClass::from(storage_class.as_str()));
        }
        for (k, v) in &opts.metadata {
            request = request.metadata(k, v);
        }

        request.send().await.map_err(|err| SyncError::Provider {
            message: err.into_service_error().to_string(),
        })?;

        Ok(())
    }

    async fn list_page(
        &self,
        bucket: &str,
        prefix: &str,
        continuation_token: Option<&str>,
    ) -> Result<ListPage, SyncError> {
        let mut request = self.client.list_objects_v2().bucket(bucket).prefix(prefix);
        if let Some(token) = continuation_token {
            request = request.continuation_token(token);
        }

        let response = request.send().await.map_err(|err| SyncError::Provider {
            message: err.into_service_error().to_string(),
        })?;

        let keys = response
            .contents()
            .iter()
            .filter_map(|obj| obj.key().map(str::to_string))
            .collect::<Vec<_>>();

        Ok(ListPage {
            key_count: response.key_count().unwrap_or(0) as usize,
            keys,
            is_truncated: response.is_truncated().unwrap_or(false),
            next_continuation_token: response.next_continuation_token().map(str::to_string),
        })
    }
}
