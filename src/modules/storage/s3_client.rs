//! S3 storage client
//!
//! Binds a rust-s3 bucket to the configured region using the default
//! credential chain (environment, profile files, instance metadata).
//! A custom endpoint switches to path-style addressing for MinIO and other
//! S3-compatible stores.

use async_trait::async_trait;
use s3::creds::Credentials;
use s3::{Bucket, Region};
use tracing::{debug, info};

use super::{ObjectStore, StorageError, StorageResult};
use crate::core::config::StorageConfig;

/// S3-backed object store
pub struct S3ObjectStore {
    bucket: Box<Bucket>,
}

impl S3ObjectStore {
    /// Create a new client from configuration.
    ///
    /// Fails with [`StorageError::Config`] when credentials or the region
    /// cannot be resolved.
    pub fn new(config: &StorageConfig) -> StorageResult<Self> {
        let credentials = Credentials::default().map_err(|e| {
            StorageError::Config(format!("Failed to resolve S3 credentials: {}", e))
        })?;

        let region = match &config.endpoint {
            Some(endpoint) => Region::Custom {
                region: config.region.clone(),
                endpoint: endpoint.clone(),
            },
            None => config.region.parse::<Region>().map_err(|e| {
                StorageError::Config(format!("Invalid AWS region '{}': {}", config.region, e))
            })?,
        };

        let mut bucket = Bucket::new(&config.bucket, region, credentials).map_err(|e| {
            StorageError::Config(format!(
                "Failed to create S3 bucket handle '{}': {}",
                config.bucket, e
            ))
        })?;

        if config.endpoint.is_some() {
            // http://endpoint/bucket instead of http://bucket.endpoint
            bucket.set_path_style();
        }

        info!(
            "S3 client initialized for bucket: {}, region: {}, endpoint: {}",
            config.bucket,
            config.region,
            config.endpoint.as_deref().unwrap_or("aws")
        );

        Ok(Self { bucket })
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put_object(&self, key: &str, data: &[u8], content_type: &str) -> StorageResult<()> {
        let response = self
            .bucket
            .put_object_with_content_type(key, data, content_type)
            .await
            .map_err(|e| StorageError::UploadFailed(e.to_string()))?;

        // Built without `fail-on-err`, so error statuses come back as data
        let status = response.status_code();
        if !(200..300).contains(&status) {
            return Err(StorageError::UploadFailed(format!(
                "object store responded with status {} for '{}'",
                status, key
            )));
        }

        debug!(
            "Uploaded '{}' ({} bytes) to bucket '{}'",
            key,
            data.len(),
            self.bucket.name()
        );
        Ok(())
    }

    fn bucket_name(&self) -> String {
        self.bucket.name()
    }
}
