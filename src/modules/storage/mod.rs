//! Storage module for uploaded objects
//!
//! Defines the [`ObjectStore`] seam used by the upload workflow and an
//! S3/S3-compatible implementation backed by rust-s3.

mod s3_client;

use async_trait::async_trait;
use thiserror::Error;

pub use s3_client::S3ObjectStore;

/// Object store operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    UploadFailed(String),

    #[error("upload timed out after {0}s")]
    Timeout(u64),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Write side of the object store.
///
/// Objects are never deleted through this trait: removing a metadata record
/// leaves its object in place.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `data` under `key` with an explicit content type.
    async fn put_object(&self, key: &str, data: &[u8], content_type: &str) -> StorageResult<()>;

    /// Name of the bucket objects are written to
    fn bucket_name(&self) -> String;
}
