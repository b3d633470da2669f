use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::files::dtos::{FileListResponseDto, FileResponseDto};
use crate::features::files::models::NewUploadedFile;
use crate::features::files::repositories::FileRepository;
use crate::modules::storage::{ObjectStore, StorageError};
use crate::shared::constants::FALLBACK_CONTENT_TYPE;

/// Extension of the final path component, dot included.
///
/// Everything from the last `.` of the base name onward, or an empty string
/// when the name has no dot.
pub fn file_extension(filename: &str) -> &str {
    let base = filename
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or(filename);

    match base.rfind('.') {
        Some(idx) => &base[idx..],
        None => "",
    }
}

/// Fresh storage key for an upload: a random UUID followed by the original extension
pub fn storage_key_for(filename: &str) -> String {
    format!("{}{}", Uuid::new_v4(), file_extension(filename))
}

/// Service for the upload workflow and metadata record management
pub struct FileService {
    repository: Arc<dyn FileRepository>,
    store: Arc<dyn ObjectStore>,
    upload_timeout: Duration,
    max_upload_size: usize,
}

impl FileService {
    pub fn new(
        repository: Arc<dyn FileRepository>,
        store: Arc<dyn ObjectStore>,
        upload_timeout: Duration,
        max_upload_size: usize,
    ) -> Self {
        Self {
            repository,
            store,
            upload_timeout,
            max_upload_size,
        }
    }

    /// Largest accepted file payload in bytes
    pub fn max_upload_size(&self) -> usize {
        self.max_upload_size
    }

    /// Store an uploaded file and record its metadata.
    ///
    /// The object is written first; the metadata row second. When the insert
    /// fails the object stays in the bucket and the error carries its key as
    /// [`AppError::OrphanedObject`]. Nothing is rolled back.
    pub async fn upload_file(
        &self,
        filename: &str,
        content_type: &str,
        data: &[u8],
    ) -> Result<FileResponseDto> {
        let s3_key = storage_key_for(filename);
        let store_content_type = if content_type.is_empty() {
            FALLBACK_CONTENT_TYPE
        } else {
            content_type
        };

        tokio::time::timeout(
            self.upload_timeout,
            self.store.put_object(&s3_key, data, store_content_type),
        )
        .await
        .map_err(|_| StorageError::Timeout(self.upload_timeout.as_secs()))??;

        debug!(
            "File uploaded to bucket '{}': {}",
            self.store.bucket_name(),
            s3_key
        );

        let new_file = NewUploadedFile {
            filename: filename.to_string(),
            s3_key: s3_key.clone(),
            content_type: content_type.to_string(),
            size_bytes: data.len() as i64,
        };

        let file = match self.repository.create(new_file).await {
            Ok(file) => file,
            Err(e) => {
                error!(
                    s3_key = %s3_key,
                    bucket = %self.store.bucket_name(),
                    error = %e,
                    "Object stored but metadata insert failed; object is orphaned"
                );
                return Err(AppError::OrphanedObject {
                    s3_key,
                    source: Box::new(e),
                });
            }
        };

        info!(
            "File metadata saved: id={}, key={}, size={}",
            file.id, file.s3_key, file.size_bytes
        );

        Ok(file.into())
    }

    /// One page of records, newest first, with the total count.
    ///
    /// `limit` and `offset` are expected to be clamped already.
    pub async fn list_files(&self, limit: i64, offset: i64) -> Result<FileListResponseDto> {
        let (files, total) = tokio::try_join!(
            self.repository.list(limit, offset),
            self.repository.count()
        )?;

        Ok(FileListResponseDto {
            files: files.into_iter().map(Into::into).collect(),
            total,
            limit,
            offset,
        })
    }

    pub async fn get_file(&self, id: i32) -> Result<FileResponseDto> {
        let file = self.repository.get_by_id(id).await?;
        Ok(file.into())
    }

    /// Delete a metadata record and return its storage key.
    ///
    /// The stored object is left untouched.
    pub async fn delete_file(&self, id: i32) -> Result<String> {
        let s3_key = self.repository.delete(id).await?;
        info!("File record deleted: id={}, key={}", id, s3_key);
        Ok(s3_key)
    }
}
