use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::files::models::UploadedFile;

/// Upload file request DTO for OpenAPI documentation
/// Note: This struct is for Swagger UI documentation only.
/// The actual handler uses axum's Multipart extractor directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UploadFileDto {
    /// The file to upload
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub file: String,
}

/// Metadata record of an uploaded file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FileResponseDto {
    /// Database-assigned identifier
    pub id: i32,
    /// Original filename as uploaded
    pub filename: String,
    /// Object name in the bucket (`<uuid><ext>`)
    pub s3_key: String,
    /// MIME type sent with the upload, may be empty
    pub content_type: String,
    /// Payload size in bytes
    pub size_bytes: i64,
    /// Timestamp when the record was created
    pub created_at: DateTime<Utc>,
}

impl From<UploadedFile> for FileResponseDto {
    fn from(file: UploadedFile) -> Self {
        Self {
            id: file.id,
            filename: file.filename,
            s3_key: file.s3_key,
            content_type: file.content_type,
            size_bytes: file.size_bytes,
            created_at: file.created_at,
        }
    }
}

/// One page of file records plus pagination metadata
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FileListResponseDto {
    pub files: Vec<FileResponseDto>,
    /// Total number of records
    pub total: i64,
    /// Effective page size after clamping
    pub limit: i64,
    pub offset: i64,
}

/// Response DTO for delete operations
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteFileResponseDto {
    /// Storage key freed by the delete; the object itself is left in the bucket
    pub s3_key: String,
}
