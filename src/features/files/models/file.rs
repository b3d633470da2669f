use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for uploaded file metadata
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct UploadedFile {
    pub id: i32,
    pub filename: String,
    pub s3_key: String,
    pub content_type: String,
    pub size_bytes: i64,
    pub created_at: DateTime<Utc>,
}

/// Fields supplied by the upload workflow; `id` and `created_at` come from the database
#[derive(Debug, Clone)]
pub struct NewUploadedFile {
    pub filename: String,
    pub s3_key: String,
    pub content_type: String,
    pub size_bytes: i64,
}
