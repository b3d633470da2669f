use async_trait::async_trait;
use sqlx::{PgPool, Postgres};

use crate::core::error::{AppError, Result};
use crate::features::files::models::{NewUploadedFile, UploadedFile};

/// CRUD access to the `uploaded_files` table.
///
/// `list` applies no upper bound on `limit`; callers clamp it.
#[async_trait]
pub trait FileRepository: Send + Sync {
    /// Insert a record, returning it with the generated `id` and `created_at`
    async fn create(&self, file: NewUploadedFile) -> Result<UploadedFile>;

    async fn get_by_id(&self, id: i32) -> Result<UploadedFile>;

    /// Newest first
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<UploadedFile>>;

    /// Delete a record and return the storage key it referenced
    async fn delete(&self, id: i32) -> Result<String>;

    async fn count(&self) -> Result<i64>;
}

/// Postgres-backed file repository
#[derive(Clone)]
pub struct PgFileRepository {
    pool: PgPool,
}

impl PgFileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FileRepository for PgFileRepository {
    #[tracing::instrument(skip(self, file), fields(db.table = "uploaded_files", db.operation = "insert", s3_key = %file.s3_key))]
    async fn create(&self, file: NewUploadedFile) -> Result<UploadedFile> {
        let record = sqlx::query_as::<Postgres, UploadedFile>(
            r#"
            INSERT INTO uploaded_files (filename, s3_key, content_type, size_bytes)
            VALUES ($1, $2, $3, $4)
            RETURNING id, filename, s3_key, content_type, size_bytes, created_at
            "#,
        )
        .bind(&file.filename)
        .bind(&file.s3_key)
        .bind(&file.content_type)
        .bind(file.size_bytes)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    #[tracing::instrument(skip(self), fields(db.table = "uploaded_files", db.operation = "select", db.record_id = %id))]
    async fn get_by_id(&self, id: i32) -> Result<UploadedFile> {
        sqlx::query_as::<Postgres, UploadedFile>(
            r#"
            SELECT id, filename, s3_key, content_type, size_bytes, created_at
            FROM uploaded_files
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("File not found".to_string()))
    }

    #[tracing::instrument(skip(self), fields(db.table = "uploaded_files", db.operation = "select"))]
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<UploadedFile>> {
        let files = sqlx::query_as::<Postgres, UploadedFile>(
            r#"
            SELECT id, filename, s3_key, content_type, size_bytes, created_at
            FROM uploaded_files
            ORDER BY created_at DESC, id DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(files)
    }

    #[tracing::instrument(skip(self), fields(db.table = "uploaded_files", db.operation = "delete", db.record_id = %id))]
    async fn delete(&self, id: i32) -> Result<String> {
        sqlx::query_scalar::<Postgres, String>(
            "DELETE FROM uploaded_files WHERE id = $1 RETURNING s3_key",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("File not found or already deleted".to_string()))
    }

    #[tracing::instrument(skip(self), fields(db.table = "uploaded_files", db.operation = "count"))]
    async fn count(&self) -> Result<i64> {
        let total = sqlx::query_scalar::<Postgres, i64>("SELECT COUNT(*) FROM uploaded_files")
            .fetch_one(&self.pool)
            .await?;

        Ok(total)
    }
}
