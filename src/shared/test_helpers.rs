//! In-memory stand-ins for the database and object store used by tests,
//! plus a schema-isolated pool for tests that need a real PostgreSQL.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use crate::core::error::{AppError, Result};
use crate::features::files::models::{NewUploadedFile, UploadedFile};
use crate::features::files::repositories::FileRepository;
use crate::features::health::services::DatabaseHealth;
use crate::modules::storage::{ObjectStore, StorageError, StorageResult};

#[derive(Default)]
pub struct InMemoryFileRepository {
    rows: Mutex<Vec<UploadedFile>>,
    next_id: Mutex<i32>,
    fail_inserts: bool,
}

impl InMemoryFileRepository {
    /// Repository whose inserts always fail with a database error
    pub fn failing_inserts() -> Self {
        Self {
            fail_inserts: true,
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl FileRepository for InMemoryFileRepository {
    async fn create(&self, file: NewUploadedFile) -> Result<UploadedFile> {
        if self.fail_inserts {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }

        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|row| row.s3_key == file.s3_key) {
            return Err(AppError::Database(sqlx::Error::Protocol(
                "duplicate key value violates unique constraint".to_string(),
            )));
        }

        let mut next_id = self.next_id.lock().unwrap();
        *next_id += 1;

        let record = UploadedFile {
            id: *next_id,
            filename: file.filename,
            s3_key: file.s3_key,
            content_type: file.content_type,
            size_bytes: file.size_bytes,
            created_at: Utc::now(),
        };
        rows.push(record.clone());
        Ok(record)
    }

    async fn get_by_id(&self, id: i32) -> Result<UploadedFile> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|row| row.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("File not found".to_string()))
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<UploadedFile>> {
        let mut rows = self.rows.lock().unwrap().clone();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Ok(rows
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn delete(&self, id: i32) -> Result<String> {
        let mut rows = self.rows.lock().unwrap();
        let index = rows
            .iter()
            .position(|row| row.id == id)
            .ok_or_else(|| AppError::NotFound("File not found or already deleted".to_string()))?;
        Ok(rows.remove(index).s3_key)
    }

    async fn count(&self) -> Result<i64> {
        Ok(self.rows.lock().unwrap().len() as i64)
    }
}

/// Object store keeping `(bytes, content_type)` per key
#[derive(Default)]
pub struct InMemoryObjectStore {
    objects: Mutex<HashMap<String, (Vec<u8>, String)>>,
    fail: bool,
    delay: Option<Duration>,
}

impl InMemoryObjectStore {
    /// Store rejecting every upload
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Store that stalls before accepting an upload
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn object(&self, key: &str) -> Option<(Vec<u8>, String)> {
        self.objects.lock().unwrap().get(key).cloned()
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn put_object(&self, key: &str, data: &[u8], content_type: &str) -> StorageResult<()> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(StorageError::UploadFailed("access denied".to_string()));
        }

        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), (data.to_vec(), content_type.to_string()));
        Ok(())
    }

    fn bucket_name(&self) -> String {
        "test-bucket".to_string()
    }
}

/// Health probe with a fixed answer
pub struct StubDatabaseHealth {
    pub healthy: bool,
}

#[async_trait]
impl DatabaseHealth for StubDatabaseHealth {
    async fn ping(&self) -> std::result::Result<(), sqlx::Error> {
        if self.healthy {
            Ok(())
        } else {
            Err(sqlx::Error::PoolTimedOut)
        }
    }
}

/// Pool on a freshly created schema named `schema`, reached through `DATABASE_URL`.
///
/// Every connection has `search_path` set to that schema, so unqualified table
/// names never touch another test's data.
pub async fn isolated_pg_pool(schema: &str) -> PgPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let options: PgConnectOptions = url.parse().expect("DATABASE_URL must be a Postgres URL");

    let admin = PgPool::connect_with(options.clone()).await.unwrap();
    let reset = format!(
        "DROP SCHEMA IF EXISTS {schema} CASCADE; CREATE SCHEMA {schema};",
        schema = schema
    );
    sqlx::raw_sql(&reset).execute(&admin).await.unwrap();
    admin.close().await;

    PgPoolOptions::new()
        .max_connections(2)
        .connect_with(options.options([("search_path", schema)]))
        .await
        .unwrap()
}
