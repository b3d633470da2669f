use async_trait::async_trait;
use sqlx::PgPool;

use crate::core::database;

/// Liveness check against the metadata database
#[async_trait]
pub trait DatabaseHealth: Send + Sync {
    async fn ping(&self) -> Result<(), sqlx::Error>;
}

/// Pings a pooled Postgres connection
pub struct PgDatabaseHealth {
    pool: PgPool,
}

impl PgDatabaseHealth {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DatabaseHealth for PgDatabaseHealth {
    async fn ping(&self) -> Result<(), sqlx::Error> {
        database::ping(&self.pool).await
    }
}
