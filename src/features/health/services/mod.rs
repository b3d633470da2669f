mod health_service;

pub use health_service::{DatabaseHealth, PgDatabaseHealth};
