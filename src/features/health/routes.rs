use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::health::handlers;
use crate::features::health::services::DatabaseHealth;

/// Create routes for the health feature
pub fn routes(health: Arc<dyn DatabaseHealth>) -> Router {
    Router::new()
        .route("/api/health/db", get(handlers::check_db))
        .with_state(health)
}
