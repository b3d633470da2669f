use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::home::handlers::{self, HomePage};

/// Create routes for the landing page
pub fn routes(page: Arc<HomePage>) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .with_state(page)
}
