use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::features::files::handlers::{delete_file, get_file, list_files, upload_file};
use crate::features::files::services::FileService;
use crate::shared::constants::MULTIPART_OVERHEAD;

/// Create routes for the files feature
pub fn routes(file_service: Arc<FileService>) -> Router {
    // Body limit leaves room for boundaries and part headers; the file itself
    // is checked against max_upload_size in the handler
    let body_limit = file_service.max_upload_size() + MULTIPART_OVERHEAD;

    Router::new()
        .route(
            "/api/upload",
            post(upload_file).layer(DefaultBodyLimit::max(body_limit)),
        )
        .route("/api/files", get(list_files))
        .route("/api/files/{id}", get(get_file).delete(delete_file))
        .with_state(file_service)
}
