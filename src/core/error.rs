use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::modules::storage::StorageError;
use crate::shared::types::ApiResponse;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Failed to upload to storage: {0}")]
    Storage(#[from] StorageError),

    /// The object reached the store but its metadata row was never written.
    #[error("File uploaded to storage but failed to save metadata: {source}")]
    OrphanedObject {
        s3_key: String,
        #[source]
        source: Box<AppError>,
    },

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    ServiceUnavailable(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Database(_)
            | AppError::Storage(_)
            | AppError::OrphanedObject { .. }
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = match self {
            AppError::Database(ref e) => {
                tracing::error!("Database error: {:?}", e);
                self.to_string()
            }
            AppError::Storage(ref e) => {
                tracing::error!("Storage error: {}", e);
                self.to_string()
            }
            AppError::OrphanedObject { ref s3_key, .. } => {
                tracing::error!(s3_key = %s3_key, "Orphaned object: {}", self);
                self.to_string()
            }
            AppError::ServiceUnavailable(ref msg) => {
                tracing::warn!("Service unavailable: {}", msg);
                msg.clone()
            }
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                "Internal server error".to_string()
            }
            AppError::NotFound(msg) | AppError::BadRequest(msg) => msg,
        };

        let body = Json(ApiResponse::<()>::fail(message));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
