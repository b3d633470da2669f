use std::sync::Arc;

use axum::{extract::State, Json};

use crate::core::error::{AppError, Result};
use crate::features::health::services::DatabaseHealth;
use crate::shared::types::ApiResponse;

/// Check database connectivity
#[utoipa::path(
    get,
    path = "/api/health/db",
    tag = "health",
    responses(
        (status = 200, description = "Database reachable"),
        (status = 503, description = "Database unreachable")
    )
)]
pub async fn check_db(
    State(health): State<Arc<dyn DatabaseHealth>>,
) -> Result<Json<ApiResponse<()>>> {
    health.ping().await.map_err(|e| {
        AppError::ServiceUnavailable(format!("Database connection failed: {}", e))
    })?;

    Ok(Json(ApiResponse::success(
        None,
        Some("Database connection is healthy".to_string()),
    )))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{json, Value};
    use std::sync::Arc;

    use crate::features::health::routes;
    use crate::shared::test_helpers::StubDatabaseHealth;

    #[tokio::test]
    async fn test_healthy_database() {
        let server =
            TestServer::new(routes(Arc::new(StubDatabaseHealth { healthy: true }))).unwrap();

        let response = server.get("/api/health/db").await;

        response.assert_status_ok();
        response.assert_json(&json!({
            "status": "success",
            "message": "Database connection is healthy"
        }));
    }

    #[tokio::test]
    async fn test_unhealthy_database() {
        let server =
            TestServer::new(routes(Arc::new(StubDatabaseHealth { healthy: false }))).unwrap();

        let response = server.get("/api/health/db").await;

        response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
        let body: Value = response.json();
        assert_eq!(body["status"], "fail");
        assert!(body["message"]
            .as_str()
            .unwrap()
            .starts_with("Database connection failed:"));
    }
}
