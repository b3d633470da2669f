use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, Query, State},
    Json,
};
use std::sync::Arc;
use tracing::debug;

use crate::core::error::{AppError, Result};
use crate::features::files::dtos::{
    DeleteFileResponseDto, FileListResponseDto, FileResponseDto, UploadFileDto,
};
use crate::features::files::services::FileService;
use crate::shared::types::{ApiResponse, PaginationQuery};

/// Multipart field carrying the uploaded file
const FILE_FIELD: &str = "file";

fn parse_file_id(raw: &str) -> Result<i32> {
    raw.parse::<i32>()
        .map_err(|_| AppError::BadRequest("Invalid file ID".to_string()))
}

/// Upload a file
///
/// Accepts multipart/form-data with a `file` part. The bytes are stored in the
/// bucket under a fresh `<uuid><ext>` key, then the metadata record is saved.
#[utoipa::path(
    post,
    path = "/api/upload",
    tag = "files",
    request_body(
        content = UploadFileDto,
        content_type = "multipart/form-data",
        description = "File upload form",
    ),
    responses(
        (status = 200, description = "File uploaded successfully", body = ApiResponse<FileResponseDto>),
        (status = 400, description = "No file provided, file too large, or malformed multipart body"),
        (status = 500, description = "Storage failure, or object stored but metadata not saved")
    )
)]
pub async fn upload_file(
    State(service): State<Arc<FileService>>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<ApiResponse<FileResponseDto>>> {
    let mut multipart =
        multipart.map_err(|e| AppError::BadRequest(format!("No file provided: {}", e)))?;

    let mut upload = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        if field.name() != Some(FILE_FIELD) {
            debug!("Ignoring field: {:?}", field.name());
            continue;
        }

        // A `file` part without a filename is a plain form value, not a file
        let Some(file_name) = field.file_name().map(|s| s.to_string()) else {
            debug!("Ignoring `file` field without filename");
            continue;
        };

        let content_type = field
            .content_type()
            .map(|s| s.to_string())
            .unwrap_or_default();

        let data = field.bytes().await.map_err(|e| {
            debug!("Failed to read file bytes: {}", e);
            AppError::BadRequest(format!("Failed to read file data: {}", e))
        })?;

        upload = Some((file_name, content_type, data));
        break;
    }

    let (file_name, content_type, data) =
        upload.ok_or_else(|| AppError::BadRequest("No file provided".to_string()))?;

    let max_size = service.max_upload_size();
    if data.len() > max_size {
        return Err(AppError::BadRequest(format!(
            "File too large. Maximum size is {} bytes ({} MB)",
            max_size,
            max_size / 1024 / 1024
        )));
    }

    let file = service
        .upload_file(&file_name, &content_type, &data)
        .await?;

    Ok(Json(ApiResponse::success(
        Some(file),
        Some("File uploaded successfully".to_string()),
    )))
}

/// List uploaded files, newest first
#[utoipa::path(
    get,
    path = "/api/files",
    tag = "files",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Page of file records", body = ApiResponse<FileListResponseDto>),
        (status = 500, description = "Database error")
    )
)]
pub async fn list_files(
    State(service): State<Arc<FileService>>,
    Query(query): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<FileListResponseDto>>> {
    let page = service.list_files(query.limit(), query.offset()).await?;
    Ok(Json(ApiResponse::success(Some(page), None)))
}

/// Get a file record by ID
#[utoipa::path(
    get,
    path = "/api/files/{id}",
    tag = "files",
    params(
        ("id" = i32, Path, description = "File record ID")
    ),
    responses(
        (status = 200, description = "File record", body = ApiResponse<FileResponseDto>),
        (status = 400, description = "Invalid file ID"),
        (status = 404, description = "File not found")
    )
)]
pub async fn get_file(
    State(service): State<Arc<FileService>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<FileResponseDto>>> {
    let id = parse_file_id(&id)?;
    let file = service.get_file(id).await?;
    Ok(Json(ApiResponse::success(Some(file), None)))
}

/// Delete a file record by ID
///
/// Only the metadata row is removed. The returned `s3_key` names the object,
/// which stays in the bucket.
#[utoipa::path(
    delete,
    path = "/api/files/{id}",
    tag = "files",
    params(
        ("id" = i32, Path, description = "File record ID")
    ),
    responses(
        (status = 200, description = "File record deleted", body = ApiResponse<DeleteFileResponseDto>),
        (status = 400, description = "Invalid file ID"),
        (status = 404, description = "File not found or already deleted")
    )
)]
pub async fn delete_file(
    State(service): State<Arc<FileService>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<DeleteFileResponseDto>>> {
    let id = parse_file_id(&id)?;
    let s3_key = service.delete_file(id).await?;

    Ok(Json(ApiResponse::success(
        Some(DeleteFileResponseDto { s3_key }),
        Some("File record deleted".to_string()),
    )))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum_test::multipart::{MultipartForm, Part};
    use axum_test::TestServer;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use std::time::Duration;
    use uuid::Uuid;

    use crate::features::files::routes;
    use crate::features::files::services::FileService;
    use crate::shared::test_helpers::{InMemoryFileRepository, InMemoryObjectStore};

    const MAX_UPLOAD: usize = 1024 * 1024;

    fn server_with(repository: InMemoryFileRepository, store: InMemoryObjectStore) -> TestServer {
        let service = Arc::new(FileService::new(
            Arc::new(repository),
            Arc::new(store),
            Duration::from_secs(5),
            MAX_UPLOAD,
        ));
        TestServer::new(routes(service)).unwrap()
    }

    fn server() -> TestServer {
        server_with(
            InMemoryFileRepository::default(),
            InMemoryObjectStore::default(),
        )
    }

    fn file_form(name: &str, content_type: &str, data: &[u8]) -> MultipartForm {
        MultipartForm::new().add_part(
            "file",
            Part::bytes(data.to_vec())
                .file_name(name)
                .mime_type(content_type),
        )
    }

    async fn upload(server: &TestServer, name: &str, data: &[u8]) -> Value {
        let response = server
            .post("/api/upload")
            .multipart(file_form(name, "text/plain", data))
            .await;
        response.assert_status_ok();
        response.json::<Value>()["data"].clone()
    }

    #[tokio::test]
    async fn test_upload_get_delete_lifecycle() {
        let server = server();

        let response = server
            .post("/api/upload")
            .multipart(file_form("a.txt", "text/plain", b"0123456789"))
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["status"], "success");
        assert_eq!(body["message"], "File uploaded successfully");

        let record = &body["data"];
        assert_eq!(record["filename"], "a.txt");
        assert_eq!(record["content_type"], "text/plain");
        assert_eq!(record["size_bytes"], 10);

        let key = record["s3_key"].as_str().unwrap();
        let (uuid_part, ext) = key.split_at(36);
        assert!(Uuid::parse_str(uuid_part).is_ok());
        assert_eq!(ext, ".txt");

        let id = record["id"].as_i64().unwrap();
        let fetched = server.get(&format!("/api/files/{}", id)).await;
        fetched.assert_status_ok();
        assert_eq!(fetched.json::<Value>()["data"], *record);

        let deleted = server.delete(&format!("/api/files/{}", id)).await;
        deleted.assert_status_ok();
        deleted.assert_json(&json!({
            "status": "success",
            "data": { "s3_key": key },
            "message": "File record deleted"
        }));

        let gone = server.get(&format!("/api/files/{}", id)).await;
        gone.assert_status(StatusCode::NOT_FOUND);
        gone.assert_json(&json!({ "status": "fail", "message": "File not found" }));

        let listed: Value = server.get("/api/files").await.json();
        assert_eq!(listed["data"]["total"], 0);
        assert_eq!(listed["data"]["files"], json!([]));
    }

    #[tokio::test]
    async fn test_upload_size_limit() {
        let server = server();

        let response = server
            .post("/api/upload")
            .multipart(file_form(
                "full.bin",
                "application/octet-stream",
                &vec![7u8; MAX_UPLOAD],
            ))
            .await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["data"]["size_bytes"], MAX_UPLOAD);

        let response = server
            .post("/api/upload")
            .multipart(file_form(
                "over.bin",
                "application/octet-stream",
                &vec![7u8; MAX_UPLOAD + 1],
            ))
            .await;
        response.assert_status_bad_request();
        response.assert_json(&json!({
            "status": "fail",
            "message": "File too large. Maximum size is 1048576 bytes (1 MB)"
        }));

        let listed: Value = server.get("/api/files").await.json();
        assert_eq!(listed["data"]["total"], 1);
    }

    #[tokio::test]
    async fn test_same_name_uploads_get_distinct_keys() {
        let server = server();

        let first = upload(&server, "report.pdf", b"one").await;
        let second = upload(&server, "report.pdf", b"two").await;

        assert_ne!(first["s3_key"], second["s3_key"]);
        assert_ne!(first["id"], second["id"]);
    }

    #[tokio::test]
    async fn test_upload_without_file_part() {
        let server = server();

        let response = server
            .post("/api/upload")
            .multipart(MultipartForm::new().add_text("note", "hello"))
            .await;
        response.assert_status_bad_request();
        response.assert_json(&json!({ "status": "fail", "message": "No file provided" }));

        // `file` sent as a plain text value
        let response = server
            .post("/api/upload")
            .multipart(MultipartForm::new().add_text("file", "not a file"))
            .await;
        response.assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_upload_requires_multipart_body() {
        let server = server();

        let response = server.post("/api/upload").json(&json!({"file": "x"})).await;

        response.assert_status_bad_request();
        assert_eq!(response.json::<Value>()["status"], "fail");
    }

    #[tokio::test]
    async fn test_upload_storage_failure() {
        let server = server_with(
            InMemoryFileRepository::default(),
            InMemoryObjectStore::failing(),
        );

        let response = server
            .post("/api/upload")
            .multipart(file_form("a.txt", "text/plain", b"0123456789"))
            .await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let message = response.json::<Value>()["message"]
            .as_str()
            .unwrap()
            .to_string();
        assert!(message.starts_with("Failed to upload to storage:"));
    }

    #[tokio::test]
    async fn test_upload_metadata_failure_is_reported_distinctly() {
        let server = server_with(
            InMemoryFileRepository::failing_inserts(),
            InMemoryObjectStore::default(),
        );

        let response = server
            .post("/api/upload")
            .multipart(file_form("a.txt", "text/plain", b"0123456789"))
            .await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let message = response.json::<Value>()["message"]
            .as_str()
            .unwrap()
            .to_string();
        assert!(message.starts_with("File uploaded to storage but failed to save metadata:"));
    }

    #[tokio::test]
    async fn test_invalid_and_missing_ids() {
        let server = server();

        let response = server.get("/api/files/abc").await;
        response.assert_status_bad_request();
        response.assert_json(&json!({ "status": "fail", "message": "Invalid file ID" }));

        server
            .delete("/api/files/1.5")
            .await
            .assert_status_bad_request();

        // Beyond the SERIAL id range
        server
            .get("/api/files/2147483648")
            .await
            .assert_status_bad_request();

        server
            .get("/api/files/999")
            .await
            .assert_status(StatusCode::NOT_FOUND);

        let response = server.delete("/api/files/999").await;
        response.assert_status(StatusCode::NOT_FOUND);
        response.assert_json(&json!({
            "status": "fail",
            "message": "File not found or already deleted"
        }));
    }

    #[tokio::test]
    async fn test_list_pagination() {
        let server = server();
        for name in ["a.txt", "b.txt", "c.txt"] {
            upload(&server, name, b"data").await;
        }

        let body: Value = server.get("/api/files").await.json();
        let data = &body["data"];
        assert_eq!(data["total"], 3);
        assert_eq!(data["limit"], 20);
        assert_eq!(data["offset"], 0);
        assert_eq!(data["files"][0]["filename"], "c.txt");

        let body: Value = server
            .get("/api/files")
            .add_query_param("limit", 100000)
            .await
            .json();
        assert_eq!(body["data"]["limit"], 100);
        assert_eq!(body["data"]["files"].as_array().unwrap().len(), 3);

        let body: Value = server
            .get("/api/files")
            .add_query_param("limit", 1)
            .add_query_param("offset", 1)
            .await
            .json();
        assert_eq!(body["data"]["files"].as_array().unwrap().len(), 1);
        assert_eq!(body["data"]["files"][0]["filename"], "b.txt");

        let response = server
            .get("/api/files")
            .add_query_param("offset", 50)
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"]["files"], json!([]));
        assert_eq!(body["data"]["total"], 3);

        let body: Value = server
            .get("/api/files")
            .add_query_param("limit", "lots")
            .await
            .json();
        assert_eq!(body["data"]["limit"], 20);
    }
}
