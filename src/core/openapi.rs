use utoipa::{Modify, OpenApi};

use crate::features::files::{dtos as files_dtos, handlers as files_handlers};
use crate::features::health::handlers as health_handlers;
use crate::shared::types::ResponseStatus;

#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health_handlers::check_db,
        // Files
        files_handlers::upload_file,
        files_handlers::list_files,
        files_handlers::get_file,
        files_handlers::delete_file,
    ),
    components(
        schemas(
            // Shared
            ResponseStatus,
            // Files
            files_dtos::UploadFileDto,
            files_dtos::FileResponseDto,
            files_dtos::FileListResponseDto,
            files_dtos::DeleteFileResponseDto,
        )
    ),
    tags(
        (name = "health", description = "Dependency health checks"),
        (name = "files", description = "File upload and metadata management"),
    ),
    info(
        title = "Cloud Traveler API",
        version = "0.1.0",
        description = "File upload service backed by S3 and PostgreSQL",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_routes() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        for expected in [
            "/api/health/db",
            "/api/upload",
            "/api/files",
            "/api/files/{id}",
        ] {
            assert!(
                paths.iter().any(|p| p.as_str() == expected),
                "missing path {}",
                expected
            );
        }
    }
}
