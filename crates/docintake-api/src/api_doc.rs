//! OpenAPI documentation, served at `/openapi.json`.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use docintake_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Document Intake API",
        version = "0.1.0",
        description = "Upload, list, inspect, download and delete PDF, plain-text and Word documents. File bytes are kept on the local filesystem and metadata in SQLite."
    ),
    paths(
        handlers::documents::upload_document,
        handlers::documents::list_documents,
        handlers::documents::document_stats,
        handlers::documents::get_document,
        handlers::documents::download_document,
        handlers::documents::delete_document,
    ),
    components(
        schemas(
            models::DocumentResponse,
            models::DocumentListResponse,
            models::UploadResponse,
            models::DeleteResponse,
            models::DocumentStats,
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "documents", description = "Document upload, listing, statistics, download and deletion")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_document_routes() {
        let spec = ApiDoc::openapi();
        let paths = &spec.paths.paths;
        for path in [
            "/documents",
            "/documents/upload",
            "/documents/stats",
            "/documents/{id}",
            "/documents/{id}/download",
        ] {
            assert!(paths.contains_key(path), "missing path {}", path);
        }
        let schemas = &spec.components.as_ref().unwrap().schemas;
        assert!(schemas.contains_key("DocumentStats"));
        assert!(schemas.contains_key("ErrorResponse"));
    }
}
