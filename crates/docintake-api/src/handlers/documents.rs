use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::utils::upload::extract_multipart_file;
use axum::{
    body::Body,
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    http::{header, Response, StatusCode},
    response::IntoResponse,
    Json,
};
use docintake_core::models::{
    DeleteResponse, DocumentListResponse, DocumentResponse, DocumentStats, UploadResponse,
};
use docintake_core::validation::generate_document_id;
use docintake_core::AppError;
use docintake_services::documents::{self, UploadedFile};
use futures::StreamExt;
use std::sync::Arc;

fn document_not_found() -> AppError {
    AppError::NotFound("Document not found".to_string())
}

#[utoipa::path(
    post,
    path = "/documents/upload",
    tag = "documents",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Document uploaded successfully", body = UploadResponse),
        (status = 400, description = "Invalid file type or malformed form", body = ErrorResponse),
        (status = 409, description = "Document id already taken", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn upload_document(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, HttpAppError> {
    let file = extract_multipart_file(
        multipart?,
        state.config.allowed_content_types(),
        state.config.max_upload_size_bytes(),
    )
    .await?;

    let id = generate_document_id(&file.filename);
    tracing::debug!(
        document_id = %id,
        content_type = %file.content_type,
        size_bytes = file.data.len(),
        "Accepted upload"
    );

    let mut session = state.session();
    let document = documents::upload(
        &mut session,
        state.storage.as_ref(),
        UploadedFile {
            id,
            filename: file.filename,
            file_type: file.content_type,
            data: file.data,
        },
    )
    .await?;

    Ok(Json(UploadResponse::from(document)))
}

#[utoipa::path(
    get,
    path = "/documents",
    tag = "documents",
    responses(
        (status = 200, description = "All stored documents", body = DocumentListResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn list_documents(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DocumentListResponse>, HttpAppError> {
    let mut session = state.session();
    let documents = documents::list(&mut session).await?;
    Ok(Json(DocumentListResponse::from(documents)))
}

#[utoipa::path(
    get,
    path = "/documents/stats",
    tag = "documents",
    responses(
        (status = 200, description = "Document count and total size", body = DocumentStats),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn document_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DocumentStats>, HttpAppError> {
    let mut session = state.session();
    Ok(Json(documents::stats(&mut session).await?))
}

#[utoipa::path(
    get,
    path = "/documents/{id}",
    tag = "documents",
    params(
        ("id" = String, Path, description = "Document ID")
    ),
    responses(
        (status = 200, description = "Document metadata", body = DocumentResponse),
        (status = 404, description = "Document not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn get_document(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DocumentResponse>, HttpAppError> {
    let mut session = state.session();
    let document = documents::get_by_id(&mut session, &id)
        .await?
        .ok_or_else(document_not_found)?;
    Ok(Json(DocumentResponse::from(document)))
}

#[utoipa::path(
    get,
    path = "/documents/{id}/download",
    tag = "documents",
    params(
        ("id" = String, Path, description = "Document ID")
    ),
    responses(
        (status = 200, description = "Document file", content_type = "application/octet-stream"),
        (status = 404, description = "Document or its file not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "download_document"))]
pub async fn download_document(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    let mut session = state.session();
    let document = documents::get_by_id(&mut session, &id)
        .await?
        .ok_or_else(document_not_found)?;

    let stream = state
        .storage
        .download_stream(&document.file_path)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, file_path = %document.file_path, "Stored file unavailable");
            AppError::from(e)
        })?;

    // Wrap storage stream for axum Body
    let body_stream = stream.map(|result| {
        result.map_err(|e| std::io::Error::other(format!("Storage stream error: {}", e)))
    });

    let content_disposition = format!(
        "attachment; filename=\"{}\"",
        document.filename.replace(['"', '\\'], "_")
    );

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, document.file_type.as_str())
        .header(header::CONTENT_DISPOSITION, content_disposition)
        .body(Body::from_stream(body_stream))
        .map_err(|e| AppError::Internal(format!("Failed to build response: {}", e)))?;

    Ok(response)
}

#[utoipa::path(
    delete,
    path = "/documents/{id}",
    tag = "documents",
    params(
        ("id" = String, Path, description = "Document ID")
    ),
    responses(
        (status = 200, description = "Document deleted", body = DeleteResponse),
        (status = 404, description = "Document not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn delete_document(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, HttpAppError> {
    let mut session = state.session();
    if !documents::delete(&mut session, state.storage.as_ref(), &id).await? {
        return Err(document_not_found().into());
    }
    Ok(Json(DeleteResponse::new(id)))
}
