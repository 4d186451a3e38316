//! Multipart extraction for the upload handler

use axum::extract::Multipart;
use docintake_core::validation::{sanitize_filename, validate_content_type, validate_file_size};
use docintake_core::AppError;

use crate::error::HttpAppError;

/// The `file` field of an upload form after boundary checks.
#[derive(Debug)]
pub struct MultipartFile {
    /// Sanitized client filename
    pub filename: String,
    /// Normalized MIME type from the allow-set
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Extract and check the single field named "file" from a multipart form.
///
/// The declared content type and the filename are checked before any bytes are
/// read, and reading stops as soon as the body passes `max_size`. Other fields
/// are ignored; a second "file" field is rejected.
pub async fn extract_multipart_file(
    mut multipart: Multipart,
    allowed_types: &[String],
    max_size: usize,
) -> Result<MultipartFile, HttpAppError> {
    let mut file: Option<MultipartFile> = None;

    while let Some(mut field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }

        if file.is_some() {
            return Err(AppError::InvalidInput(
                "Multiple file fields are not allowed; send exactly one field named 'file'"
                    .to_string(),
            )
            .into());
        }

        let content_type = validate_content_type(
            field.content_type().unwrap_or("application/octet-stream"),
            allowed_types,
        )?;
        let filename = sanitize_filename(field.file_name().unwrap_or_default())?;

        let mut data = Vec::new();
        while let Some(chunk) = field.chunk().await? {
            validate_file_size(data.len() + chunk.len(), max_size)?;
            data.extend_from_slice(&chunk);
        }

        file = Some(MultipartFile {
            filename,
            content_type,
            data,
        });
    }

    file.ok_or_else(|| AppError::InvalidInput("No file provided".to_string()).into())
}
