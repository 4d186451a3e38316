//! Application-wide constants.

/// MIME types accepted by the upload boundary when `ALLOWED_CONTENT_TYPES` is not set:
/// PDF, plain text, legacy Word and OOXML Word.
pub const DEFAULT_ALLOWED_CONTENT_TYPES: &[&str] = &[
    "application/pdf",
    "text/plain",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

/// `strftime` pattern of the timestamp prefix in generated document ids.
pub const DOCUMENT_ID_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S_";

/// Bytes per megabyte used by the stats endpoint.
pub const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Message returned with a successful upload.
pub const UPLOAD_SUCCESS_MESSAGE: &str = "File uploaded successfully";

/// Message returned with a successful delete.
pub const DELETE_SUCCESS_MESSAGE: &str = "Document deleted successfully";
