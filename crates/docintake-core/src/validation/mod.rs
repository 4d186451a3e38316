//! Validation modules

pub mod upload;

pub use upload::{
    document_id_at, generate_document_id, normalize_mime_type, sanitize_filename,
    validate_content_type, validate_file_size, MAX_FILENAME_LENGTH,
};
