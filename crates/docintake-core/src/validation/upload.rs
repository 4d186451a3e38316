//! Boundary checks applied to an upload before any storage or database access.

use chrono::{Local, NaiveDateTime};

use crate::constants::DOCUMENT_ID_TIMESTAMP_FORMAT;
use crate::AppError;

/// Longest file name most filesystems accept, in bytes.
const MAX_FILE_NAME_BYTES: usize = 255;

/// Length of the `YYYYMMDD_HHMMSS_` prefix a document id puts in front of the filename.
pub const DOCUMENT_ID_PREFIX_LEN: usize = 16;

/// Longest sanitized filename, in bytes, so that the id still fits in one file name.
pub const MAX_FILENAME_LENGTH: usize = MAX_FILE_NAME_BYTES - DOCUMENT_ID_PREFIX_LEN;

/// Extensions longer than this are not worth keeping when a name is shortened.
const MAX_KEPT_EXTENSION_BYTES: usize = 16;

/// Normalize MIME type by stripping parameters (e.g. "text/plain; charset=utf-8" -> "text/plain").
pub fn normalize_mime_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .map(|s| s.trim())
        .unwrap_or(content_type)
        .to_lowercase()
}

/// Validate content type against the allow-set. Compares the normalized MIME type only,
/// so parameters cannot be used to sneak a type through. Returns the normalized type.
pub fn validate_content_type(
    content_type: &str,
    allowed_types: &[String],
) -> Result<String, AppError> {
    let normalized = normalize_mime_type(content_type);
    if !allowed_types
        .iter()
        .any(|ct| normalized == ct.to_lowercase())
    {
        return Err(AppError::InvalidInput(format!(
            "Invalid file type. Allowed types: {}",
            allowed_types.join(", ")
        )));
    }
    Ok(normalized)
}

/// Validate file size
pub fn validate_file_size(file_size: usize, max_size: usize) -> Result<(), AppError> {
    if file_size > max_size {
        return Err(AppError::PayloadTooLarge(format!(
            "File size exceeds maximum allowed size of {} MB",
            max_size / 1024 / 1024
        )));
    }
    Ok(())
}

/// Reduce a client-supplied filename to a single safe path component.
///
/// Directory parts (either separator) are dropped and control characters become `_`.
/// Spaces and non-ASCII characters are kept. Names that collapse to nothing, `.` or `..`
/// are rejected. Names longer than [`MAX_FILENAME_LENGTH`] bytes are shortened on a
/// character boundary, keeping a short extension.
pub fn sanitize_filename(filename: &str) -> Result<String, AppError> {
    let filename_only = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename)
        .trim();

    if filename_only.is_empty() {
        return Err(AppError::InvalidInput("Filename is required".to_string()));
    }

    if filename_only == "." || filename_only == ".." {
        return Err(AppError::InvalidInput(
            "Filename contains invalid path traversal".to_string(),
        ));
    }

    let sanitized: String = filename_only
        .chars()
        .map(|c| if c.is_control() { '_' } else { c })
        .collect();

    Ok(shorten_filename(&sanitized, MAX_FILENAME_LENGTH))
}

/// Longest prefix of `s` that is at most `max_bytes` long and ends on a char boundary.
fn truncate_to_bytes(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

fn shorten_filename(filename: &str, max_bytes: usize) -> String {
    if filename.len() <= max_bytes {
        return filename.to_string();
    }

    match filename.rfind('.') {
        Some(dot) if dot > 0 && filename.len() - dot <= MAX_KEPT_EXTENSION_BYTES => {
            let (stem, extension) = filename.split_at(dot);
            let mut shortened = truncate_to_bytes(stem, max_bytes - extension.len()).to_string();
            shortened.push_str(extension);
            shortened
        }
        _ => truncate_to_bytes(filename, max_bytes).to_string(),
    }
}

/// Build a document id from a timestamp and a sanitized filename.
pub fn document_id_at(timestamp: NaiveDateTime, filename: &str) -> String {
    format!(
        "{}{}",
        timestamp.format(DOCUMENT_ID_TIMESTAMP_FORMAT),
        filename
    )
}

/// Build a document id from the current local time: `YYYYMMDD_HHMMSS_<filename>`.
pub fn generate_document_id(filename: &str) -> String {
    document_id_at(Local::now().naive_local(), filename)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn allow_set() -> Vec<String> {
        crate::constants::DEFAULT_ALLOWED_CONTENT_TYPES
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn content_type_accepts_allowed_types() {
        let allowed = allow_set();
        assert_eq!(
            validate_content_type("application/pdf", &allowed).unwrap(),
            "application/pdf"
        );
        assert_eq!(
            validate_content_type("Text/Plain; charset=utf-8", &allowed).unwrap(),
            "text/plain"
        );
        assert!(validate_content_type(
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            &allowed
        )
        .is_ok());
        assert!(validate_content_type("application/msword", &allowed).is_ok());
    }

    #[test]
    fn content_type_rejects_other_types() {
        let allowed = allow_set();
        let err = validate_content_type("image/png", &allowed).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(ref msg) if msg.starts_with("Invalid file type")));
        assert!(validate_content_type("", &allowed).is_err());
        assert!(validate_content_type("application/pdfx", &allowed).is_err());
    }

    #[test]
    fn file_size_limit() {
        assert!(validate_file_size(0, 1024).is_ok());
        assert!(validate_file_size(1024, 1024).is_ok());
        assert!(matches!(
            validate_file_size(1025, 1024),
            Err(AppError::PayloadTooLarge(_))
        ));
    }

    #[test]
    fn sanitize_filename_strips_directories() {
        assert_eq!(sanitize_filename("report.pdf").unwrap(), "report.pdf");
        assert_eq!(sanitize_filename("../../etc/passwd").unwrap(), "passwd");
        assert_eq!(sanitize_filename("C:\\docs\\notes.txt").unwrap(), "notes.txt");
        assert_eq!(
            sanitize_filename("quarterly report.docx").unwrap(),
            "quarterly report.docx"
        );
    }

    #[test]
    fn sanitize_filename_rejects_empty_and_traversal() {
        assert!(sanitize_filename("").is_err());
        assert!(sanitize_filename("dir/").is_err());
        assert!(sanitize_filename("..").is_err());
        assert!(sanitize_filename("a/..").is_err());
    }

    #[test]
    fn sanitize_filename_replaces_control_characters() {
        assert_eq!(sanitize_filename("a\nb.txt").unwrap(), "a_b.txt");
    }

    #[test]
    fn sanitize_filename_shortens_long_names_keeping_extension() {
        let long = format!("{}.txt", "a".repeat(250));
        let sanitized = sanitize_filename(&long).unwrap();
        assert_eq!(sanitized.len(), MAX_FILENAME_LENGTH);
        assert!(sanitized.ends_with(".txt"));
        assert!(sanitized.starts_with("aaaa"));

        let id = generate_document_id(&sanitized);
        assert!(id.len() <= 255);
    }

    #[test]
    fn sanitize_filename_shortens_multibyte_names_on_char_boundary() {
        // 3 bytes per char, so 100 chars are 300 bytes
        let long = format!("{}.pdf", "文".repeat(100));
        let sanitized = sanitize_filename(&long).unwrap();
        assert!(sanitized.len() <= MAX_FILENAME_LENGTH);
        assert!(sanitized.ends_with(".pdf"));
        assert!(sanitized.trim_end_matches(".pdf").chars().all(|c| c == '文'));
        assert_eq!(sanitized.len(), 78 * 3 + ".pdf".len());

        // No extension worth keeping
        let no_ext = "é".repeat(200);
        let sanitized = sanitize_filename(&no_ext).unwrap();
        assert_eq!(sanitized.len(), 238);
        assert!(sanitized.chars().all(|c| c == 'é'));
    }

    #[test]
    fn sanitize_filename_keeps_names_at_the_limit() {
        let exact = "b".repeat(MAX_FILENAME_LENGTH);
        assert_eq!(sanitize_filename(&exact).unwrap(), exact);
    }

    #[test]
    fn document_id_uses_timestamp_prefix() {
        let ts = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(9, 30, 5)
            .unwrap();
        assert_eq!(
            document_id_at(ts, "report.pdf"),
            "20240115_093005_report.pdf"
        );
    }

    #[test]
    fn generated_id_ends_with_filename() {
        let id = generate_document_id("notes.txt");
        assert!(id.ends_with("_notes.txt"));
        assert_eq!(id.len(), "YYYYMMDD_HHMMSS_".len() + "notes.txt".len());
    }
}
