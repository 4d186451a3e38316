use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::constants::{BYTES_PER_MB, DELETE_SUCCESS_MESSAGE, UPLOAD_SUCCESS_MESSAGE};

/// A stored document: the metadata row plus the location of its bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub filename: String,
    pub file_path: String,
    pub file_type: String,
    pub file_size: i64,
    pub uploaded_at: DateTime<Utc>,
}

/// Fields supplied by the caller when creating a document.
/// The store assigns `uploaded_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct NewDocument {
    #[validate(length(min = 1, max = 512))]
    pub id: String,
    #[validate(length(min = 1, max = 255))]
    pub filename: String,
    #[validate(length(min = 1))]
    pub file_path: String,
    #[validate(length(min = 1, max = 255))]
    pub file_type: String,
    #[validate(range(min = 0))]
    pub file_size: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DocumentResponse {
    #[schema(example = "20240115_093000_report.pdf")]
    pub id: String,
    #[schema(example = "report.pdf")]
    pub filename: String,
    #[schema(example = "application/pdf")]
    pub file_type: String,
    pub file_size: i64,
    pub uploaded_at: DateTime<Utc>,
}

impl From<Document> for DocumentResponse {
    fn from(doc: Document) -> Self {
        DocumentResponse {
            id: doc.id,
            filename: doc.filename,
            file_type: doc.file_type,
            file_size: doc.file_size,
            uploaded_at: doc.uploaded_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DocumentListResponse {
    pub total: usize,
    pub documents: Vec<DocumentResponse>,
}

impl From<Vec<Document>> for DocumentListResponse {
    fn from(documents: Vec<Document>) -> Self {
        let documents: Vec<DocumentResponse> =
            documents.into_iter().map(DocumentResponse::from).collect();
        DocumentListResponse {
            total: documents.len(),
            documents,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    pub id: String,
    pub filename: String,
    #[schema(example = "File uploaded successfully")]
    pub message: String,
    pub file_size: i64,
}

impl From<Document> for UploadResponse {
    fn from(doc: Document) -> Self {
        UploadResponse {
            id: doc.id,
            filename: doc.filename,
            message: UPLOAD_SUCCESS_MESSAGE.to_string(),
            file_size: doc.file_size,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeleteResponse {
    #[schema(example = "Document deleted successfully")]
    pub message: String,
    pub document_id: String,
}

impl DeleteResponse {
    pub fn new(document_id: impl Into<String>) -> Self {
        DeleteResponse {
            message: DELETE_SUCCESS_MESSAGE.to_string(),
            document_id: document_id.into(),
        }
    }
}

/// Aggregate figures over all live documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DocumentStats {
    pub total_documents: i64,
    pub total_size_bytes: i64,
    /// Total size in MiB, rounded to two decimals
    #[schema(example = 1.25)]
    pub total_size_mb: f64,
}

impl DocumentStats {
    pub fn new(total_documents: i64, total_size_bytes: i64) -> Self {
        let mb = total_size_bytes as f64 / BYTES_PER_MB;
        DocumentStats {
            total_documents,
            total_size_bytes,
            total_size_mb: (mb * 100.0).round() / 100.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_document() -> Document {
        Document {
            id: "20240115_093000_report.pdf".to_string(),
            filename: "report.pdf".to_string(),
            file_path: "uploads/20240115_093000_report.pdf".to_string(),
            file_type: "application/pdf".to_string(),
            file_size: 2048,
            uploaded_at: Utc::now(),
        }
    }

    #[test]
    fn test_document_response_from_document() {
        let document = sample_document();
        let response = DocumentResponse::from(document.clone());

        assert_eq!(response.id, document.id);
        assert_eq!(response.filename, "report.pdf");
        assert_eq!(response.file_type, "application/pdf");
        assert_eq!(response.file_size, 2048);
        assert_eq!(response.uploaded_at, document.uploaded_at);
    }

    #[test]
    fn test_document_response_omits_file_path() {
        let json = serde_json::to_value(DocumentResponse::from(sample_document())).unwrap();
        let obj = json.as_object().unwrap();
        assert!(!obj.contains_key("file_path"));
        assert_eq!(obj.len(), 5);
    }

    #[test]
    fn test_list_response_total_matches_documents() {
        let mut second = sample_document();
        second.id = "20240115_093001_notes.txt".to_string();
        let response = DocumentListResponse::from(vec![sample_document(), second]);
        assert_eq!(response.total, 2);
        assert_eq!(response.documents.len(), 2);

        let empty = DocumentListResponse::from(Vec::new());
        assert_eq!(empty.total, 0);
    }

    #[test]
    fn test_upload_and_delete_messages() {
        let upload = UploadResponse::from(sample_document());
        assert_eq!(upload.message, "File uploaded successfully");
        assert_eq!(upload.file_size, 2048);

        let delete = DeleteResponse::new("doc1");
        assert_eq!(delete.message, "Document deleted successfully");
        assert_eq!(delete.document_id, "doc1");
    }

    #[test]
    fn test_stats_rounding() {
        let stats = DocumentStats::new(3, 1000);
        assert_eq!(stats.total_size_mb, 0.0);

        let stats = DocumentStats::new(0, 0);
        assert_eq!(stats.total_size_bytes, 0);
        assert_eq!(stats.total_size_mb, 0.0);

        let stats = DocumentStats::new(1, 1_572_864);
        assert_eq!(stats.total_size_mb, 1.5);

        let stats = DocumentStats::new(1, 1_310_720 + 1_000);
        assert_eq!(stats.total_size_mb, 1.25);
    }

    #[test]
    fn test_new_document_validation() {
        let valid = NewDocument {
            id: "doc1".to_string(),
            filename: "doc1.pdf".to_string(),
            file_path: "uploads/doc1".to_string(),
            file_type: "application/pdf".to_string(),
            file_size: 0,
        };
        assert!(valid.validate().is_ok());

        let mut invalid = valid.clone();
        invalid.file_size = -1;
        assert!(invalid.validate().is_err());

        let mut invalid = valid;
        invalid.id = String::new();
        assert!(invalid.validate().is_err());
    }
}
