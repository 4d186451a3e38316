//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use async_trait::async_trait;
use bytes::Bytes;
use docintake_core::AppError;
use futures::Stream;
use std::pin::Pin;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("File already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid storage path: {0}")]
    InvalidPath(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(msg) => AppError::NotFound(msg),
            StorageError::AlreadyExists(name) => {
                AppError::Conflict(format!("Document with id '{}' already exists", name))
            }
            StorageError::InvalidPath(msg) => AppError::InvalidInput(msg),
            StorageError::UploadFailed(msg)
            | StorageError::DownloadFailed(msg)
            | StorageError::DeleteFailed(msg)
            | StorageError::BackendError(msg) => AppError::Storage(msg),
            StorageError::IoError(err) => AppError::Internal(format!("IO error: {}", err)),
            StorageError::ConfigError(msg) => AppError::Internal(msg),
        }
    }
}

pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, StorageError>> + Send>>;

/// Storage abstraction trait
///
/// Files live directly under a single root and are addressed two ways: by `name`
/// (the document id) when written or listed, and by `file_path` (the value recorded
/// in the metadata row) everywhere else. [`Storage::file_path_for`] maps one to the other.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Write a new file and return its `file_path`.
    ///
    /// Never overwrites: an existing file with the same name fails with
    /// [`StorageError::AlreadyExists`].
    async fn upload(&self, name: &str, data: Vec<u8>) -> StorageResult<String>;

    /// Read a whole file
    async fn download(&self, file_path: &str) -> StorageResult<Vec<u8>>;

    /// Read a file as a stream of chunks
    async fn download_stream(&self, file_path: &str) -> StorageResult<ByteStream>;

    /// Delete a file. Returns `false` when there was nothing to delete.
    async fn delete(&self, file_path: &str) -> StorageResult<bool>;

    /// Check if a file exists
    async fn exists(&self, file_path: &str) -> StorageResult<bool>;

    /// Get the size in bytes of a file, if it exists.
    async fn content_length(&self, file_path: &str) -> StorageResult<u64>;

    /// Names of all regular files under the root
    async fn list(&self) -> StorageResult<Vec<String>>;

    /// The `file_path` a file called `name` is (or would be) stored at
    fn file_path_for(&self, name: &str) -> StorageResult<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_already_exists_maps_to_conflict() {
        let app: AppError = StorageError::AlreadyExists("doc1".to_string()).into();
        match app {
            AppError::Conflict(msg) => assert!(msg.contains("doc1")),
            other => panic!("Expected Conflict variant, got {:?}", other),
        }
    }

    #[test]
    fn test_not_found_maps_to_not_found() {
        let app: AppError = StorageError::NotFound("uploads/doc1".to_string()).into();
        assert!(matches!(app, AppError::NotFound(ref msg) if msg == "uploads/doc1"));
    }

    #[test]
    fn test_backend_failures_map_to_storage() {
        let app: AppError = StorageError::DeleteFailed("permission denied".to_string()).into();
        assert!(matches!(app, AppError::Storage(_)));

        let io_err = std::io::Error::new(std::io::ErrorKind::Other, "disk gone");
        let app: AppError = StorageError::IoError(io_err).into();
        assert!(matches!(app, AppError::Internal(ref msg) if msg.contains("disk gone")));
    }
}
