//! Shared fixtures for service tests

use async_trait::async_trait;
use docintake_core::models::NewDocument;
use docintake_db::{connect, run_migrations, Session};
use docintake_storage::{ByteStream, LocalStorage, Storage, StorageError, StorageResult};
use sqlx::SqlitePool;
use tempfile::TempDir;

pub async fn test_pool() -> SqlitePool {
    let pool = connect("sqlite::memory:", 1, 5).await.unwrap();
    run_migrations(&pool).await.unwrap();
    pool
}

pub async fn test_session() -> Session {
    Session::new(test_pool().await)
}

pub async fn test_storage() -> (TempDir, LocalStorage) {
    let dir = tempfile::tempdir().unwrap();
    let storage = LocalStorage::new(dir.path().join("uploads")).await.unwrap();
    (dir, storage)
}

pub fn new_document(storage: &dyn Storage, id: &str, size: i64) -> NewDocument {
    NewDocument {
        id: id.to_string(),
        filename: id.to_string(),
        file_path: storage.file_path_for(id).unwrap(),
        file_type: "application/pdf".to_string(),
        file_size: size,
    }
}

/// Storage whose every operation fails, for exercising error propagation.
pub struct FailingStorage;

fn failure() -> StorageError {
    StorageError::BackendError("storage unavailable".to_string())
}

#[async_trait]
impl Storage for FailingStorage {
    async fn upload(&self, _name: &str, _data: Vec<u8>) -> StorageResult<String> {
        Err(failure())
    }

    async fn download(&self, _file_path: &str) -> StorageResult<Vec<u8>> {
        Err(failure())
    }

    async fn download_stream(&self, _file_path: &str) -> StorageResult<ByteStream> {
        Err(failure())
    }

    async fn delete(&self, _file_path: &str) -> StorageResult<bool> {
        Err(StorageError::DeleteFailed("permission denied".to_string()))
    }

    async fn exists(&self, _file_path: &str) -> StorageResult<bool> {
        Err(failure())
    }

    async fn content_length(&self, _file_path: &str) -> StorageResult<u64> {
        Err(failure())
    }

    async fn list(&self) -> StorageResult<Vec<String>> {
        Err(failure())
    }

    fn file_path_for(&self, name: &str) -> StorageResult<String> {
        Ok(format!("uploads/{}", name))
    }
}
