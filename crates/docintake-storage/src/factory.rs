#[cfg(feature = "storage-local")]
use crate::LocalStorage;
use crate::{Storage, StorageResult};
use docintake_core::Config;
use std::sync::Arc;

/// Create a storage backend based on configuration
#[cfg(feature = "storage-local")]
pub async fn create_storage(config: &Config) -> StorageResult<Arc<dyn Storage>> {
    let storage = LocalStorage::new(config.storage_root()).await?;
    tracing::info!(
        root = %config.storage_root().display(),
        "Local document storage ready"
    );
    Ok(Arc::new(storage))
}

#[cfg(not(feature = "storage-local"))]
pub async fn create_storage(_config: &Config) -> StorageResult<Arc<dyn Storage>> {
    Err(crate::StorageError::ConfigError(
        "Local storage backend not available (storage-local feature not enabled)".to_string(),
    ))
}

#[cfg(all(test, feature = "storage-local"))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_storage_uses_configured_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("docs");
        let root_str = root.to_string_lossy().into_owned();
        let config = Config::from_lookup(|key| match key {
            "STORAGE_ROOT" => Some(root_str.clone()),
            _ => None,
        })
        .unwrap();

        let storage = create_storage(&config).await.unwrap();
        assert!(root.is_dir());

        let file_path = storage.upload("doc1.txt", b"hello".to_vec()).await.unwrap();
        assert!(file_path.starts_with(&root_str));
    }
}
