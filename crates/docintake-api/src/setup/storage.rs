//! Storage setup and initialization

use anyhow::{Context, Result};
use docintake_core::Config;
use docintake_storage::{create_storage, Storage};
use std::sync::Arc;

/// Create the document storage backend rooted at the configured directory.
pub async fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    tracing::info!("Initializing storage...");
    let storage = create_storage(config)
        .await
        .with_context(|| {
            format!(
                "Failed to initialize storage at {}",
                config.storage_root().display()
            )
        })?;
    Ok(storage)
}
