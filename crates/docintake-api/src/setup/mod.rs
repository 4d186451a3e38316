//! Application setup and initialization
//!
//! This module contains all application initialization logic extracted from main.rs
//! for better organization and testability.

pub mod database;
pub mod reconcile;
pub mod routes;
pub mod server;
pub mod storage;

use crate::state::AppState;
use anyhow::{Context, Result};
use docintake_core::Config;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    config
        .validate()
        .context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(config.log_format())
        .context("Failed to initialize telemetry")?;

    tracing::info!(
        app_name = %config.app_name(),
        environment = %config.environment(),
        debug = config.debug(),
        "Configuration loaded and validated successfully"
    );

    let pool = database::setup_database(&config).await?;
    let storage = storage::setup_storage(&config).await?;

    if config.reconcile_on_startup() {
        reconcile::reconcile_on_startup(&pool, storage.as_ref(), config.reconcile_repair())
            .await?;
    }

    let state = Arc::new(AppState::new(pool, storage, config.clone()));
    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
