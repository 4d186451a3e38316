//! Application state shared by every handler.

use docintake_core::Config;
use docintake_db::Session;
use docintake_storage::Storage;
use sqlx::SqlitePool;
use std::sync::Arc;

/// Pool, storage backend and configuration, built once at startup and shared
/// behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub storage: Arc<dyn Storage>,
    pub config: Config,
}

impl AppState {
    pub fn new(pool: SqlitePool, storage: Arc<dyn Storage>, config: Config) -> Self {
        Self {
            pool,
            storage,
            config,
        }
    }

    /// A fresh transactional handle for one request. Handles are never shared.
    pub fn session(&self) -> Session {
        Session::new(self.pool.clone())
    }
}
