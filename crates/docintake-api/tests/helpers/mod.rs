//! Test helpers: build AppState and router for integration tests.
//!
//! Every app gets its own in-memory SQLite database and a temporary storage root,
//! so tests run in parallel without sharing state.

#![allow(dead_code)]

pub mod fixtures;

use axum_test::multipart::{MultipartForm, Part};
use axum_test::{TestResponse, TestServer};
use docintake_api::setup::routes;
use docintake_api::state::AppState;
use docintake_core::{Config, IntakeConfig};
use docintake_db::{connect, run_migrations};
use docintake_storage::{LocalStorage, Storage};
use sqlx::SqlitePool;
use std::sync::Arc;
use tempfile::TempDir;

/// Test application: server, pool, storage, and owned resources.
pub struct TestApp {
    pub server: TestServer,
    pub pool: SqlitePool,
    pub storage: Arc<dyn Storage>,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Upload `data` as the form field "file".
    pub async fn upload(&self, filename: &str, mime_type: &str, data: Vec<u8>) -> TestResponse {
        let part = Part::bytes(data).file_name(filename).mime_type(mime_type);
        let multipart = MultipartForm::new().add_part("file", part);
        self.server
            .post("/documents/upload")
            .multipart(multipart)
            .await
    }

    /// Upload and return the new document id, asserting success.
    pub async fn upload_ok(&self, filename: &str, mime_type: &str, data: Vec<u8>) -> String {
        let response = self.upload(filename, mime_type, data).await;
        assert_eq!(response.status_code(), 200, "{}", response.text());
        let body: serde_json::Value = response.json();
        body["id"]
            .as_str()
            .expect("Expected 'id' in upload response")
            .to_string()
    }

    /// Names of the files currently in the storage root.
    pub async fn stored_files(&self) -> Vec<String> {
        self.storage.list().await.expect("Failed to list storage")
    }
}

/// Setup test app with default configuration.
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(|_| {}).await
}

/// Setup test app, letting the caller adjust the configuration first.
pub async fn setup_test_app_with<F>(configure: F) -> TestApp
where
    F: FnOnce(&mut IntakeConfig),
{
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let storage_root = temp_dir.path().join("uploads");

    let mut config = create_test_config(&storage_root.to_string_lossy());
    configure(&mut config.0);

    let pool = connect(config.database_url(), 1, 5)
        .await
        .expect("Failed to connect to test database");
    run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    let storage: Arc<dyn Storage> = Arc::new(
        LocalStorage::new(config.storage_root())
            .await
            .expect("Failed to create local storage"),
    );

    let state = Arc::new(AppState::new(pool.clone(), storage.clone(), config.clone()));
    let app = routes::setup_routes(&config, state).expect("Failed to build routes");
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        pool,
        storage,
        _temp_dir: temp_dir,
    }
}

fn create_test_config(storage_root: &str) -> Config {
    let storage_root = storage_root.to_string();
    Config::from_lookup(move |key| match key {
        "DATABASE_URL" => Some("sqlite::memory:".to_string()),
        "STORAGE_ROOT" => Some(storage_root.clone()),
        "ENVIRONMENT" => Some("test".to_string()),
        _ => None,
    })
    .expect("Failed to build test config")
}
