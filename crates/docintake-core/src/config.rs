//! Configuration module
//!
//! This module provides configuration structures for the API and services,
//! including server, database, storage, upload limits and reconciliation settings.

use std::env;
use std::path::PathBuf;

use crate::constants::DEFAULT_ALLOWED_CONTENT_TYPES;

// Common constants
const DEFAULT_APP_NAME: &str = "Document Intake API";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_DATABASE_URL: &str = "sqlite://./docintake.db";
const MAX_CONNECTIONS: u32 = 10;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const DEFAULT_STORAGE_ROOT: &str = "uploads";
const MAX_UPLOAD_SIZE_MB: usize = 50;
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:8501";

/// Output format of the tracing subscriber
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Compact,
        }
    }
}

/// Base configuration shared by the server and its background tasks
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub app_name: String,
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub environment: String,
    pub debug: bool,
    pub log_format: LogFormat,
}

/// Document intake configuration
#[derive(Clone, Debug)]
pub struct IntakeConfig {
    pub base: BaseConfig,
    pub database_url: String,
    pub storage_root: PathBuf,
    pub max_upload_size_bytes: usize,
    pub allowed_content_types: Vec<String>,
    /// Run a consistency check between rows and stored files at startup
    pub reconcile_on_startup: bool,
    /// Whether the startup check repairs what it finds or only reports it
    pub reconcile_repair: bool,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<IntakeConfig>);

impl Config {
    fn as_intake(&self) -> &IntakeConfig {
        &self.0
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production_name(&self.as_intake().base.environment)
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// `from_env` delegates here; tests pass a map so they never touch the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = IntakeConfig::from_lookup(lookup)?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.as_intake().validate()
    }

    // Convenience getters for common fields
    pub fn app_name(&self) -> &str {
        &self.as_intake().base.app_name
    }

    pub fn server_port(&self) -> u16 {
        self.as_intake().base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.as_intake().base.cors_origins
    }

    pub fn db_max_connections(&self) -> u32 {
        self.as_intake().base.db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.as_intake().base.db_timeout_seconds
    }

    pub fn environment(&self) -> &str {
        &self.as_intake().base.environment
    }

    pub fn debug(&self) -> bool {
        self.as_intake().base.debug
    }

    pub fn log_format(&self) -> LogFormat {
        self.as_intake().base.log_format
    }

    pub fn database_url(&self) -> &str {
        &self.as_intake().database_url
    }

    pub fn storage_root(&self) -> &std::path::Path {
        &self.as_intake().storage_root
    }

    pub fn max_upload_size_bytes(&self) -> usize {
        self.as_intake().max_upload_size_bytes
    }

    pub fn allowed_content_types(&self) -> &[String] {
        &self.as_intake().allowed_content_types
    }

    pub fn reconcile_on_startup(&self) -> bool {
        self.as_intake().reconcile_on_startup
    }

    pub fn reconcile_repair(&self) -> bool {
        self.as_intake().reconcile_repair
    }
}

fn is_production_name(environment: &str) -> bool {
    let env = environment.to_lowercase();
    env == "production" || env == "prod"
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

impl IntakeConfig {
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT")
            .or_else(|| lookup("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let cors_origins_str =
            lookup("CORS_ORIGINS").unwrap_or_else(|| DEFAULT_CORS_ORIGINS.to_string());
        if is_production_name(&environment) && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let max_upload_size_mb = match lookup("MAX_UPLOAD_SIZE_MB") {
            Some(value) => value
                .trim()
                .parse::<usize>()
                .map_err(|_| anyhow::anyhow!("MAX_UPLOAD_SIZE_MB must be a valid number"))?,
            None => MAX_UPLOAD_SIZE_MB,
        };

        let allowed_content_types = lookup("ALLOWED_CONTENT_TYPES")
            .map(|value| split_list(&value))
            .unwrap_or_else(|| {
                DEFAULT_ALLOWED_CONTENT_TYPES
                    .iter()
                    .map(|s| s.to_string())
                    .collect()
            });

        let base = BaseConfig {
            app_name: lookup("APP_NAME").unwrap_or_else(|| DEFAULT_APP_NAME.to_string()),
            server_port: match lookup("PORT") {
                Some(value) => value
                    .trim()
                    .parse()
                    .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
                None => DEFAULT_PORT,
            },
            cors_origins,
            db_max_connections: lookup("DB_MAX_CONNECTIONS")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: lookup("DB_TIMEOUT_SECONDS")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            environment,
            debug: lookup("DEBUG")
                .and_then(|v| parse_bool(&v))
                .unwrap_or(true),
            log_format: lookup("LOG_FORMAT")
                .map(|v| LogFormat::parse(&v))
                .unwrap_or(LogFormat::Compact),
        };

        Ok(IntakeConfig {
            base,
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            storage_root: PathBuf::from(
                lookup("STORAGE_ROOT").unwrap_or_else(|| DEFAULT_STORAGE_ROOT.to_string()),
            ),
            max_upload_size_bytes: max_upload_size_mb.saturating_mul(1024 * 1024),
            allowed_content_types,
            reconcile_on_startup: lookup("RECONCILE_ON_STARTUP")
                .and_then(|v| parse_bool(&v))
                .unwrap_or(false),
            reconcile_repair: lookup("RECONCILE_REPAIR")
                .and_then(|v| parse_bool(&v))
                .unwrap_or(false),
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !self.database_url.starts_with("sqlite:") {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a SQLite connection string (sqlite://...)"
            ));
        }

        if self.allowed_content_types.is_empty() {
            return Err(anyhow::anyhow!(
                "ALLOWED_CONTENT_TYPES must contain at least one MIME type"
            ));
        }

        if self.max_upload_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_UPLOAD_SIZE_MB must be greater than 0"));
        }

        if is_production_name(&self.base.environment)
            && self.base.cors_origins.iter().any(|o| o == "*")
        {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        if self.base.db_max_connections == 0 {
            return Err(anyhow::anyhow!("DB_MAX_CONNECTIONS must be greater than 0"));
        }

        Ok(())
    }
}
