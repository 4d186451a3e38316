//! Docintake Core Library
//!
//! This crate provides the document domain model, error types, configuration, and
//! boundary validation shared across all docintake components.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod validation;

// Re-export commonly used types
pub use config::{BaseConfig, Config, IntakeConfig, LogFormat};
pub use error::{AppError, ErrorMetadata, LogLevel};
