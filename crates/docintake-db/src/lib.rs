//! Docintake database layer
//!
//! SQLite persistence for document metadata: connection pool setup, embedded
//! migrations, the per-request [`Session`] and the [`DocumentStore`] capability
//! set it implements.

pub mod db;

pub use db::document::{DocumentRow, DocumentStore};
pub use db::pool::{connect, is_in_memory_url, run_migrations};
pub use db::session::Session;
