//! Docintake Storage Library
//!
//! This crate provides the storage abstraction for uploaded document bytes and its
//! local filesystem implementation.
//!
//! # File layout
//!
//! Every document is one file directly under the configured root, named by its
//! document id. The string recorded in the metadata row (`file_path`) is the root
//! joined with that name. Names must be a single path component and recorded paths
//! must stay inside the root.

pub mod factory;
#[cfg(feature = "storage-local")]
pub mod local;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
pub use traits::{ByteStream, Storage, StorageError, StorageResult};
