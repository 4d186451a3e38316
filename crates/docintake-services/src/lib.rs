//! Docintake Services Layer
//!
//! This crate is the **business service layer**: it coordinates the document
//! metadata store with the file storage backend. The API crate keeps HTTP handling
//! thin and calls into the functions here.
//!
//! Every operation takes a caller-owned [`DocumentStore`] handle; the caller decides
//! how long the handle lives.

pub mod documents;
pub mod reconcile;

pub use docintake_db::{DocumentStore, Session};
pub use docintake_storage::{create_storage, LocalStorage, Storage, StorageError, StorageResult};
pub use reconcile::reconcile;

#[cfg(test)]
pub(crate) mod test_support;
