//! Database repositories for data access layer
//
// Document metadata store
pub mod document;
//
// Pool construction and migrations
pub mod pool;
//
// Per-request transactional handle
pub mod session;
