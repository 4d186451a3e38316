//! Data models for the application
//!
//! The document is the only persisted entity; the remaining types are the
//! request and response contracts built around it.

mod document;
mod reconcile;

pub use document::*;
pub use reconcile::*;
