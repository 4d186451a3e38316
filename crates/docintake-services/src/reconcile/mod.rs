//! Consistency check between the metadata store and the stored files.

mod service;

pub use service::reconcile;
