//! Document service: the operations exposed over the document metadata store.

mod service;

pub use service::*;
