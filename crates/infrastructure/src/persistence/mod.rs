//! Document persistence on the local file system.

mod document_store;

pub use document_store::{DocumentFormat, DocumentIoError, DocumentStore};
