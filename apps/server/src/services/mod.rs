//! Binding, storage and document services.

pub mod binder;
pub mod documents;
pub mod storage;

pub use binder::{FormData, FormValue, bind_attachments, read_multipart, records_from_model};
pub use documents::{DocumentStore, FILES_PROPERTY, demo_fields};
pub use storage::FileStorage;
