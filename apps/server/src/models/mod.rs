//! Domain models for attachment lists.

pub mod attachment;
pub mod field;

// Re-export commonly used types
pub use attachment::{AttachmentRecord, UploadedFile};
pub use attachment_forms_common::AttachmentStatus;
pub use field::{FieldDescriptor, FieldHint, FieldSet, FieldType, FieldValue, SelectOption};
