//! Naming protocol for indexed attachment collections.
//!
//! The server renders rows whose form fields follow the
//! `{property}[{index}].{member}` convention, the browser controller clones
//! and retargets those rows, and the list binder reads them back on postback.
//! All three sides take their names, status codes and class names from here.

pub mod markup;
pub mod naming;
pub mod size;
pub mod status;

pub use naming::RowIndex;
pub use size::{format_size, size_kb};
pub use status::AttachmentStatus;
