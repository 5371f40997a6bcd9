//! Attachment record bound to each table row.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use attachment_forms_common::{AttachmentStatus, size_kb};

use super::field::{FieldSet, FieldValue};

/// File picked on the client and posted with the form.
#[derive(Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// Original file name as sent by the browser
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

impl UploadedFile {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl std::fmt::Debug for UploadedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadedFile")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.data.len())
            .finish()
    }
}

/// One attachment row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AttachmentRecord {
    /// Null until persisted.
    #[serde(rename = "ID", default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub display_name: String,
    /// Storage name under the storage root, opaque to the client.
    #[serde(rename = "FilePath", default)]
    pub storage_path: String,
    #[serde(rename = "Size", default)]
    pub size_bytes: u64,
    #[serde(default)]
    pub status: AttachmentStatus,
    /// Present only for rows posted with a newly picked file.
    #[serde(skip)]
    pub uploaded_file: Option<UploadedFile>,
    /// Extra field values keyed by field name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extras: BTreeMap<String, FieldValue>,
}

impl AttachmentRecord {
    /// Record behind the template row.
    pub fn placeholder(fields: &FieldSet) -> Self {
        Self {
            status: AttachmentStatus::Added,
            extras: fields
                .iter()
                .map(|field| (field.name.clone(), field.default_value()))
                .collect(),
            ..Self::default()
        }
    }

    /// Value of an extra field; missing values read as null.
    pub fn extra(&self, name: &str) -> &FieldValue {
        static NULL: FieldValue = FieldValue::Null;
        self.extras.get(name).unwrap_or(&NULL)
    }

    pub fn set_extra(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.extras.insert(name.into(), value.into());
    }

    /// Size rounded to whole kilobytes.
    pub fn size_kb(&self) -> u64 {
        size_kb(self.size_bytes)
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}
