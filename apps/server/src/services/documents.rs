//! In-memory document holding one attachment collection.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult, FieldSetError};
use crate::models::{
    AttachmentRecord, AttachmentStatus, FieldDescriptor, FieldSet, SelectOption,
};

/// Collection property of the document's attachments.
pub const FILES_PROPERTY: &str = "Files";

/// Parent model of the attachment table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Document {
    pub title: String,
    /// Options of the `Category` field
    pub categories: Vec<SelectOption>,
    /// Suggestions of the `Tag` field
    pub tags: Vec<String>,
    pub files: Vec<AttachmentRecord>,
}

/// Extra fields of the document's attachments.
pub fn demo_fields() -> Result<FieldSet, FieldSetError> {
    FieldSet::new(vec![
        FieldDescriptor::text("Comment")
            .multiline()
            .null_display_text("-"),
        FieldDescriptor::text("Category")
            .linked_select("Categories", Some("Select a category"))
            .null_display_text("-"),
        FieldDescriptor::text("Tag").linked_suggestion("Tags"),
        FieldDescriptor::boolean("Confidential"),
        FieldDescriptor::optional_boolean("Reviewed").null_display_text("Not reviewed"),
        FieldDescriptor::enumeration("Kind", ["Invoice", "Contract", "Report", "Other"])
            .display_name("Document kind"),
    ])
}

/// Shared document state.
#[derive(Debug, Default)]
pub struct DocumentStore {
    document: RwLock<Document>,
}

impl DocumentStore {
    pub fn new(document: Document) -> Self {
        Self {
            document: RwLock::new(document),
        }
    }

    /// Empty document with sample option sources.
    pub fn demo() -> Self {
        Self::new(Document {
            title: "Supplier agreement".to_string(),
            categories: vec![
                SelectOption::new("finance", "Finance"),
                SelectOption::new("legal", "Legal"),
                SelectOption::new("operations", "Operations"),
            ],
            tags: ["draft", "final", "signed", "scanned"]
                .into_iter()
                .map(str::to_string)
                .collect(),
            files: Vec::new(),
        })
    }

    pub async fn title(&self) -> String {
        self.document.read().await.title.clone()
    }

    /// The document as the JSON parent model handed to the renderer.
    pub async fn model(&self) -> AppResult<Value> {
        let document = self.document.read().await;
        serde_json::to_value(&*document)
            .map_err(|e| AppError::Configuration(format!("Failed to serialize document: {}", e)))
    }

    pub async fn find(&self, id: i64) -> Option<AttachmentRecord> {
        self.document
            .read()
            .await
            .files
            .iter()
            .find(|record| record.id == Some(id))
            .cloned()
    }

    /// Overwrite the server-owned attributes of posted rows.
    ///
    /// Storage path, display name and size of a row with a known id come
    /// from the stored record; posted values are ignored. Rows with an
    /// unknown or repeated id, and rows without an id, lose any posted
    /// storage path and count as new. Uploads then set these attributes anew.
    pub async fn restore_server_fields(&self, records: &mut [AttachmentRecord]) {
        let document = self.document.read().await;
        let mut seen = HashSet::new();

        for record in records.iter_mut() {
            let stored = record
                .id
                .filter(|id| seen.insert(*id))
                .and_then(|id| document.files.iter().find(|stored| stored.id == Some(id)));

            match stored {
                Some(stored) => {
                    record.storage_path = stored.storage_path.clone();
                    record.display_name = stored.display_name.clone();
                    record.size_bytes = stored.size_bytes;
                }
                None => {
                    if let Some(id) = record.id.take() {
                        warn!(id, "Posted attachment id is unknown or repeated; treating row as new");
                    }
                    record.storage_path.clear();
                    record.size_bytes = 0;
                    if record.status == AttachmentStatus::Unchanged {
                        record.status = AttachmentStatus::Added;
                    }
                }
            }
        }
    }

    /// Replace the attachment collection with a saved postback.
    ///
    /// Purged rows are dropped, new rows without a stored file are dropped,
    /// new rows get the next free id and every kept row is stored as
    /// Unchanged unless it is still marked Deleted.
    pub async fn replace_files(&self, records: Vec<AttachmentRecord>, purge_deleted: bool) -> usize {
        let mut document = self.document.write().await;
        let mut next_id = document
            .files
            .iter()
            .chain(records.iter())
            .filter_map(|record| record.id)
            .max()
            .unwrap_or(0)
            + 1;

        let mut files = Vec::with_capacity(records.len());
        for mut record in records {
            if record.status.is_deleted() && (purge_deleted || !record.is_persisted()) {
                continue;
            }
            if !record.is_persisted() && record.storage_path.is_empty() {
                debug!(name = %record.display_name, "Dropping new attachment without a stored file");
                continue;
            }
            if record.id.is_none() {
                record.id = Some(next_id);
                next_id += 1;
            }
            if record.status == AttachmentStatus::Added {
                record.status = AttachmentStatus::Unchanged;
            }
            record.uploaded_file = None;
            files.push(record);
        }

        info!(files = files.len(), "Saved attachment collection");
        document.files = files;
        document.files.len()
    }
}
