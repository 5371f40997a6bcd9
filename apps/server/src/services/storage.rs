//! Local file storage for attachment uploads.
//!
//! Uploaded files are written under a single root directory with a
//! server-generated name (`{uuid}.{extension}`); the original file name only
//! survives as the record's display name.

use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{AppError, AppResult, StorageProblem};
use crate::models::{AttachmentRecord, AttachmentStatus};

/// Storage root for attachment files.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the storage root if it does not exist yet.
    pub async fn ensure_root(&self) -> AppResult<()> {
        tokio::fs::create_dir_all(&self.root).await.map_err(|e| {
            AppError::Storage(format!(
                "Failed to create storage directory {}: {}",
                self.root.display(),
                e
            ))
        })?;
        info!("Attachment storage ready at {}", self.root.display());
        Ok(())
    }

    /// Store uploaded files and purge deleted ones.
    ///
    /// Records with an uploaded file get a fresh storage name, their display
    /// name, size and status are overwritten and the in-memory upload is
    /// released. Deleted records lose their file when `purge_deleted` is set,
    /// unless a record that is kept still references it.
    /// Failures are collected per record; the rest of the batch proceeds.
    pub async fn save(
        &self,
        records: &mut [AttachmentRecord],
        purge_deleted: bool,
    ) -> Vec<StorageProblem> {
        let mut problems = Vec::new();
        let referenced: HashSet<String> = records
            .iter()
            .filter(|record| !record.status.is_deleted() && !record.storage_path.is_empty())
            .map(|record| record.storage_path.clone())
            .collect();

        for (index, record) in records.iter_mut().enumerate() {
            if let Some(upload) = record.uploaded_file.take() {
                let storage_name = storage_name(&upload.file_name);
                match tokio::fs::write(self.root.join(&storage_name), &upload.data).await {
                    Ok(()) => {
                        info!(
                            file = %upload.file_name,
                            storage_name = %storage_name,
                            bytes = upload.len(),
                            "Stored attachment"
                        );
                        record.display_name = upload.file_name;
                        record.storage_path = storage_name;
                        record.size_bytes = upload.data.len() as u64;
                        record.status = AttachmentStatus::Added;
                    }
                    Err(e) => problems.push(StorageProblem {
                        index,
                        display_name: upload.file_name,
                        reason: format!("write failed: {}", e),
                    }),
                }
                continue;
            }

            if purge_deleted
                && record.status.is_deleted()
                && !record.storage_path.is_empty()
                && !referenced.contains(&record.storage_path)
                && let Err(reason) = self.remove(&record.storage_path).await
            {
                problems.push(StorageProblem {
                    index,
                    display_name: record.display_name.clone(),
                    reason,
                });
            }
        }

        for problem in &problems {
            warn!("Storage problem: {}", problem);
        }
        problems
    }

    async fn remove(&self, storage_path: &str) -> Result<(), String> {
        let path = self.resolve(storage_path).map_err(|e| e.to_string())?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                debug!(path = %path.display(), "Removed attachment file");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(path = %path.display(), "Attachment file already gone");
                Ok(())
            }
            Err(e) => Err(format!("delete failed: {}", e)),
        }
    }

    /// Map a stored name to its path under the root.
    pub fn resolve(&self, storage_path: &str) -> AppResult<PathBuf> {
        let relative = Path::new(storage_path);
        let plain = !storage_path.is_empty()
            && relative
                .components()
                .all(|component| matches!(component, Component::Normal(_)));
        if !plain {
            return Err(AppError::InvalidInput(format!(
                "Invalid storage path '{}'",
                storage_path
            )));
        }
        Ok(self.root.join(relative))
    }
}

/// Random storage name keeping the original extension.
fn storage_name(file_name: &str) -> String {
    match Path::new(file_name).extension().and_then(|ext| ext.to_str()) {
        Some(extension) => format!("{}.{}", Uuid::new_v4(), extension),
        None => Uuid::new_v4().to_string(),
    }
}
