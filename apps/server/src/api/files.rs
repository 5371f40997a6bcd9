//! Attachment download handler.
//!
//! Streams a stored attachment back under its display name.

use actix_files::NamedFile;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::web;
use tracing::{debug, warn};

use crate::error::{AppError, AppResult};
use crate::services::{DocumentStore, FileStorage};

/// Serve the file of attachment `id` as a download.
pub async fn download(
    documents: web::Data<DocumentStore>,
    storage: web::Data<FileStorage>,
    path: web::Path<i64>,
) -> AppResult<NamedFile> {
    let id = path.into_inner();
    let not_found = || AppError::NotFound(format!("Attachment {}", id));

    let record = documents.find(id).await.ok_or_else(not_found)?;
    let file_path = storage.resolve(&record.storage_path).map_err(|e| {
        warn!(id, error = %e, "Attachment has no usable storage path");
        not_found()
    })?;

    debug!(id, path = %file_path.display(), "Serving attachment");

    let file = NamedFile::open_async(&file_path).await.map_err(|e| {
        warn!(id, error = %e, "Attachment file is missing");
        not_found()
    })?;

    Ok(file.set_content_disposition(ContentDisposition {
        disposition: DispositionType::Attachment,
        parameters: vec![DispositionParam::Filename(record.display_name)],
    }))
}

/// Configure the download route under `download_path`.
pub fn configure_routes(cfg: &mut web::ServiceConfig, download_path: &str) {
    let route = format!("{}/{{id}}", download_path.trim_end_matches('/'));
    cfg.service(web::resource(route).route(web::get().to(download)));
}
