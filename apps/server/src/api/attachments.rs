//! Attachment pages and postback.
//!
//! - `GET /attachments`: read-only table with download links
//! - `GET /attachments/edit`: editor form driven by the wasm row controller
//! - `POST /attachments`: bind, restore server-owned fields, store, persist,
//!   then redirect to the display page

use actix_multipart::Multipart;
use actix_web::http::header;
use actix_web::{HttpResponse, get, post, web};
use tracing::{info, warn};

use crate::config::RenderSettings;
use crate::error::AppResult;
use crate::html::{AttachmentTable, escape};
use crate::models::FieldSet;
use crate::services::{
    DocumentStore, FILES_PROPERTY, FileStorage, bind_attachments, read_multipart,
    records_from_model,
};

/// Wasm bundle entry point produced by `wasm-pack build --target web`.
const CLIENT_SCRIPT: &str = "/pkg/attachment_forms_client.js";

/// Form-level settings shared by the attachment handlers.
#[derive(Debug, Clone)]
pub struct AttachmentForm {
    pub fields: FieldSet,
    pub render: RenderSettings,
    pub purge_deleted: bool,
    pub max_upload_size: usize,
    /// Whether the wasm controller is served under `/pkg`
    pub client_enabled: bool,
}

impl AttachmentForm {
    fn table(&self) -> AttachmentTable<'_> {
        AttachmentTable::new(&self.fields, &self.render)
    }
}

/// Read-only page.
#[get("/attachments")]
pub async fn show(
    form: web::Data<AttachmentForm>,
    documents: web::Data<DocumentStore>,
) -> AppResult<HttpResponse> {
    let model = documents.model().await?;
    let records = records_from_model(&model, FILES_PROPERTY)?;
    let table = form.table().render_display(&model, &records, FILES_PROPERTY)?;

    let body = format!(
        "{}<p><a href=\"/attachments/edit\">Edit attachments</a></p>",
        table
    );
    Ok(page(&documents.title().await, &body, false))
}

/// Editor page.
#[get("/attachments/edit")]
pub async fn edit(
    form: web::Data<AttachmentForm>,
    documents: web::Data<DocumentStore>,
) -> AppResult<HttpResponse> {
    let model = documents.model().await?;
    let records = records_from_model(&model, FILES_PROPERTY)?;
    let table = form.table().render_editable(&model, &records, FILES_PROPERTY)?;

    let body = format!(
        concat!(
            "<form method=\"post\" action=\"/attachments\" enctype=\"multipart/form-data\">",
            "{}<p><button type=\"submit\">Save</button> <a href=\"/attachments\">Cancel</a></p>",
            "</form>"
        ),
        table
    );
    Ok(page(&documents.title().await, &body, form.client_enabled))
}

/// Postback of the editor form.
#[post("/attachments")]
pub async fn save(
    form: web::Data<AttachmentForm>,
    documents: web::Data<DocumentStore>,
    storage: web::Data<FileStorage>,
    mut payload: Multipart,
) -> AppResult<HttpResponse> {
    let posted = read_multipart(&mut payload, form.max_upload_size).await?;
    let mut records = bind_attachments(posted, FILES_PROPERTY, &form.fields)?;
    documents.restore_server_fields(&mut records).await;

    let problems = storage.save(&mut records, form.purge_deleted).await;
    if !problems.is_empty() {
        warn!(count = problems.len(), "Attachments saved with storage problems");
    }

    let saved = documents.replace_files(records, form.purge_deleted).await;
    info!(saved, "Attachment postback processed");

    Ok(HttpResponse::SeeOther()
        .insert_header((header::LOCATION, "/attachments"))
        .finish())
}

fn page(title: &str, body: &str, with_client: bool) -> HttpResponse {
    let script = if with_client {
        format!(
            "<script type=\"module\">import init from '{}'; init();</script>",
            CLIENT_SCRIPT
        )
    } else {
        String::new()
    };

    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(format!(
            concat!(
                "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>{title}</title>",
                "<style>.archived td {{ text-decoration: line-through; opacity: 0.6; }}</style>",
                "</head><body><h1>{title}</h1>{body}{script}</body></html>"
            ),
            title = escape(title),
            body = body,
            script = script
        ))
}

/// Configure attachment page routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(show).service(edit).service(save);
}
