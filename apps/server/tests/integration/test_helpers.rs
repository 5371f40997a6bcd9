//! Shared helpers for integration tests.

use actix_web::{App, dev::ServiceResponse, test, web};
use attachment_forms_lib::api::{self, AttachmentForm};
use attachment_forms_lib::config::RenderSettings;
use attachment_forms_lib::middleware::RequestLogger;
use attachment_forms_lib::models::FieldSet;
use attachment_forms_lib::services::documents::Document;
use attachment_forms_lib::services::{DocumentStore, FileStorage, demo_fields};
use regex::Regex;
use tempfile::TempDir;

/// Multipart boundary used by every test request.
pub const BOUNDARY: &str = "----attachment-forms-test";

/// Upload limit of test apps.
pub const TEST_MAX_UPLOAD_SIZE: usize = 64 * 1024;

/// State behind one test app. The storage root lives as long as this value.
pub struct TestState {
    pub dir: TempDir,
    pub form: web::Data<AttachmentForm>,
    pub documents: web::Data<DocumentStore>,
    pub storage: web::Data<FileStorage>,
}

impl TestState {
    /// Demo fields over the given document.
    pub fn new(document: Document) -> Self {
        Self::with_fields(document, demo_fields().expect("demo fields are valid"))
    }

    pub fn with_fields(document: Document, fields: FieldSet) -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let storage = FileStorage::new(dir.path());
        Self {
            form: web::Data::new(AttachmentForm {
                fields,
                render: RenderSettings::default(),
                purge_deleted: true,
                max_upload_size: TEST_MAX_UPLOAD_SIZE,
                client_enabled: false,
            }),
            documents: web::Data::new(DocumentStore::new(document)),
            storage: web::Data::new(storage),
            dir,
        }
    }
}

/// Demo document without attachments.
pub fn demo_document() -> Document {
    Document {
        title: "Test document".to_string(),
        categories: vec![
            attachment_forms_lib::models::SelectOption::new("finance", "Finance"),
            attachment_forms_lib::models::SelectOption::new("legal", "Legal"),
        ],
        tags: vec!["draft".to_string(), "final".to_string()],
        files: Vec::new(),
    }
}

/// Create a test app over `state`.
pub async fn init_app(
    state: &TestState,
) -> impl actix_web::dev::Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>
{
    let download_path = state.form.render.download_path.clone();
    test::init_service(
        App::new()
            .wrap(RequestLogger)
            .app_data(state.form.clone())
            .app_data(state.documents.clone())
            .app_data(state.storage.clone())
            .configure(|cfg| api::configure(cfg, &download_path)),
    )
    .await
}

/// One part of a multipart body.
pub enum Part<'a> {
    Text(&'a str, &'a str),
    /// Field name, file name, content
    File(&'a str, &'a str, &'a [u8]),
}

/// Encode `parts` as `multipart/form-data`, returning the content type and body.
pub fn multipart_body(parts: &[Part<'_>]) -> (String, Vec<u8>) {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File(name, file_name, content) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                        name, file_name
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
                body.extend_from_slice(content);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    (format!("multipart/form-data; boundary={}", BOUNDARY), body)
}

/// POST a multipart body to `/attachments`.
pub async fn post_form<S>(app: &S, parts: &[Part<'_>]) -> ServiceResponse
where
    S: actix_web::dev::Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let (content_type, body) = multipart_body(parts);
    let req = test::TestRequest::post()
        .uri("/attachments")
        .insert_header(("content-type", content_type))
        .set_payload(body)
        .to_request();
    test::call_service(app, req).await
}

/// GET `uri` and return status and body text.
pub async fn get_text<S>(app: &S, uri: &str) -> (u16, String)
where
    S: actix_web::dev::Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let req = test::TestRequest::get().uri(uri).to_request();
    let resp = test::call_service(app, req).await;
    let status = resp.status().as_u16();
    let body = test::read_body(resp).await;
    (status, String::from_utf8_lossy(&body).into_owned())
}

/// `(name, value)` pairs a browser would post for the `<input>` elements in
/// `markup`, in document order. Unchecked checkboxes and file pickers are skipped.
pub fn input_pairs(markup: &str) -> Vec<(String, String)> {
    let input = Regex::new(r#"<input[^>]*>"#).unwrap();
    let name = Regex::new(r#"\bname="([^"]*)""#).unwrap();
    let value = Regex::new(r#"\bvalue="([^"]*)""#).unwrap();

    input
        .find_iter(markup)
        .filter_map(|tag| {
            let tag = tag.as_str();
            if tag.contains(r#"type="file""#)
                || (tag.contains(r#"type="checkbox""#) && !tag.contains("checked="))
            {
                return None;
            }
            let name = name.captures(tag)?.get(1)?.as_str().to_string();
            let value = value
                .captures(tag)
                .and_then(|c| c.get(1))
                .map_or(String::new(), |v| v.as_str().to_string());
            Some((name, value))
        })
        .collect()
}
