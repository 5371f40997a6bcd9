//! HTTP round trips through the attachment pages, postback and download.

use actix_web::http::StatusCode;
use actix_web::test;
use attachment_forms_lib::models::{AttachmentRecord, AttachmentStatus, FieldDescriptor, FieldSet};
use attachment_forms_lib::services::documents::Document;
use serde_json::Value;

use super::test_helpers::{
    Part, TEST_MAX_UPLOAD_SIZE, TestState, demo_document, get_text, init_app, post_form,
};

fn seeded_document(dir_file: &str) -> Document {
    Document {
        files: vec![AttachmentRecord {
            id: Some(1),
            display_name: "contract.pdf".to_string(),
            storage_path: dir_file.to_string(),
            size_bytes: 5,
            status: AttachmentStatus::Unchanged,
            ..AttachmentRecord::default()
        }],
        ..demo_document()
    }
}

#[actix_rt::test]
async fn test_health() {
    let state = TestState::new(demo_document());
    let app = init_app(&state).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("x-request-id"));

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["storage"], "available");
}

#[actix_rt::test]
async fn test_edit_page_embeds_multipart_form() {
    let state = TestState::new(demo_document());
    let app = init_app(&state).await;

    let (status, html) = get_text(&app, "/attachments/edit").await;
    assert_eq!(status, 200);
    assert!(html.contains(r#"enctype="multipart/form-data""#));
    assert!(html.contains(r#"<table class="edit-table file-attachments" id="Files">"#));
    assert!(html.contains(r#"<option value="">Select a category</option>"#));
    assert!(html.contains(r#"<datalist id="Files_Tag_datalist">"#));
    assert!(!html.contains("<script"));
}

#[actix_rt::test]
async fn test_new_row_is_stored_and_downloadable() {
    let state = TestState::new(demo_document());
    let app = init_app(&state).await;
    let content = b"%PDF-report-bytes".repeat(128);

    let resp = post_form(
        &app,
        &[
            // Template row, still posted with its placeholder index
            Part::Text("Files.Index", "#"),
            Part::Text("Files[#].ID", ""),
            Part::Text("Files[#].Status", "1"),
            Part::Text("Files[#].Confidential", "false"),
            // Row added on the client with minted index 17
            Part::Text("Files.Index", "17"),
            Part::Text("Files[17].ID", ""),
            Part::Text("Files[17].FilePath", ""),
            Part::Text("Files[17].DisplayName", ""),
            Part::Text("Files[17].Size", ""),
            Part::Text("Files[17].Status", "1"),
            Part::Text("Files[17].Comment", "Signed copy"),
            Part::Text("Files[17].Category", "legal"),
            Part::Text("Files[17].Tag", "final"),
            Part::Text("Files[17].Confidential", "true"),
            Part::Text("Files[17].Confidential", "false"),
            Part::Text("Files[17].Reviewed", ""),
            Part::Text("Files[17].Kind", "Contract"),
            Part::File("Files[17].File", "report.docx", &content),
            // Untouched footer picker
            Part::File("Files[#].File", "", b""),
        ],
    )
    .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers().get("location").unwrap(), "/attachments");

    let stored = state.documents.find(1).await.expect("new row gets id 1");
    assert_eq!(stored.display_name, "report.docx");
    assert_ne!(stored.storage_path, "report.docx");
    assert_eq!(stored.size_bytes, content.len() as u64);
    assert_eq!(stored.status, AttachmentStatus::Unchanged);
    assert!(state.dir.path().join(&stored.storage_path).exists());

    let (status, html) = get_text(&app, "/attachments").await;
    assert_eq!(status, 200);
    assert!(html.contains(r#"<a href="/attachments/download/1" target="_blank">report.docx</a>"#));
    assert!(html.contains("<td>Signed copy</td>"));
    assert!(html.contains("<td>Legal</td>"));
    assert!(html.contains("<td>Yes</td>"));
    assert!(html.contains("<td>Not reviewed</td>"));
    assert!(html.contains("<td>Contract</td>"));
    assert!(html.contains(">2 kB<"));

    let req = test::TestRequest::get()
        .uri("/attachments/download/1")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let disposition = resp
        .headers()
        .get("content-disposition")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.starts_with("attachment"));
    assert!(disposition.contains("report.docx"));
    assert_eq!(test::read_body(resp).await.as_ref(), content.as_slice());
}

#[actix_rt::test]
async fn test_deleted_row_is_purged() {
    let state = TestState::new(seeded_document("seed.pdf"));
    std::fs::write(state.dir.path().join("seed.pdf"), b"hello").unwrap();
    let app = init_app(&state).await;

    let resp = post_form(
        &app,
        &[
            Part::Text("Files.Index", "0"),
            Part::Text("Files[0].ID", "1"),
            Part::Text("Files[0].FilePath", "seed.pdf"),
            Part::Text("Files[0].DisplayName", "contract.pdf"),
            Part::Text("Files[0].Size", "5"),
            Part::Text("Files[0].Status", "-1"),
            Part::Text("Files[0].Confidential", "false"),
        ],
    )
    .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    assert!(!state.dir.path().join("seed.pdf").exists());
    assert!(state.documents.find(1).await.is_none());
    let (_, html) = get_text(&app, "/attachments").await;
    assert!(!html.contains("contract.pdf"));
}

#[actix_rt::test]
async fn test_missing_file_does_not_fail_postback() {
    let state = TestState::new(seeded_document("never-written.pdf"));
    let app = init_app(&state).await;

    let resp = post_form(
        &app,
        &[
            Part::Text("Files.Index", "0"),
            Part::Text("Files[0].ID", "1"),
            Part::Text("Files[0].FilePath", "never-written.pdf"),
            Part::Text("Files[0].Status", "-1"),
        ],
    )
    .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert!(state.documents.find(1).await.is_none());
}

#[actix_rt::test]
async fn test_unchanged_row_keeps_its_file() {
    let state = TestState::new(seeded_document("seed.pdf"));
    std::fs::write(state.dir.path().join("seed.pdf"), b"hello").unwrap();
    let app = init_app(&state).await;

    let resp = post_form(
        &app,
        &[
            Part::Text("Files.Index", "0"),
            Part::Text("Files[0].ID", "1"),
            Part::Text("Files[0].FilePath", "seed.pdf"),
            Part::Text("Files[0].DisplayName", "contract.pdf"),
            Part::Text("Files[0].Size", "5"),
            Part::Text("Files[0].Status", "0"),
            Part::Text("Files[0].Comment", "Countersigned"),
        ],
    )
    .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let stored = state.documents.find(1).await.unwrap();
    assert_eq!(stored.storage_path, "seed.pdf");
    assert!(state.dir.path().join("seed.pdf").exists());
    let (_, html) = get_text(&app, "/attachments/edit").await;
    assert!(html.contains("Countersigned</textarea>"));
}

#[actix_rt::test]
async fn test_invalid_status_is_rejected() {
    let state = TestState::new(demo_document());
    let app = init_app(&state).await;

    let resp = post_form(
        &app,
        &[
            Part::Text("Files.Index", "0"),
            Part::Text("Files[0].Status", "9"),
        ],
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "INVALID_INPUT");
    assert!(body["message"].as_str().unwrap().contains("Files[0].Status"));
}

#[actix_rt::test]
async fn test_oversized_postback_is_rejected() {
    let state = TestState::new(demo_document());
    let app = init_app(&state).await;
    let content = vec![0u8; TEST_MAX_UPLOAD_SIZE + 1];

    let resp = post_form(
        &app,
        &[
            Part::Text("Files.Index", "5"),
            Part::File("Files[5].File", "huge.bin", &content),
        ],
    )
    .await;
    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert!(state.documents.find(1).await.is_none());
}

#[actix_rt::test]
async fn test_unknown_download_is_not_found() {
    let state = TestState::new(seeded_document("gone.pdf"));
    let app = init_app(&state).await;

    let (status, _) = get_text(&app, "/attachments/download/42").await;
    assert_eq!(status, 404);
    // Record exists but its file does not.
    let (status, _) = get_text(&app, "/attachments/download/1").await;
    assert_eq!(status, 404);
}

#[actix_rt::test]
async fn test_misconfigured_option_source_is_a_server_error() {
    let fields = FieldSet::new(vec![
        FieldDescriptor::text("Owner").linked_select("Owners", None),
    ])
    .unwrap();
    let state = TestState::with_fields(demo_document(), fields);
    let app = init_app(&state).await;

    let req = test::TestRequest::get().uri("/attachments/edit").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "CONFIGURATION_ERROR");
}

#[actix_rt::test]
async fn test_empty_upload_does_not_create_a_record() {
    let state = TestState::new(demo_document());
    let app = init_app(&state).await;

    let resp = post_form(
        &app,
        &[
            Part::Text("Files.Index", "1700000000000"),
            Part::Text("Files[1700000000000].ID", ""),
            Part::Text("Files[1700000000000].Status", "1"),
            Part::File("Files[1700000000000].File", "empty.txt", b""),
        ],
    )
    .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert!(state.documents.find(1).await.is_none());

    let (_, html) = get_text(&app, "/attachments").await;
    assert!(!html.contains("/attachments/download/1"));
}

#[actix_rt::test]
async fn test_failed_write_does_not_create_a_record() {
    let state = TestState::new(demo_document());
    // Storage root is now a regular file, so every write fails.
    std::fs::remove_dir(state.dir.path()).unwrap();
    std::fs::write(state.dir.path(), b"").unwrap();
    let app = init_app(&state).await;

    let resp = post_form(
        &app,
        &[
            Part::Text("Files.Index", "3"),
            Part::Text("Files[3].Status", "1"),
            Part::File("Files[3].File", "report.docx", b"content"),
        ],
    )
    .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert!(state.documents.find(1).await.is_none());

    std::fs::remove_file(state.dir.path()).unwrap();
}

#[actix_rt::test]
async fn test_posted_storage_path_cannot_purge_a_kept_file() {
    let state = TestState::new(seeded_document("seed.pdf"));
    std::fs::write(state.dir.path().join("seed.pdf"), b"hello").unwrap();
    let app = init_app(&state).await;

    let resp = post_form(
        &app,
        &[
            Part::Text("Files.Index", "0"),
            Part::Text("Files[0].ID", "1"),
            Part::Text("Files[0].FilePath", "seed.pdf"),
            Part::Text("Files[0].Status", "0"),
            Part::Text("Files.Index", "9"),
            Part::Text("Files[9].ID", ""),
            Part::Text("Files[9].FilePath", "seed.pdf"),
            Part::Text("Files[9].Status", "-1"),
            Part::Text("Files.Index", "10"),
            Part::Text("Files[10].ID", "1"),
            Part::Text("Files[10].FilePath", "seed.pdf"),
            Part::Text("Files[10].Status", "-1"),
        ],
    )
    .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    assert!(state.dir.path().join("seed.pdf").exists());
    assert_eq!(state.documents.find(1).await.unwrap().storage_path, "seed.pdf");
    let (status, body) = get_text(&app, "/attachments/download/1").await;
    assert_eq!(status, 200);
    assert_eq!(body, "hello");
}

#[actix_rt::test]
async fn test_posted_storage_path_of_kept_row_is_ignored() {
    let state = TestState::new(seeded_document("seed.pdf"));
    std::fs::write(state.dir.path().join("seed.pdf"), b"hello").unwrap();
    std::fs::write(state.dir.path().join("other.pdf"), b"other").unwrap();
    let app = init_app(&state).await;

    let resp = post_form(
        &app,
        &[
            Part::Text("Files.Index", "0"),
            Part::Text("Files[0].ID", "1"),
            Part::Text("Files[0].FilePath", "other.pdf"),
            Part::Text("Files[0].DisplayName", "renamed.pdf"),
            Part::Text("Files[0].Size", "1"),
            Part::Text("Files[0].Status", "0"),
        ],
    )
    .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let stored = state.documents.find(1).await.unwrap();
    assert_eq!(stored.storage_path, "seed.pdf");
    assert_eq!(stored.display_name, "contract.pdf");
    assert_eq!(stored.size_bytes, 5);
}
