//! Rendered markup against the client and binder naming contract.

use attachment_forms_common::naming::retarget;
use attachment_forms_lib::config::RenderSettings;
use attachment_forms_lib::html::AttachmentTable;
use attachment_forms_lib::models::{AttachmentRecord, AttachmentStatus, FieldValue};
use attachment_forms_lib::services::{FormData, bind_attachments, demo_fields};
use regex::Regex;
use serde_json::{Value, json};

use super::test_helpers::input_pairs;

fn parent() -> Value {
    json!({
        "Categories": [{"value": "finance", "label": "Finance"}, {"value": "legal", "label": "Legal"}],
        "Tags": ["draft", "final"]
    })
}

fn records(count: usize) -> Vec<AttachmentRecord> {
    (0..count)
        .map(|i| AttachmentRecord {
            id: Some(100 + i as i64),
            display_name: format!("scan-{}.pdf", i),
            storage_path: format!("{}.pdf", i),
            size_bytes: 4096,
            ..AttachmentRecord::default()
        })
        .collect()
}

fn render_editable(records: &[AttachmentRecord]) -> String {
    let fields = demo_fields().unwrap();
    let settings = RenderSettings::default();
    AttachmentTable::new(&fields, &settings)
        .render_editable(&parent(), records, "Files")
        .unwrap()
}

#[test]
fn test_rendered_indices_round_trip() {
    let markup = render_editable(&records(5));
    let (body, _) = markup.split_once("template-rows").unwrap();

    let indexer = Regex::new(r#"name="Files\.Index" value="(\d+)""#).unwrap();
    let indices: Vec<u64> = indexer
        .captures_iter(body)
        .map(|c| c[1].parse().unwrap())
        .collect();
    assert_eq!(indices, [0, 1, 2, 3, 4]);

    let id_fields = Regex::new(r#"name="Files\[(\d+)\]\.ID""#).unwrap();
    let id_indices: Vec<u64> = id_fields
        .captures_iter(body)
        .map(|c| c[1].parse().unwrap())
        .collect();
    assert_eq!(id_indices, indices);
}

#[test]
fn test_rendered_rows_bind_back_unchanged() {
    let mut originals = records(3);
    originals[1].status = AttachmentStatus::Deleted;
    originals[2].set_extra("Confidential", true);
    let markup = render_editable(&originals);
    let (body, _) = markup.split_once("template-rows").unwrap();

    let form: FormData = input_pairs(body).into_iter().collect();
    let bound = bind_attachments(form, "Files", &demo_fields().unwrap()).unwrap();

    assert_eq!(bound.len(), 3);
    for (bound, original) in bound.iter().zip(&originals) {
        assert_eq!(bound.id, original.id);
        assert_eq!(bound.display_name, original.display_name);
        assert_eq!(bound.storage_path, original.storage_path);
        assert_eq!(bound.size_bytes, original.size_bytes);
        assert_eq!(bound.status, original.status);
    }
    assert_eq!(bound[0].extra("Confidential"), &FieldValue::Bool(false));
    assert_eq!(bound[2].extra("Confidential"), &FieldValue::Bool(true));
}

#[test]
fn test_cloned_template_row_carries_minted_index() {
    let markup = render_editable(&[]);
    let (_, template) = markup.split_once(r#"class="template-rows""#).unwrap();
    let (template, _) = template.split_once("</tbody>").unwrap();

    // What the row controller does with a picked file and index 17.
    let clone = retarget(template, 17).replace(
        r##"name="Files.Index" value="#""##,
        r#"name="Files.Index" value="17""#,
    );

    for member in ["ID", "FilePath", "DisplayName", "Size", "Status"] {
        assert!(
            clone.contains(&format!(r#"name="Files[17].{}""#, member)),
            "missing Files[17].{}",
            member
        );
    }
    assert!(clone.contains(r#"data-valmsg-for="Files[17].Comment""#));
    assert!(!clone.contains("[#]"));

    let form: FormData = input_pairs(&clone).into_iter().collect();
    let bound = bind_attachments(form, "Files", &demo_fields().unwrap()).unwrap();
    assert_eq!(bound.len(), 1);
    assert_eq!(bound[0].id, None);
    assert_eq!(bound[0].status, AttachmentStatus::Added);
}

#[test]
fn test_template_row_is_never_bound() {
    let markup = render_editable(&records(1));
    let form: FormData = input_pairs(&markup).into_iter().collect();
    let bound = bind_attachments(form, "Files", &demo_fields().unwrap()).unwrap();
    assert_eq!(bound.len(), 1);
    assert_eq!(bound[0].id, Some(100));
}

#[test]
fn test_client_facing_classes() {
    let mut rows = records(2);
    rows[0].status = AttachmentStatus::Deleted;
    let markup = render_editable(&rows);

    for class in [
        r#"class="edit-table file-attachments""#,
        r#"class="table-control""#,
        r#"class="table-button add-button""#,
        r#"class="table-button delete-button""#,
        r#"class="archived""#,
        r#"class="file-status""#,
        r#"class="button-cell""#,
        r#"class="hidden-header-cell""#,
    ] {
        assert!(markup.contains(class), "missing {}", class);
    }
    assert!(!markup.contains(" id=\"Files_Comment"));
}

#[test]
fn test_sizes_in_display_table() {
    let fields = demo_fields().unwrap();
    let settings = RenderSettings::default();
    let rows = vec![
        AttachmentRecord {
            display_name: "a.pdf".to_string(),
            size_bytes: 2_097_152,
            ..AttachmentRecord::default()
        },
        AttachmentRecord {
            display_name: "b.pdf".to_string(),
            size_bytes: 512_000,
            ..AttachmentRecord::default()
        },
    ];
    let markup = AttachmentTable::new(&fields, &settings)
        .render_display(&parent(), &rows, "Files")
        .unwrap();

    assert!(markup.contains(r#"<div class="table-text file-size">2.00 MB</div>"#));
    assert!(markup.contains(r#"<div class="table-text file-size">500 kB</div>"#));
    // Unsaved rows have nothing to download.
    assert!(markup.contains(r#"<div class="table-text file-name">a.pdf</div>"#));
}

#[test]
fn test_null_linked_select_source_is_a_configuration_error() {
    let fields = demo_fields().unwrap();
    let settings = RenderSettings::default();
    let err = AttachmentTable::new(&fields, &settings)
        .render_editable(&json!({"Categories": null, "Tags": []}), &records(1), "Files")
        .unwrap_err();
    assert!(err.to_string().contains("'Category'"));
}
