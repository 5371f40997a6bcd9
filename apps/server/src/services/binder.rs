//! List binder: posted form data back into attachment records.
//!
//! The binder reads every `{property}.Index` value first to learn which rows
//! were posted and in which order, then reads `{property}[{index}].*` for
//! each of them. Rows rendered from the template keep the placeholder index
//! and are skipped.

use std::collections::HashSet;

use actix_multipart::Multipart;
use futures_util::StreamExt;
use serde_json::Value;
use tracing::{debug, warn};

use attachment_forms_common::naming::{
    DISPLAY_NAME, FILE, FILE_PATH, ID, PLACEHOLDER, SIZE, STATUS, field_name, indexer_name,
};
use attachment_forms_common::{AttachmentStatus, RowIndex};

use crate::error::{AppError, AppResult, BindError, RenderError};
use crate::models::{AttachmentRecord, FieldDescriptor, FieldHint, FieldSet, FieldType, FieldValue, UploadedFile};

/// One posted value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormValue {
    Text(String),
    File(UploadedFile),
}

/// Posted form fields in the order the browser sent them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    entries: Vec<(String, FormValue)>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_text(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), FormValue::Text(value.into())));
    }

    pub fn push_file(&mut self, name: impl Into<String>, file: UploadedFile) {
        self.entries.push((name.into(), FormValue::File(file)));
    }

    /// Every text value posted under `name`, in posted order.
    pub fn texts<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a str> {
        self.entries.iter().filter_map(move |(key, value)| match value {
            FormValue::Text(text) if key == name => Some(text.as_str()),
            _ => None,
        })
    }

    /// First text value posted under `name`.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.texts(name).next()
    }

    /// Remove and return the first file posted under `name`.
    pub fn take_file(&mut self, name: &str) -> Option<UploadedFile> {
        let position = self
            .entries
            .iter()
            .position(|(key, value)| key == name && matches!(value, FormValue::File(_)))?;
        match self.entries.remove(position).1 {
            FormValue::File(file) => Some(file),
            FormValue::Text(_) => None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for FormData {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut form = Self::new();
        for (name, value) in iter {
            form.push_text(name, value);
        }
        form
    }
}

/// Stream a multipart payload into memory.
///
/// File parts with an empty file name (an untouched picker) are dropped.
/// The total number of bytes read is capped at `max_upload_size`.
pub async fn read_multipart(payload: &mut Multipart, max_upload_size: usize) -> AppResult<FormData> {
    let mut form = FormData::new();
    let mut total_size: usize = 0;

    while let Some(item) = payload.next().await {
        let mut field =
            item.map_err(|e| AppError::InvalidInput(format!("Multipart error: {}", e)))?;

        let content_disposition = field
            .content_disposition()
            .ok_or_else(|| AppError::InvalidInput("Missing content disposition".to_string()))?;
        let name = content_disposition
            .get_name()
            .ok_or_else(|| AppError::InvalidInput("Multipart field without a name".to_string()))?
            .to_string();
        let file_name = content_disposition.get_filename().map(base_name);
        let content_type = field.content_type().map(|mime| mime.to_string());

        let mut data = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| AppError::InvalidInput(format!("Read error: {}", e)))?;
            total_size += chunk.len();
            if total_size > max_upload_size {
                return Err(AppError::PayloadTooLarge {
                    size: total_size,
                    limit: max_upload_size,
                });
            }
            data.extend_from_slice(&chunk);
        }

        match file_name {
            Some(file_name) if file_name.is_empty() => {
                debug!(field = %name, "Skipping empty file input");
            }
            Some(file_name) => form.push_file(
                name,
                UploadedFile {
                    file_name,
                    content_type,
                    data,
                },
            ),
            None => {
                let text = String::from_utf8(data).map_err(|_| {
                    AppError::InvalidInput(format!("Field '{}' is not valid UTF-8", name))
                })?;
                form.push_text(name, text);
            }
        }
    }

    debug!(fields = form.len(), bytes = total_size, "Read multipart form");
    Ok(form)
}

/// Strip any client-side directory from an uploaded file name.
fn base_name(file_name: &str) -> String {
    file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim()
        .to_string()
}

/// Materialize the posted rows of `property`, in posted order.
pub fn bind_attachments(
    mut form: FormData,
    property: &str,
    fields: &FieldSet,
) -> Result<Vec<AttachmentRecord>, BindError> {
    let indexer = indexer_name(property);
    let mut seen = HashSet::new();
    let mut indices = Vec::new();
    for value in form.texts(&indexer) {
        let value = value.trim();
        if value == PLACEHOLDER || !seen.insert(value) {
            continue;
        }
        let index = value
            .parse::<u64>()
            .map_err(|_| invalid(&indexer, value, "expected a row index"))?;
        indices.push(RowIndex::At(index));
    }

    let mut records = Vec::with_capacity(indices.len());
    for index in indices {
        let name = |member: &str| field_name(property, index, member);

        let id = match form.text(&name(ID)).map(str::trim) {
            None | Some("") => None,
            Some(value) => Some(
                value
                    .parse::<i64>()
                    .map_err(|_| invalid(&name(ID), value, "expected a whole number"))?,
            ),
        };
        let size_bytes = match form.text(&name(SIZE)).map(str::trim) {
            None | Some("") => 0,
            Some(value) => value
                .parse::<u64>()
                .map_err(|_| invalid(&name(SIZE), value, "expected a whole number"))?,
        };
        let status = match form.text(&name(STATUS)).map(str::trim) {
            None | Some("") if id.is_none() => AttachmentStatus::Added,
            None | Some("") => AttachmentStatus::Unchanged,
            Some(value) => AttachmentStatus::parse(value)
                .ok_or_else(|| invalid(&name(STATUS), value, "unknown status code"))?,
        };

        let mut record = AttachmentRecord {
            id,
            display_name: form.text(&name(DISPLAY_NAME)).unwrap_or_default().to_string(),
            storage_path: form.text(&name(FILE_PATH)).unwrap_or_default().to_string(),
            size_bytes,
            status,
            ..AttachmentRecord::default()
        };
        for field in fields {
            let member = name(&field.name);
            let values: Vec<&str> = form.texts(&member).collect();
            record
                .extras
                .insert(field.name.clone(), bind_extra(field, &member, &values)?);
        }
        record.uploaded_file = form.take_file(&name(FILE)).filter(|file| !file.is_empty());

        records.push(record);
    }

    debug!(property, rows = records.len(), "Bound attachment rows");
    Ok(records)
}

fn bind_extra(field: &FieldDescriptor, name: &str, values: &[&str]) -> Result<FieldValue, BindError> {
    let first = values.first().map(|value| value.trim());

    match &field.field_type {
        // Checkbox plus its hidden "false" twin.
        FieldType::Boolean => {
            let mut checked = false;
            for value in values {
                checked |= parse_bool(value).ok_or_else(|| invalid(name, value, "expected true or false"))?;
            }
            Ok(FieldValue::Bool(checked))
        }
        FieldType::OptionalBoolean => match first {
            None | Some("") => Ok(FieldValue::Null),
            Some(value) => parse_bool(value)
                .map(FieldValue::Bool)
                .ok_or_else(|| invalid(name, value, "expected true, false or nothing")),
        },
        FieldType::Enumeration { members } => match first {
            None | Some("") => Ok(FieldValue::Null),
            Some(value) if members.iter().any(|member| member == value) => Ok(FieldValue::from(value)),
            Some(value) => Err(invalid(name, value, "not a member of the enumeration")),
        },
        FieldType::Text => match (values.first(), &field.hint) {
            (None, _) => Ok(FieldValue::Null),
            (Some(value), FieldHint::LinkedSelect { .. }) if value.is_empty() => Ok(FieldValue::Null),
            (Some(value), _) => Ok(FieldValue::from(*value)),
        },
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

fn invalid(name: &str, value: &str, reason: &'static str) -> BindError {
    warn!(field = %name, value = %value, reason, "Rejected posted value");
    BindError::InvalidValue {
        name: name.to_string(),
        value: value.to_string(),
        reason,
    }
}

/// Read the record collection stored under `property` on a parent model.
///
/// Dotted properties (`Document.Files`) walk nested objects.
pub fn records_from_model(parent: &Value, property: &str) -> Result<Vec<AttachmentRecord>, RenderError> {
    let shape_error = |reason: String| RenderError::CollectionShape {
        property: property.to_string(),
        reason,
    };

    let value = property
        .split('.')
        .try_fold(parent, |value, key| value.get(key))
        .ok_or_else(|| shape_error("property not found".to_string()))?;
    if !value.is_array() {
        return Err(shape_error("expected a list".to_string()));
    }
    serde_json::from_value(value.clone()).map_err(|e| shape_error(e.to_string()))
}
