//! Markup of one attachment row.

use attachment_forms_common::markup::{
    ARCHIVED, BUTTON_CELL, DELETE_BUTTON, FILE_NAME, FILE_SIZE, FILE_STATUS, NEW_ROW, ROW_INDEX,
    TABLE_BUTTON, TABLE_TEXT, VALIDATION_MESSAGE, VALIDATION_ROW, VALMSG_FOR, VALMSG_REPLACE,
};
use attachment_forms_common::naming::{
    DISPLAY_NAME, FILE_PATH, ID, SIZE, STATUS, field_name, indexer_name,
};
use attachment_forms_common::{RowIndex, format_size};

use super::options::{OptionSources, ResolvedOptions};
use super::widgets::{WidgetInput, render_widget};
use super::{Column, DISPLAY_COLUMNS, EDIT_COLUMNS, Element, apply_format};
use crate::config::RenderSettings;
use crate::error::RenderError;
use crate::models::{AttachmentRecord, FieldDescriptor, FieldHint, FieldSet, FieldValue};

/// Whether rows carry editor widgets and binding fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    Edit,
    Display,
}

/// Everything a row needs besides its record, computed once per table.
#[derive(Debug, Clone, Copy)]
pub struct RowContext<'a> {
    /// Collection property name, the prefix of every field name
    pub property: &'a str,
    pub fields: &'a FieldSet,
    pub options: &'a OptionSources,
    pub settings: &'a RenderSettings,
}

impl RowContext<'_> {
    fn name(&self, index: RowIndex, member: &str) -> String {
        field_name(self.property, index, member)
    }
}

/// Render one row. In edit mode the paired validation row follows it.
pub fn render_row(
    ctx: &RowContext<'_>,
    record: &AttachmentRecord,
    index: RowIndex,
    mode: RenderMode,
) -> Result<String, RenderError> {
    let columns = match mode {
        RenderMode::Edit => EDIT_COLUMNS,
        RenderMode::Display => DISPLAY_COLUMNS,
    };

    let mut row = Element::new("tr")
        .class_if(record.status.is_deleted(), ARCHIVED)
        .class_if(mode == RenderMode::Edit && !record.is_persisted(), NEW_ROW);

    for column in columns {
        row = match column {
            Column::Name => row.child(name_cell(ctx, record, index)),
            Column::Extras => {
                let mut row = row;
                for field in ctx.fields {
                    let cell = match mode {
                        RenderMode::Edit => Element::new("td").html(&render_widget(&WidgetInput {
                            field,
                            value: record.extra(&field.name),
                            name: &ctx.name(index, &field.name),
                            property: ctx.property,
                            options: ctx.options,
                            labels: &ctx.settings.labels,
                        })?),
                        RenderMode::Display => {
                            Element::new("td").text(&display_value(ctx, field, record.extra(&field.name)))
                        }
                    };
                    row = row.child(cell);
                }
                row
            }
            Column::Size => {
                let size = match index {
                    RowIndex::Placeholder => String::new(),
                    RowIndex::At(_) => format_size(record.size_bytes),
                };
                row.child(
                    Element::new("td").child(
                        Element::new("div")
                            .class(TABLE_TEXT)
                            .class(FILE_SIZE)
                            .text(&size),
                    ),
                )
            }
            Column::Action => row.child(
                Element::new("td").class(BUTTON_CELL).child(
                    Element::new("button")
                        .class(TABLE_BUTTON)
                        .class(DELETE_BUTTON)
                        .attr("type", "button")
                        .html("&times;"),
                ),
            ),
            Column::Binding => row.child(binding_cell(ctx, record, index)),
        };
    }

    let mut markup = row.render();
    if mode == RenderMode::Edit {
        markup.push_str(&validation_row(ctx, index).render());
    }
    Ok(markup)
}

fn name_cell(ctx: &RowContext<'_>, record: &AttachmentRecord, index: RowIndex) -> Element {
    let content = Element::new("div").class(TABLE_TEXT).class(FILE_NAME);
    let content = match (index, record.id) {
        (RowIndex::Placeholder, _) => content,
        (RowIndex::At(_), Some(id)) => content.child(
            Element::new("a")
                .attr(
                    "href",
                    format!("{}/{}", ctx.settings.download_path.trim_end_matches('/'), id),
                )
                .attr("target", "_blank")
                .text(&record.display_name),
        ),
        (RowIndex::At(_), None) => content.text(&record.display_name),
    };
    Element::new("td").child(content)
}

/// Hidden fields the list binder reads back: indexer first, status last.
fn binding_cell(ctx: &RowContext<'_>, record: &AttachmentRecord, index: RowIndex) -> Element {
    let hidden = |name: String, value: String| {
        Element::void("input")
            .attr("type", "hidden")
            .attr("name", name)
            .attr("value", value)
    };

    Element::new("td")
        .child(
            Element::void("input")
                .class(ROW_INDEX)
                .attr("type", "hidden")
                .attr("name", indexer_name(ctx.property))
                .attr("value", index.to_string()),
        )
        .child(hidden(
            ctx.name(index, ID),
            record.id.map(|id| id.to_string()).unwrap_or_default(),
        ))
        .child(hidden(ctx.name(index, FILE_PATH), record.storage_path.clone()))
        .child(hidden(ctx.name(index, DISPLAY_NAME), record.display_name.clone()))
        .child(hidden(ctx.name(index, SIZE), record.size_bytes.to_string()))
        .child(
            Element::void("input")
                .class(FILE_STATUS)
                .attr("type", "hidden")
                .attr("name", ctx.name(index, STATUS))
                .attr("value", record.status.to_string()),
        )
}

fn validation_row(ctx: &RowContext<'_>, index: RowIndex) -> Element {
    let mut row = Element::new("tr").class(VALIDATION_ROW);
    for column in EDIT_COLUMNS {
        row = match column {
            Column::Extras => ctx.fields.iter().fold(row, |row, field| {
                row.child(
                    Element::new("td").child(
                        Element::new("span")
                            .class(VALIDATION_MESSAGE)
                            .attr(VALMSG_FOR, ctx.name(index, &field.name))
                            .attr(VALMSG_REPLACE, "true"),
                    ),
                )
            }),
            _ => row.child(Element::new("td")),
        };
    }
    row
}

/// Read-only text of an extra field value.
fn display_value(ctx: &RowContext<'_>, field: &FieldDescriptor, value: &FieldValue) -> String {
    let labels = &ctx.settings.labels;
    match value {
        FieldValue::Null => field.null_display_text.clone(),
        FieldValue::Bool(true) => labels.yes.clone(),
        FieldValue::Bool(false) => labels.no.clone(),
        FieldValue::Text(text) => {
            let shown = match (&field.hint, ctx.options.get(&field.name)) {
                (FieldHint::LinkedSelect { .. }, Some(ResolvedOptions::Select(options))) => options
                    .iter()
                    .find(|option| option.matches(text))
                    .map_or(text.as_str(), |option| option.label.as_str()),
                _ => text.as_str(),
            };
            apply_format(field.format.as_deref(), shown)
        }
    }
}
