//! Whole-table assembly for attachment collections.

use serde_json::Value;
use tracing::debug;

use attachment_forms_common::RowIndex;
use attachment_forms_common::markup::{
    ADD_BUTTON, BUTTON_CELL, BUTTON_HEADER_CELL, EDIT_TABLE, FILE_ATTACHMENTS,
    HIDDEN_HEADER_CELL, READONLY_TABLE, TABLE_BUTTON, TABLE_CONTROL, TEMPLATE_ROWS,
};
use attachment_forms_common::naming::{FILE, field_name, id_from_name};

use super::options::{ResolvedOptions, resolve_all};
use super::row::{RenderMode, RowContext, render_row};
use super::widgets::render_datalist;
use super::{Column, DISPLAY_COLUMNS, EDIT_COLUMNS, Element};
use crate::config::RenderSettings;
use crate::error::RenderError;
use crate::models::{AttachmentRecord, FieldSet};

/// Renders attachment collections for one field set.
#[derive(Debug, Clone, Copy)]
pub struct AttachmentTable<'a> {
    pub fields: &'a FieldSet,
    pub settings: &'a RenderSettings,
}

impl<'a> AttachmentTable<'a> {
    pub fn new(fields: &'a FieldSet, settings: &'a RenderSettings) -> Self {
        Self { fields, settings }
    }

    /// Editable table: header, one row pair per record, hidden template row
    /// pair, footer with the file picker, then one suggestion list per
    /// suggestion field.
    pub fn render_editable(
        &self,
        parent: &Value,
        records: &[AttachmentRecord],
        property: &str,
    ) -> Result<String, RenderError> {
        let options = resolve_all(parent, self.fields)?;
        let ctx = RowContext {
            property,
            fields: self.fields,
            options: &options,
            settings: self.settings,
        };

        let mut body = String::new();
        for (position, record) in records.iter().enumerate() {
            body.push_str(&render_row(&ctx, record, position.into(), RenderMode::Edit)?);
        }

        let template = render_row(
            &ctx,
            &AttachmentRecord::placeholder(self.fields),
            RowIndex::Placeholder,
            RenderMode::Edit,
        )?;

        let table = Element::new("table")
            .class(EDIT_TABLE)
            .class(FILE_ATTACHMENTS)
            .attr("id", id_from_name(property))
            .child(Element::new("thead").child(self.header_row(EDIT_COLUMNS)))
            .child(Element::new("tbody").html(&body))
            .child(
                Element::new("tbody")
                    .class(TEMPLATE_ROWS)
                    .attr("style", "display:none;")
                    .html(&template),
            )
            .child(Element::new("tfoot").child(self.footer_row(property)));

        let mut markup = table.render();
        for field in self.fields {
            if let Some(ResolvedOptions::Suggestions(suggestions)) = options.get(&field.name) {
                markup.push_str(&render_datalist(property, &field.name, suggestions));
            }
        }

        debug!(property, rows = records.len(), "Rendered editable attachment table");
        Ok(markup)
    }

    /// Read-only table with download links and formatted values.
    pub fn render_display(
        &self,
        parent: &Value,
        records: &[AttachmentRecord],
        property: &str,
    ) -> Result<String, RenderError> {
        let options = resolve_all(parent, self.fields)?;
        let ctx = RowContext {
            property,
            fields: self.fields,
            options: &options,
            settings: self.settings,
        };

        let mut body = String::new();
        for (position, record) in records.iter().enumerate() {
            body.push_str(&render_row(&ctx, record, position.into(), RenderMode::Display)?);
        }

        debug!(property, rows = records.len(), "Rendered attachment table");
        Ok(Element::new("table")
            .class(READONLY_TABLE)
            .class(FILE_ATTACHMENTS)
            .attr("id", id_from_name(property))
            .child(Element::new("thead").child(self.header_row(DISPLAY_COLUMNS)))
            .child(Element::new("tbody").html(&body))
            .render())
    }

    fn header_row(&self, columns: &[Column]) -> Element {
        let labels = &self.settings.labels;
        columns.iter().fold(Element::new("tr"), |row, column| match column {
            Column::Name => row.child(Element::new("th").text(&labels.file_name)),
            Column::Extras => self.fields.iter().fold(row, |row, field| {
                row.child(Element::new("th").text(field.header_text()))
            }),
            Column::Size => row.child(Element::new("th").text(&labels.file_size)),
            Column::Action => row.child(Element::new("th").class(BUTTON_HEADER_CELL)),
            Column::Binding => row.child(Element::new("th").class(HIDDEN_HEADER_CELL)),
        })
    }

    fn footer_row(&self, property: &str) -> Element {
        EDIT_COLUMNS
            .iter()
            .fold(Element::new("tr"), |row, column| match column {
                Column::Extras => self
                    .fields
                    .iter()
                    .fold(row, |row, _| row.child(Element::new("td"))),
                Column::Action => row.child(
                    Element::new("td")
                        .class(BUTTON_CELL)
                        .child(
                            Element::new("button")
                                .class(TABLE_BUTTON)
                                .class(ADD_BUTTON)
                                .attr("type", "button")
                                .text("+"),
                        )
                        .child(
                            Element::void("input")
                                .class(TABLE_CONTROL)
                                .attr("type", "file")
                                .attr("name", field_name(property, RowIndex::Placeholder, FILE))
                                .attr("style", "display:none"),
                        ),
                ),
                _ => row.child(Element::new("td")),
            })
    }
}
