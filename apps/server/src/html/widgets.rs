//! Editor widget selection and emission for extra fields.
//!
//! Widgets carry only a `name` and the `table-control` class. They never get
//! an `id`: rows are cloned on the client and ids would repeat.

use attachment_forms_common::markup::TABLE_CONTROL;
use attachment_forms_common::naming::datalist_id;

use super::Element;
use super::options::{OptionSources, ResolvedOptions};
use crate::config::Labels;
use crate::error::RenderError;
use crate::models::{FieldDescriptor, FieldHint, FieldType, FieldValue, SelectOption};

/// Editor widget of one extra field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Widget<'a> {
    TextArea,
    CheckBox,
    /// Unset / true / false.
    TriStateSelect,
    EnumSelect { members: &'a [String] },
    LinkedSelect,
    LinkedSuggestion,
    TextBox,
}

/// Choose the widget for a field. First match wins.
pub fn resolve_widget(field: &FieldDescriptor) -> Widget<'_> {
    if matches!(field.hint, FieldHint::Multiline) {
        return Widget::TextArea;
    }
    match &field.field_type {
        FieldType::Boolean => return Widget::CheckBox,
        FieldType::OptionalBoolean => return Widget::TriStateSelect,
        FieldType::Enumeration { members } => return Widget::EnumSelect { members },
        FieldType::Text => {}
    }
    match field.hint {
        FieldHint::LinkedSelect { .. } => Widget::LinkedSelect,
        FieldHint::LinkedSuggestion { .. } => Widget::LinkedSuggestion,
        FieldHint::Plain | FieldHint::Multiline => Widget::TextBox,
    }
}

/// Inputs needed to emit one widget.
pub struct WidgetInput<'a> {
    pub field: &'a FieldDescriptor,
    pub value: &'a FieldValue,
    /// Composite field name
    pub name: &'a str,
    /// Collection property, used for suggestion list ids
    pub property: &'a str,
    pub options: &'a OptionSources,
    pub labels: &'a Labels,
}

/// Emit the editor markup of one extra field.
pub fn render_widget(input: &WidgetInput<'_>) -> Result<String, RenderError> {
    let current = input.value.as_form_value();

    let markup = match resolve_widget(input.field) {
        Widget::TextArea => Element::new("textarea")
            .class(TABLE_CONTROL)
            .attr("name", input.name)
            .attr("rows", "2")
            .text(current.as_deref().unwrap_or_default())
            .render(),
        Widget::CheckBox => {
            let checked = matches!(input.value, FieldValue::Bool(true));
            // Unchecked boxes post nothing; the hidden twin posts "false".
            let mut markup = Element::void("input")
                .class(TABLE_CONTROL)
                .attr("type", "checkbox")
                .attr("name", input.name)
                .attr("value", "true")
                .flag("checked", checked)
                .render();
            markup.push_str(
                &Element::void("input")
                    .attr("type", "hidden")
                    .attr("name", input.name)
                    .attr("value", "false")
                    .render(),
            );
            markup
        }
        Widget::TriStateSelect => {
            let options = [
                SelectOption::new("", input.labels.unset_option.as_str()),
                SelectOption::new("true", input.labels.yes.as_str()),
                SelectOption::new("false", input.labels.no.as_str()),
            ];
            select(input.name, &options, current.as_deref().or(Some("")))
        }
        Widget::EnumSelect { members } => {
            let options: Vec<SelectOption> =
                std::iter::once(SelectOption::new("", input.labels.no_selection.as_str()))
                    .chain(members.iter().map(|m| SelectOption::new(m.as_str(), m.as_str())))
                    .collect();
            select(input.name, &options, current.as_deref().or(Some("")))
        }
        Widget::LinkedSelect => match input.options.require(&input.field.name)? {
            ResolvedOptions::Select(options) => select(input.name, options, current.as_deref()),
            ResolvedOptions::Suggestions(_) => {
                return Err(RenderError::UnresolvedOptionSource {
                    field: input.field.name.clone(),
                });
            }
        },
        Widget::LinkedSuggestion => {
            if !matches!(
                input.options.require(&input.field.name)?,
                ResolvedOptions::Suggestions(_)
            ) {
                return Err(RenderError::UnresolvedOptionSource {
                    field: input.field.name.clone(),
                });
            }
            Element::void("input")
                .class(TABLE_CONTROL)
                .attr("type", "text")
                .attr("name", input.name)
                .attr("value", current.unwrap_or_default())
                .attr("list", datalist_id(input.property, &input.field.name))
                .attr("autocomplete", "off")
                .render()
        }
        Widget::TextBox => Element::void("input")
            .class(TABLE_CONTROL)
            .attr("type", "text")
            .attr("name", input.name)
            .attr("value", current.unwrap_or_default())
            .render(),
    };

    Ok(markup)
}

/// Select with at most one option marked selected.
fn select(name: &str, options: &[SelectOption], current: Option<&str>) -> String {
    let selected = current.and_then(|current| options.iter().position(|o| o.matches(current)));

    let mut element = Element::new("select").class(TABLE_CONTROL).attr("name", name);
    for (position, option) in options.iter().enumerate() {
        let mut markup = Element::new("option");
        if let Some(value) = &option.value {
            markup = markup.attr("value", value.as_str());
        }
        element = element.child(
            markup
                .flag("selected", selected == Some(position))
                .text(&option.label),
        );
    }
    element.render()
}

/// `<datalist>` shared by every row of a suggestion field.
pub fn render_datalist(property: &str, field: &str, suggestions: &[String]) -> String {
    suggestions
        .iter()
        .fold(
            Element::new("datalist").attr("id", datalist_id(property, field)),
            |list, suggestion| list.child(Element::new("option").attr("value", suggestion.as_str())),
        )
        .render()
}
