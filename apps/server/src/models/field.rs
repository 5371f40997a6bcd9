//! Extra field descriptors.
//!
//! An attachment row carries the core attachment attributes plus an open set
//! of scalar "extra" fields. The integrating application declares those
//! fields once as a [`FieldSet`]; the renderer and the binder both work from
//! that list instead of inspecting record types at runtime.

use serde::{Deserialize, Serialize};

use attachment_forms_common::naming::RESERVED_MEMBERS;

use crate::error::FieldSetError;

/// Declared type of an extra field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldType {
    Text,
    Boolean,
    OptionalBoolean,
    /// Closed set of symbolic names, rendered and bound by name.
    Enumeration { members: Vec<String> },
}

/// Widget and option-source annotation of an extra field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldHint {
    #[default]
    Plain,
    Multiline,
    /// Closed choice list read from a property of the parent model.
    LinkedSelect {
        source_field: String,
        /// Text of a blank leading option, if any.
        option_label: Option<String>,
    },
    /// Free text with suggestions read from a property of the parent model.
    LinkedSuggestion { source_field: String },
}

impl FieldHint {
    /// Parent model property supplying the options, for linked hints.
    pub fn source_field(&self) -> Option<&str> {
        match self {
            Self::LinkedSelect { source_field, .. } | Self::LinkedSuggestion { source_field } => {
                Some(source_field)
            }
            Self::Plain | Self::Multiline => None,
        }
    }
}

/// One extra column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Member name used in `{property}[{index}].{name}`
    pub name: String,
    pub field_type: FieldType,
    #[serde(default)]
    pub hint: FieldHint,
    /// Header text; falls back to `name`
    #[serde(default)]
    pub display_name: Option<String>,
    /// Text shown in display mode for a null value
    #[serde(default)]
    pub null_display_text: String,
    /// Display format; `{0}` is replaced with the value
    #[serde(default)]
    pub format: Option<String>,
}

impl FieldDescriptor {
    fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            hint: FieldHint::Plain,
            display_name: None,
            null_display_text: String::new(),
            format: None,
        }
    }

    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Text)
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Boolean)
    }

    pub fn optional_boolean(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::OptionalBoolean)
    }

    pub fn enumeration<I, S>(name: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            name,
            FieldType::Enumeration {
                members: members.into_iter().map(Into::into).collect(),
            },
        )
    }

    pub fn multiline(mut self) -> Self {
        self.hint = FieldHint::Multiline;
        self
    }

    pub fn linked_select(mut self, source_field: impl Into<String>, option_label: Option<&str>) -> Self {
        self.hint = FieldHint::LinkedSelect {
            source_field: source_field.into(),
            option_label: option_label.map(str::to_string),
        };
        self
    }

    pub fn linked_suggestion(mut self, source_field: impl Into<String>) -> Self {
        self.hint = FieldHint::LinkedSuggestion {
            source_field: source_field.into(),
        };
        self
    }

    pub fn display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn null_display_text(mut self, text: impl Into<String>) -> Self {
        self.null_display_text = text.into();
        self
    }

    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Text of the column header.
    pub fn header_text(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }

    /// Value a fresh row starts with.
    pub fn default_value(&self) -> FieldValue {
        match self.field_type {
            FieldType::Boolean => FieldValue::Bool(false),
            _ => FieldValue::Null,
        }
    }

    fn validate(&self) -> Result<(), FieldSetError> {
        if self.name.is_empty() {
            return Err(FieldSetError::EmptyName);
        }
        if self
            .name
            .chars()
            .any(|c| matches!(c, '[' | ']' | '.' | '#') || c.is_whitespace())
        {
            return Err(FieldSetError::InvalidName(self.name.clone()));
        }
        if RESERVED_MEMBERS.contains(&self.name.as_str()) {
            return Err(FieldSetError::Reserved(self.name.clone()));
        }
        if let FieldType::Enumeration { members } = &self.field_type
            && members.is_empty()
        {
            return Err(FieldSetError::EmptyEnumeration(self.name.clone()));
        }
        if let Some(source) = self.hint.source_field()
            && source.trim().is_empty()
        {
            return Err(FieldSetError::MissingSource(self.name.clone()));
        }
        Ok(())
    }
}

/// Validated extra fields in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSet {
    fields: Vec<FieldDescriptor>,
}

impl FieldSet {
    pub fn new(fields: Vec<FieldDescriptor>) -> Result<Self, FieldSetError> {
        for (position, field) in fields.iter().enumerate() {
            field.validate()?;
            if fields[..position].iter().any(|f| f.name == field.name) {
                return Err(FieldSetError::Duplicate(field.name.clone()));
            }
        }
        Ok(Self { fields })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldDescriptor> {
        self.fields.iter()
    }

    pub fn get(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<'a> IntoIterator for &'a FieldSet {
    type Item = &'a FieldDescriptor;
    type IntoIter = std::slice::Iter<'a, FieldDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

/// Value of one extra field on one record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    #[default]
    Null,
    Bool(bool),
    Text(String),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Form representation; `None` for null.
    pub fn as_form_value(&self) -> Option<String> {
        match self {
            Self::Null => None,
            Self::Bool(value) => Some(value.to_string()),
            Self::Text(value) => Some(value.clone()),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<Option<bool>> for FieldValue {
    fn from(value: Option<bool>) -> Self {
        value.map_or(Self::Null, Self::Bool)
    }
}

/// One entry of a select list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SelectOption {
    /// Submitted value; options without one submit their label
    #[serde(default)]
    pub value: Option<String>,
    #[serde(alias = "text")]
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            label: label.into(),
        }
    }

    /// Whether this option represents `current`: by value, or by label when it has no value.
    pub fn matches(&self, current: &str) -> bool {
        match &self.value {
            Some(value) => value == current,
            None => self.label == current,
        }
    }
}
