//! Option source resolution for linked extra fields.
//!
//! Choice lists live once on the parent model, not on each row, so they are
//! looked up a single time per render pass and shared by every row.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::debug;

use crate::error::RenderError;
use crate::models::{FieldHint, FieldSet, SelectOption};

/// Options resolved for one linked field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedOptions {
    /// Closed choice list, blank leading option included when configured.
    Select(Vec<SelectOption>),
    /// Free-text suggestions.
    Suggestions(Vec<String>),
}

/// Resolved options keyed by extra field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionSources {
    by_field: BTreeMap<String, ResolvedOptions>,
}

impl OptionSources {
    pub fn get(&self, field: &str) -> Option<&ResolvedOptions> {
        self.by_field.get(field)
    }

    /// Options of a field, failing when a linked field was never resolved.
    pub fn require(&self, field: &str) -> Result<&ResolvedOptions, RenderError> {
        self.get(field)
            .ok_or_else(|| RenderError::UnresolvedOptionSource {
                field: field.to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.by_field.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_field.is_empty()
    }
}

/// Resolve every linked field of `fields` against `parent`.
pub fn resolve_all(parent: &Value, fields: &FieldSet) -> Result<OptionSources, RenderError> {
    let mut by_field = BTreeMap::new();

    for field in fields {
        let resolved = match &field.hint {
            FieldHint::LinkedSelect {
                source_field,
                option_label,
            } => {
                let value = lookup(parent, &field.name, source_field)?;
                let mut options: Vec<SelectOption> = serde_json::from_value(value.clone())
                    .map_err(|_| RenderError::OptionSourceTypeMismatch {
                        field: field.name.clone(),
                        property: source_field.clone(),
                        expected: "a list of {value, label} objects",
                    })?;
                if let Some(label) = option_label {
                    options.insert(0, SelectOption::new("", label.as_str()));
                }
                ResolvedOptions::Select(options)
            }
            FieldHint::LinkedSuggestion { source_field } => {
                let value = lookup(parent, &field.name, source_field)?;
                let suggestions: Vec<String> =
                    serde_json::from_value(value.clone()).map_err(|_| {
                        RenderError::OptionSourceTypeMismatch {
                            field: field.name.clone(),
                            property: source_field.clone(),
                            expected: "a list of strings",
                        }
                    })?;
                ResolvedOptions::Suggestions(suggestions)
            }
            FieldHint::Plain | FieldHint::Multiline => continue,
        };

        debug!(field = %field.name, "Resolved option source");
        by_field.insert(field.name.clone(), resolved);
    }

    Ok(OptionSources { by_field })
}

fn lookup<'a>(parent: &'a Value, field: &str, property: &str) -> Result<&'a Value, RenderError> {
    match parent.get(property) {
        None => Err(RenderError::OptionSourceNotFound {
            field: field.to_string(),
            property: property.to_string(),
        }),
        Some(Value::Null) => Err(RenderError::EmptyOptionSource {
            field: field.to_string(),
            property: property.to_string(),
        }),
        Some(value) => Ok(value),
    }
}
