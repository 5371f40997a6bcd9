//! Composite field names for indexed collections.
//!
//! Every row field is named `{property}[{index}].{member}` and every row
//! contributes one `{property}.Index` field whose value is the row index.
//! The list binder reads the indexer values first to learn which rows are
//! present and in which order.
//!
//! The template row is rendered with the placeholder index `#`. Live indices
//! are always decimal digits, so the bracketed token `[#]` never occurs in a
//! live name and a single replace retargets a cloned row.

use std::fmt;

/// Placeholder used as the template row's index.
pub const PLACEHOLDER: &str = "#";

/// Placeholder as it appears inside a composite name.
pub const PLACEHOLDER_TOKEN: &str = "[#]";

/// Member name of the collection indexer field.
pub const INDEX: &str = "Index";

/// Core binding attributes carried by every row.
pub const ID: &str = "ID";
pub const FILE_PATH: &str = "FilePath";
pub const DISPLAY_NAME: &str = "DisplayName";
pub const SIZE: &str = "Size";
pub const STATUS: &str = "Status";
pub const FILE: &str = "File";

/// Names an extra field may not take because the row already binds them.
pub const RESERVED_MEMBERS: &[&str] = &[ID, FILE_PATH, DISPLAY_NAME, SIZE, STATUS, FILE, INDEX];

/// Index of one row inside a rendered collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowIndex {
    /// Render position for existing rows, or a client-minted value for added rows.
    At(u64),
    /// The template row, never submitted.
    Placeholder,
}

impl From<usize> for RowIndex {
    fn from(position: usize) -> Self {
        Self::At(position as u64)
    }
}

impl fmt::Display for RowIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::At(index) => write!(f, "{}", index),
            Self::Placeholder => f.write_str(PLACEHOLDER),
        }
    }
}

/// `{property}[{index}].{member}`
pub fn field_name(property: &str, index: RowIndex, member: &str) -> String {
    format!("{}[{}].{}", property, index, member)
}

/// `{property}.Index`
pub fn indexer_name(property: &str) -> String {
    format!("{}.{}", property, INDEX)
}

/// Rewrite every placeholder occurrence in a template name to a live index.
pub fn retarget(name: &str, index: u64) -> String {
    name.replace(PLACEHOLDER_TOKEN, &format!("[{}]", index))
}

/// Split a posted name into its index and member for the given property.
///
/// Returns `None` for names that belong to another property or do not follow
/// the composite convention.
pub fn parse_field_name<'a>(property: &str, name: &'a str) -> Option<(&'a str, &'a str)> {
    let rest = name.strip_prefix(property)?.strip_prefix('[')?;
    let (index, rest) = rest.split_once(']')?;
    let member = rest.strip_prefix('.')?;
    if index.is_empty() || member.is_empty() {
        return None;
    }
    Some((index, member))
}

/// Element id derived from a field name (`Document.Files` -> `Document_Files`).
pub fn id_from_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Id of the suggestion list shared by every row of one extra field.
pub fn datalist_id(property: &str, field: &str) -> String {
    format!("{}_{}_datalist", id_from_name(property), id_from_name(field))
}
