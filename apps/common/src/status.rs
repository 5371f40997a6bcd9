//! Row lifecycle status and its wire codes.

use serde::{Deserialize, Serialize};

/// Lifecycle status of one attachment row.
///
/// The numeric code is what travels in the hidden `Status` field. It is the
/// authoritative marker; the `archived` row class only mirrors it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttachmentStatus {
    /// Stored during this postback.
    Added,
    /// Already persisted and left untouched.
    #[default]
    Unchanged,
    /// Marked for deletion (soft delete until the storage purge runs).
    Deleted,
}

impl AttachmentStatus {
    /// Numeric code written into the hidden status field.
    pub fn code(self) -> i32 {
        match self {
            Self::Added => 1,
            Self::Unchanged => 0,
            Self::Deleted => -1,
        }
    }

    /// Parse a numeric status code.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(Self::Added),
            0 => Some(Self::Unchanged),
            -1 => Some(Self::Deleted),
            _ => None,
        }
    }

    /// Parse the textual value of a posted status field.
    pub fn parse(value: &str) -> Option<Self> {
        value.trim().parse::<i32>().ok().and_then(Self::from_code)
    }

    pub fn is_deleted(self) -> bool {
        matches!(self, Self::Deleted)
    }
}

impl std::fmt::Display for AttachmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}
