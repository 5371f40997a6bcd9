//! Row state transitions and index minting, independent of the DOM.

use std::collections::BTreeSet;

use attachment_forms_common::AttachmentStatus;
use attachment_forms_common::naming::{PLACEHOLDER, PLACEHOLDER_TOKEN};

/// Client-side state of one row pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowState {
    PersistedActive,
    PersistedDeleted,
    /// Added in this page session; only exists in the DOM.
    NewPending,
}

impl RowState {
    /// Classify a row from its `new-row` class and hidden status value.
    pub fn classify(is_new: bool, status: Option<AttachmentStatus>) -> Self {
        match (is_new, status) {
            (true, _) => Self::NewPending,
            (false, Some(AttachmentStatus::Deleted)) => Self::PersistedDeleted,
            (false, _) => Self::PersistedActive,
        }
    }
}

/// What a click on a row's delete button does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteAction {
    /// Drop the row pair from the DOM.
    Remove,
    /// Mark as deleted, remembering the status to restore.
    Archive { prior: AttachmentStatus },
    /// Undo an earlier archive.
    Restore { status: AttachmentStatus },
}

/// Decide the delete-button transition for a row.
///
/// `current` is the row's hidden status, `prior` the status recorded when it
/// was archived on this page. Undeleting a row that was rendered already
/// deleted restores Unchanged.
pub fn on_delete(
    state: RowState,
    current: Option<AttachmentStatus>,
    prior: Option<AttachmentStatus>,
) -> DeleteAction {
    match state {
        RowState::NewPending => DeleteAction::Remove,
        RowState::PersistedActive => DeleteAction::Archive {
            prior: current.unwrap_or_default(),
        },
        RowState::PersistedDeleted => DeleteAction::Restore {
            status: prior
                .filter(|status| !status.is_deleted())
                .unwrap_or_default(),
        },
    }
}

/// Mints row indices for added rows.
///
/// Indices start at the current time in milliseconds, so they never collide
/// with render positions, and are bumped past any index already in the
/// table and past every index minted before.
#[derive(Debug, Default)]
pub struct IndexMinter {
    last: Option<u64>,
}

impl IndexMinter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mint(&mut self, now_millis: u64, in_use: &BTreeSet<u64>) -> u64 {
        let mut candidate = match self.last {
            Some(last) => now_millis.max(last + 1),
            None => now_millis,
        };
        while in_use.contains(&candidate) {
            candidate += 1;
        }
        self.last = Some(candidate);
        candidate
    }
}

/// Whether a field name still carries the template placeholder.
pub fn is_placeholder_name(name: &str) -> bool {
    name.contains(PLACEHOLDER_TOKEN)
}

/// Indexer values worth posting: everything but the template's placeholder.
pub fn posted_indices<'a>(values: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
    values
        .into_iter()
        .filter(|value| value.trim() != PLACEHOLDER)
        .collect()
}

/// Numeric indices present in a table, ignoring the template's `#`.
pub fn live_indices<'a>(values: impl IntoIterator<Item = &'a str>) -> BTreeSet<u64> {
    values
        .into_iter()
        .filter_map(|value| value.trim().parse().ok())
        .collect()
}
