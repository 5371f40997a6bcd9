//! Class and attribute names the browser controller looks elements up by.

pub const EDIT_TABLE: &str = "edit-table";
pub const READONLY_TABLE: &str = "readonly-table";
pub const FILE_ATTACHMENTS: &str = "file-attachments";

/// Editor widget of an extra field.
pub const TABLE_CONTROL: &str = "table-control";
pub const TABLE_BUTTON: &str = "table-button";
pub const ADD_BUTTON: &str = "add-button";
pub const DELETE_BUTTON: &str = "delete-button";
pub const BUTTON_CELL: &str = "button-cell";
pub const BUTTON_HEADER_CELL: &str = "button-header-cell";
pub const HIDDEN_HEADER_CELL: &str = "hidden-header-cell";

/// Row marked for deletion.
pub const ARCHIVED: &str = "archived";
/// Hidden status field.
pub const FILE_STATUS: &str = "file-status";
/// Hidden `{property}.Index` field.
pub const ROW_INDEX: &str = "row-index";
/// Row cloned from the template on the client, never persisted.
pub const NEW_ROW: &str = "new-row";
pub const VALIDATION_ROW: &str = "validation-row";
/// Hidden tbody holding the template row pair.
pub const TEMPLATE_ROWS: &str = "template-rows";

pub const TABLE_TEXT: &str = "table-text";
pub const FILE_NAME: &str = "file-name";
pub const FILE_SIZE: &str = "file-size";

pub const VALIDATION_MESSAGE: &str = "field-validation-valid";
pub const VALMSG_FOR: &str = "data-valmsg-for";
pub const VALMSG_REPLACE: &str = "data-valmsg-replace";

/// Status code a row held before it was archived on the client.
pub const PRIOR_STATUS: &str = "data-prior-status";

/// Selector matching every editable attachment table on a page.
pub const EDIT_TABLE_SELECTOR: &str = "table.edit-table.file-attachments";
