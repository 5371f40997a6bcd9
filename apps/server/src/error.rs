//! Domain error types for the attachment forms server.
//!
//! Uses thiserror for ergonomic error handling with automatic Display implementations.

use actix_web::{HttpResponse, ResponseError};
use std::fmt;

/// Application-level errors.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Developer mistake in field descriptors or the parent model
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Resource not found
    #[error("{0} not found")]
    NotFound(String),

    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Posted form exceeds the configured upload limit
    #[error("Upload of {size} bytes exceeds the limit of {limit} bytes")]
    PayloadTooLarge { size: usize, limit: usize },

    /// File system operation failed
    #[error("Storage error: {0}")]
    Storage(String),
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let (status, error_code, response_message) = match self {
            AppError::Configuration(err_str) => {
                tracing::error!("Configuration error: {}", err_str);
                (
                    actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "CONFIGURATION_ERROR",
                    "The attachment list is misconfigured".to_string(),
                )
            }
            AppError::NotFound(_) => (
                actix_web::http::StatusCode::NOT_FOUND,
                "NOT_FOUND",
                self.to_string(),
            ),
            AppError::InvalidInput(_) => (
                actix_web::http::StatusCode::BAD_REQUEST,
                "INVALID_INPUT",
                self.to_string(),
            ),
            AppError::PayloadTooLarge { .. } => (
                actix_web::http::StatusCode::PAYLOAD_TOO_LARGE,
                "PAYLOAD_TOO_LARGE",
                self.to_string(),
            ),
            AppError::Storage(err_str) => {
                tracing::error!("Storage error: {}", err_str);
                (
                    actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_ERROR",
                    self.to_string(),
                )
            }
        };

        HttpResponse::build(status).json(ErrorResponse {
            error: error_code.to_string(),
            message: response_message,
        })
    }
}

/// Error response body.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

/// Render-time failures.
///
/// Every variant is a developer mistake (descriptor/model mismatch), never bad
/// user data, so rendering stops instead of degrading.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error("option source '{property}' for field '{field}' does not exist on the parent model")]
    OptionSourceNotFound { field: String, property: String },

    #[error("option source '{property}' for field '{field}' is null")]
    EmptyOptionSource { field: String, property: String },

    #[error("option source '{property}' for field '{field}' must be {expected}")]
    OptionSourceTypeMismatch {
        field: String,
        property: String,
        expected: &'static str,
    },

    #[error("field '{field}' is linked to an option source that was not resolved")]
    UnresolvedOptionSource { field: String },

    #[error("collection '{property}' is not a list of attachment records: {reason}")]
    CollectionShape { property: String, reason: String },
}

/// Field descriptor validation failures, raised once at startup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldSetError {
    #[error("extra field name must not be empty")]
    EmptyName,

    #[error("extra field '{0}' contains characters reserved by the binding syntax")]
    InvalidName(String),

    #[error("extra field '{0}' is declared more than once")]
    Duplicate(String),

    #[error("extra field '{0}' collides with a core attachment attribute")]
    Reserved(String),

    #[error("enumeration field '{0}' declares no members")]
    EmptyEnumeration(String),

    #[error("linked field '{0}' names no option source property")]
    MissingSource(String),
}

/// Posted form data that cannot be bound to attachment records.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindError {
    #[error("field '{name}' has invalid value '{value}': {reason}")]
    InvalidValue {
        name: String,
        value: String,
        reason: &'static str,
    },
}

/// A storage failure isolated to one record of a batch.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("attachment #{index} ('{display_name}'): {reason}")]
pub struct StorageProblem {
    /// Position of the record in the saved collection
    pub index: usize,
    pub display_name: String,
    pub reason: String,
}

// Conversions used by `?` in handlers

impl From<RenderError> for AppError {
    fn from(err: RenderError) -> Self {
        AppError::Configuration(err.to_string())
    }
}

impl From<BindError> for AppError {
    fn from(err: BindError) -> Self {
        AppError::InvalidInput(err.to_string())
    }
}
