//! Typed error handling for the crudgen crate
//!
//! One enum covers the whole surface: setup-time failures (unknown table,
//! duplicate resource), request validation, and store results. Handlers
//! render read-path errors through [`IntoResponse`]; mutating handlers map
//! `Conflict`/`NotFound` into the boolean envelope instead.

use crate::core::id::RecordId;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// A single field validation error
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// The error type for setup, validation and store operations
#[derive(Debug, Error)]
pub enum CrudError {
    /// No record with the given id
    #[error("{resource} with id '{id}' not found")]
    NotFound { resource: String, id: RecordId },

    /// The store declined the write (e.g. duplicate primary field value)
    #[error("{resource} write conflicts with an existing record")]
    Conflict { resource: String },

    /// Request body or filter parameters violate the declared shape
    #[error("validation failed: {}", format_field_errors(.errors))]
    Validation { errors: Vec<FieldError> },

    /// The store has no table for the resource (fatal at registration)
    #[error("table '{table}' not found in data store")]
    UnknownTable { table: String },

    /// A route group already exists for the resource name
    #[error("resource '{resource}' is already registered")]
    DuplicateResource { resource: String },

    /// Backend failure reported by the store
    #[error("store error: {message}")]
    Store { message: String },
}

fn format_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(FieldError::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl CrudError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            CrudError::NotFound { .. } => StatusCode::NOT_FOUND,
            CrudError::Conflict { .. } => StatusCode::CONFLICT,
            CrudError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            CrudError::UnknownTable { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            CrudError::DuplicateResource { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            CrudError::Store { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            CrudError::NotFound { .. } => "NOT_FOUND",
            CrudError::Conflict { .. } => "CONFLICT",
            CrudError::Validation { .. } => "VALIDATION_ERROR",
            CrudError::UnknownTable { .. } => "UNKNOWN_TABLE",
            CrudError::DuplicateResource { .. } => "DUPLICATE_RESOURCE",
            CrudError::Store { .. } => "STORE_ERROR",
        }
    }

    /// Convert to an error response body
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            CrudError::NotFound { resource, id } => Some(serde_json::json!({
                "resource": resource,
                "id": id.to_value(),
            })),
            CrudError::Validation { errors } => Some(serde_json::json!({ "fields": errors })),
            _ => None,
        }
    }
}

impl IntoResponse for CrudError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

/// A specialized Result type for crudgen operations
pub type CrudResult<T> = Result<T, CrudError>;
