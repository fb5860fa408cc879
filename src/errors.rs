use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{error::DbErr, SqlErr};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Message carried by [`ServiceError::UniqueViolation`].
pub const DUPLICATE_RESOURCE: &str = "Duplicate Resource";

fn current_request_id() -> Option<String> {
    crate::tracing::current_request_id().map(|rid| rid.as_str().to_string())
}

/// Error body returned by every failing endpoint
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "error": "Not Found",
    "message": "Not found: Item 42 not found",
    "request_id": "req-abc123xyz",
    "timestamp": "2024-12-09T10:30:00.000Z"
}))]
pub struct ErrorResponse {
    /// HTTP status category (e.g., "Not Found", "Conflict")
    #[schema(example = "Not Found")]
    pub error: String,
    /// Human-readable error description
    pub message: String,
    /// Unique request identifier for support and debugging
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "req-abc123xyz")]
    pub request_id: Option<String>,
    /// ISO 8601 timestamp when error occurred
    pub timestamp: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Any store failure that is not a constraint violation.
    #[error("Database error: {0}")]
    DatabaseError(DbErr),

    /// Unique or referential constraint rejected by the database on save/delete.
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Code uniqueness pre-check failed on create.
    #[error("{0}")]
    UniqueViolation(String),

    /// A replace was attempted without any payload.
    #[error("Null input: {0}")]
    NullInput(String),

    /// The store rejected an identifier or value.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl From<DbErr> for ServiceError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg))
            | Some(SqlErr::ForeignKeyConstraintViolation(msg)) => {
                ServiceError::ConstraintViolation(msg)
            }
            _ => ServiceError::DatabaseError(err),
        }
    }
}

impl ServiceError {
    pub fn item_not_found(item_id: i64) -> Self {
        ServiceError::NotFound(format!("Item {} not found", item_id))
    }

    pub fn item_action_not_found(item_id: i64, action_id: i64) -> Self {
        ServiceError::NotFound(format!(
            "Item action {} not found for item {}",
            action_id, item_id
        ))
    }

    pub fn duplicate_resource() -> Self {
        ServiceError::UniqueViolation(DUPLICATE_RESOURCE.to_string())
    }

    /// Returns the HTTP status code for this error.
    /// This is the single source of truth for error-to-status mapping.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::UniqueViolation(_) | Self::ConstraintViolation(_) => StatusCode::CONFLICT,
            Self::NullInput(_) | Self::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            Self::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the error message suitable for HTTP responses.
    /// Internal errors return generic messages to avoid leaking implementation details.
    pub fn response_message(&self) -> String {
        match self {
            Self::DatabaseError(_) => "Database error".to_string(),
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let err = ErrorResponse {
            error: status.canonical_reason().unwrap_or("Error").to_string(),
            message: self.response_message(),
            request_id: current_request_id(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        (status, Json(err)).into_response()
    }
}
