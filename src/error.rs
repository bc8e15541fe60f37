//! Portal error types with HTTP status code mapping.
//!
//! [`PortalError`] is the central error type for the service. Each variant
//! maps to a specific HTTP status code and structured JSON error response.
//! Errors are never retried or rewritten on their way to the caller.

use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 2002,
///     "message": "Event is full"
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Service error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category        | HTTP Status                     |
/// |-----------|-----------------|---------------------------------|
/// | 1000–1999 | Validation      | 400 Bad Request                 |
/// | 2000–2999 | State/Not Found | 404 Not Found / 409 Conflict    |
/// | 3000–3999 | Server / Store  | 500 / 503 Service Unavailable   |
#[derive(Debug, thiserror::Error)]
pub enum PortalError {
    /// Request validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Event with the given ID does not exist.
    #[error("event not found: {0}")]
    EventNotFound(String),

    /// The event has no seats left.
    #[error("Event is full")]
    CapacityExceeded,

    /// A mutating operation was attempted while no live store is configured.
    #[error("{0}")]
    NotConfigured(String),

    /// Optimistic retries were exhausted without a clean commit.
    #[error("transaction aborted after {attempts} conflicting attempts")]
    TransactionAborted {
        /// Number of attempts made before giving up.
        attempts: u32,
    },

    /// Backing store failure.
    #[error("persistence error: {0}")]
    PersistenceError(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl PortalError {
    /// Builds [`PortalError::EventNotFound`] for an id, parsed or not.
    #[must_use]
    pub fn event_not_found(id: impl fmt::Display) -> Self {
        Self::EventNotFound(id.to_string())
    }

    /// Builds the [`PortalError::NotConfigured`] message for an operation.
    #[must_use]
    pub fn not_configured(operation: &str) -> Self {
        Self::NotConfigured(format!(
            "store is not configured; set the PORTAL_DB_* variables to enable {operation}"
        ))
    }

    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::EventNotFound(_) => 2001,
            Self::CapacityExceeded => 2002,
            Self::Internal(_) => 3000,
            Self::PersistenceError(_) => 3001,
            Self::NotConfigured(_) => 3002,
            Self::TransactionAborted { .. } => 3003,
        }
    }

    /// Extra context carried in the response body, if any.
    #[must_use]
    pub fn details(&self) -> Option<String> {
        match self {
            Self::TransactionAborted { attempts } => Some(format!("attempts: {attempts}")),
            _ => None,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::EventNotFound(_) => StatusCode::NOT_FOUND,
            Self::CapacityExceeded => StatusCode::CONFLICT,
            Self::NotConfigured(_) | Self::TransactionAborted { .. } => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            Self::PersistenceError(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sqlx::Error> for PortalError {
    fn from(err: sqlx::Error) -> Self {
        Self::PersistenceError(err.to_string())
    }
}

impl IntoResponse for PortalError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: self.details(),
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
