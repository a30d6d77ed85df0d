//! Error types for people-api
//!
//! Handlers return [`ApiError`]. The response carries only a status and an
//! error code; the human-readable context and cause travel in an
//! [`ErrorReport`] response extension, which the access-log middleware
//! writes to the error log under the request's correlation id.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::services::ServiceError;

/// Error details for the error log, attached to error responses
#[derive(Debug, Clone)]
pub struct ErrorReport {
    /// What the handler was doing, e.g. "problems with parameters"
    pub message: &'static str,
    /// Underlying cause
    pub cause: String,
}

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed path parameter, content type or body (400)
    #[error("{context}: {reason}")]
    BadRequest {
        context: &'static str,
        reason: String,
    },

    /// Target person does not exist (404)
    #[error("{context}: {source}")]
    NotFound {
        context: &'static str,
        source: ServiceError,
    },

    /// Storage, enrichment or encoding failure (500)
    #[error("{context}: {source}")]
    Dependency {
        context: &'static str,
        source: ServiceError,
    },
}

impl ApiError {
    pub fn bad_request(context: &'static str, reason: impl Into<String>) -> Self {
        ApiError::BadRequest {
            context,
            reason: reason.into(),
        }
    }

    /// Classify a service failure; `context` names the failed operation
    pub fn service(context: &'static str, source: ServiceError) -> Self {
        match source {
            ServiceError::NotFound(_) => ApiError::NotFound {
                context: "person not found",
                source,
            },
            _ => ApiError::Dependency { context, source },
        }
    }

    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::BadRequest { .. } => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::Dependency { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }

    fn report(&self) -> ErrorReport {
        match self {
            ApiError::BadRequest { context, reason } => ErrorReport {
                message: *context,
                cause: reason.clone(),
            },
            ApiError::NotFound { context, source } | ApiError::Dependency { context, source } => {
                ErrorReport {
                    message: *context,
                    cause: source.to_string(),
                }
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let mut response = error_response(status, code);
        response.extensions_mut().insert(self.report());
        response
    }
}

/// Error body without internal detail: `{"error": {"code": ...}}`
pub fn error_response(status: StatusCode, code: &'static str) -> Response {
    let body = Json(json!({
        "error": {
            "code": code,
        }
    }));

    (status, body).into_response()
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
