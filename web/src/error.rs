//! Error types for the dispatcher.
//!
//! [`AppError`] bridges decode/validation failures and handler errors to
//! HTTP responses by implementing Axum's `IntoResponse` trait. Every error
//! stays local to the request that produced it.

use axum::{
    Json,
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};
use order_api_core::{DefinitionError, ValidationErrors};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Application error type for the dispatcher and handlers.
///
/// Carries the status, a stable machine-readable code, a user-facing message
/// and optional per-violation details. The source error is only logged.
///
/// # Examples
///
/// ```ignore
/// async fn put_order_id(&self, ctx: RequestContext, id: String, order: Order) -> WebResult<()> {
///     if id.len() > 64 {
///         return Err(AppError::bad_request("id is too long"));
///     }
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct AppError {
    /// HTTP status code
    status: StatusCode,
    /// Error message (user-facing)
    message: String,
    /// Error code (for client error handling)
    code: String,
    /// Individual problems, e.g. one entry per schema violation
    details: Vec<String>,
    /// Internal error (for logging, not exposed to client)
    source: Option<anyhow::Error>,
}

impl AppError {
    /// Create a new application error.
    #[must_use]
    pub const fn new(status: StatusCode, message: String, code: String) -> Self {
        Self {
            status,
            message,
            code,
            details: Vec::new(),
            source: None,
        }
    }

    /// Create a new error with a source error.
    #[must_use]
    pub fn with_source(mut self, source: anyhow::Error) -> Self {
        self.source = Some(source);
        self
    }

    /// Attach detail lines to the response body.
    #[must_use]
    pub fn with_details(mut self, details: Vec<String>) -> Self {
        self.details = details;
        self
    }

    /// Create a 400 Bad Request error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            message.into(),
            "BAD_REQUEST".to_string(),
        )
    }

    /// Create a 400 error for a body that is not parseable JSON.
    #[must_use]
    pub fn malformed_body(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            message.into(),
            "MALFORMED_BODY".to_string(),
        )
    }

    /// Create a 400 error for a body that violates the declared schema.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            message.into(),
            "VALIDATION_ERROR".to_string(),
        )
    }

    /// Create a 404 Not Found error for an undeclared route.
    #[must_use]
    pub fn route_not_found(method: &Method, path: impl fmt::Display) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            format!("No operation declared for {method} {path}"),
            "NOT_FOUND".to_string(),
        )
    }

    /// Create a 415 Unsupported Media Type error.
    #[must_use]
    pub fn unsupported_media_type(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            message.into(),
            "UNSUPPORTED_MEDIA_TYPE".to_string(),
        )
    }

    /// Create a 413 error for a body over the size limit.
    #[must_use]
    pub fn payload_too_large(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::PAYLOAD_TOO_LARGE,
            message.into(),
            "PAYLOAD_TOO_LARGE".to_string(),
        )
    }

    /// Create a 500 Internal Server Error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            message.into(),
            "INTERNAL_SERVER_ERROR".to_string(),
        )
    }

    /// HTTP status of the response.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Machine-readable error code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Detail lines.
    #[must_use]
    pub fn details(&self) -> &[String] {
        &self.details
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Error response body (JSON).
///
/// Also deserializable so clients and tests can read it back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Error code (for client error handling).
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Individual problems, omitted when empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            if let Some(source) = &self.source {
                tracing::error!(
                    status = %self.status,
                    code = %self.code,
                    message = %self.message,
                    error = %source,
                    "Internal server error"
                );
            } else {
                tracing::error!(
                    status = %self.status,
                    code = %self.code,
                    message = %self.message,
                    "Internal server error"
                );
            }
        } else {
            tracing::debug!(status = %self.status, code = %self.code, message = %self.message, "request rejected");
        }

        let body = ErrorBody {
            code: self.code,
            message: self.message,
            details: self.details,
        };

        (self.status, Json(body)).into_response()
    }
}

/// Convert `anyhow::Error` to `AppError`.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::internal("An internal error occurred").with_source(err)
    }
}

impl From<ValidationErrors> for AppError {
    fn from(err: ValidationErrors) -> Self {
        let message = format!("{} payload is invalid", err.schema());
        let details = err.errors().iter().map(ToString::to_string).collect();
        Self::validation(message).with_details(details)
    }
}

/// Errors raised while building the dispatcher router.
#[derive(Debug, Error)]
pub enum RegisterError {
    /// The embedded API document failed to compile.
    #[error(transparent)]
    Definition(#[from] DefinitionError),

    /// The document does not declare the operation being registered.
    #[error("Operation {0} is not declared")]
    MissingOperation(String),

    /// The operation declares no request body.
    #[error("Operation {0} declares no request body")]
    MissingRequestBody(String),
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use order_api_core::{ORDER_SCHEMA, order_api};
    use serde_json::json;

    #[test]
    fn test_error_display() {
        let err = AppError::bad_request("Invalid input");
        assert_eq!(err.to_string(), "[BAD_REQUEST] Invalid input");
    }

    #[test]
    fn test_route_not_found() {
        let err = AppError::route_not_found(&Method::GET, "/orders");
        assert_eq!(
            err.to_string(),
            "[NOT_FOUND] No operation declared for GET /orders"
        );
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_validation_is_client_error() {
        let err = AppError::validation("bad body");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_from_validation_errors() {
        let schema = order_api().unwrap().schema(ORDER_SCHEMA).unwrap();
        let violations = schema
            .validate(&json!({"item": "Nonexistent Item", "price": "free"}))
            .unwrap_err();

        let err = AppError::from(violations);
        assert_eq!(err.code(), "VALIDATION_ERROR");
        assert_eq!(err.details().len(), 2);
        assert!(err.details()[0].contains("Nonexistent Item"));
    }

    #[test]
    fn test_payload_too_large() {
        let err = AppError::payload_too_large("length limit exceeded");
        assert_eq!(err.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(err.code(), "PAYLOAD_TOO_LARGE");
    }

    #[test]
    fn test_anyhow_becomes_internal() {
        let err = AppError::from(anyhow::anyhow!("disk on fire"));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(std::error::Error::source(&err).is_some());
    }

    #[tokio::test]
    async fn test_error_body_shape() {
        let response = AppError::malformed_body("expected value at line 1")
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            body,
            json!({"code": "MALFORMED_BODY", "message": "expected value at line 1"})
        );
    }
}
