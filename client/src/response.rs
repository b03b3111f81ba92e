//! Responses returned by the Order API.

use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};

/// Header the dispatcher echoes its correlation id in.
pub const CORRELATION_ID_HEADER: &str = "x-correlation-id";

/// JSON error body sent by the dispatcher on 4xx and 5xx responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable error code, e.g. `VALIDATION_ERROR`.
    pub code: String,
    /// Human-readable message.
    pub message: String,
    /// One entry per problem, if any.
    #[serde(default)]
    pub details: Vec<String>,
}

/// Outcome of one `PUT /order/{id}` exchange.
///
/// Any status the server sends ends up here, including 4xx and 5xx.
#[derive(Debug, Clone)]
pub struct PutOrderIdResponse {
    status: StatusCode,
    success: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl PutOrderIdResponse {
    pub(crate) const fn new(
        status: StatusCode,
        success: StatusCode,
        headers: HeaderMap,
        body: Vec<u8>,
    ) -> Self {
        Self {
            status,
            success,
            headers,
            body,
        }
    }

    /// Numeric HTTP status.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    /// HTTP status.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// `true` if the server answered with the operation's declared success
    /// status (`201 Created` for the Order API).
    #[must_use]
    pub fn is_created(&self) -> bool {
        self.status == self.success
    }

    /// The success status the operation declares.
    #[must_use]
    pub const fn success_status(&self) -> StatusCode {
        self.success
    }

    /// Response headers.
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Raw response body.
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Correlation id the server assigned to the request.
    #[must_use]
    pub fn correlation_id(&self) -> Option<&str> {
        self.headers
            .get(CORRELATION_ID_HEADER)
            .and_then(|v| v.to_str().ok())
    }

    /// The dispatcher's JSON error body, if this is an error response
    /// carrying one.
    #[must_use]
    pub fn error_body(&self) -> Option<ErrorResponse> {
        if self.status.is_success() || self.body.is_empty() {
            return None;
        }
        serde_json::from_slice(&self.body).ok()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn test_created_response() {
        let mut headers = HeaderMap::new();
        headers.insert(CORRELATION_ID_HEADER, HeaderValue::from_static("abc"));
        let response = PutOrderIdResponse::new(StatusCode::CREATED, StatusCode::CREATED, headers, Vec::new());

        assert_eq!(response.status_code(), 201);
        assert!(response.is_created());
        assert_eq!(response.correlation_id(), Some("abc"));
        assert!(response.error_body().is_none());
    }

    #[test]
    fn test_success_follows_declared_status() {
        let accepted = PutOrderIdResponse::new(
            StatusCode::ACCEPTED,
            StatusCode::ACCEPTED,
            HeaderMap::new(),
            Vec::new(),
        );
        assert!(accepted.is_created());

        let created = PutOrderIdResponse::new(
            StatusCode::CREATED,
            StatusCode::ACCEPTED,
            HeaderMap::new(),
            Vec::new(),
        );
        assert!(!created.is_created());
        assert_eq!(created.success_status(), StatusCode::ACCEPTED);
    }

    #[test]
    fn test_error_body_parsing() {
        let body = br#"{"code":"VALIDATION_ERROR","message":"Order payload is invalid","details":["bad item"]}"#;
        let response =
            PutOrderIdResponse::new(StatusCode::BAD_REQUEST, StatusCode::CREATED, HeaderMap::new(), body.to_vec());

        assert!(!response.is_created());
        let error = response.error_body().unwrap();
        assert_eq!(error.code, "VALIDATION_ERROR");
        assert_eq!(error.details, vec!["bad item".to_string()]);
    }

    #[test]
    fn test_error_body_without_details() {
        let body = br#"{"code":"NOT_FOUND","message":"No operation declared for PUT /x"}"#;
        let response = PutOrderIdResponse::new(StatusCode::NOT_FOUND, StatusCode::CREATED, HeaderMap::new(), body.to_vec());

        assert!(response.error_body().unwrap().details.is_empty());
    }

    #[test]
    fn test_non_json_error_body() {
        let response =
            PutOrderIdResponse::new(StatusCode::BAD_GATEWAY, StatusCode::CREATED, HeaderMap::new(), b"upstream down".to_vec());

        assert!(response.error_body().is_none());
        assert_eq!(response.body(), b"upstream down");
    }
}
