//! Custom Axum extractors.
//!
//! - [`RequestContext`]: correlation id, method, path and user agent of the
//!   current request
//! - [`ValidatedJson`]: a JSON body checked against the operation's declared
//!   schema before it is decoded

use crate::error::AppError;
use crate::middleware::{CORRELATION_ID_HEADER, CorrelationId};
use crate::state::DispatchState;
use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Request, rejection::BytesRejection},
    http::{HeaderMap, Method, StatusCode, header, request::Parts},
};
use order_api_core::RequestBodySpec;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Per-request information handed to the handler alongside the decoded input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    /// Correlation id set by the middleware (or generated here without it).
    pub correlation_id: CorrelationId,
    /// HTTP method.
    pub method: Method,
    /// Request path, without query string.
    pub path: String,
    /// `User-Agent` header, if sent.
    pub user_agent: Option<String>,
}

#[async_trait]
impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let correlation_id = parts
            .extensions
            .get::<CorrelationId>()
            .copied()
            .unwrap_or_else(|| CorrelationId::from_header(parts.headers.get(CORRELATION_ID_HEADER)));

        let user_agent = parts
            .headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string);

        Ok(Self {
            correlation_id,
            method: parts.method.clone(),
            path: parts.uri.path().to_string(),
            user_agent,
        })
    }
}

/// A request body that passed the declared schema, decoded into `T`.
///
/// Rejections, in order of precedence:
/// - body over the size limit: `413 PAYLOAD_TOO_LARGE`
/// - body could not be read: the status axum reports
/// - empty body on an operation that requires one: `400 BAD_REQUEST`
/// - non-JSON `Content-Type`: `415 UNSUPPORTED_MEDIA_TYPE`
/// - body is not JSON: `400 MALFORMED_BODY`
/// - body violates the schema: `400 VALIDATION_ERROR` with details
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T> FromRequest<DispatchState> for ValidatedJson<T>
where
    T: DeserializeOwned + Send,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &DispatchState) -> Result<Self, Self::Rejection> {
        let spec = state.request_body();
        let content_type_ok = is_content_type(req.headers(), &spec.content_type);

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(body_rejection)?;

        decode_body(spec, &bytes, content_type_ok).map(Self)
    }
}

fn body_rejection(rejection: BytesRejection) -> AppError {
    let status = rejection.status();
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::payload_too_large(rejection.body_text());
    }
    let code = status
        .canonical_reason()
        .unwrap_or("BAD_REQUEST")
        .to_uppercase()
        .replace(' ', "_");
    AppError::new(status, rejection.body_text(), code)
}

/// Runs the body checks in order and decodes the result.
///
/// # Errors
///
/// Returns the [`AppError`] for the first failing check.
pub fn decode_body<T: DeserializeOwned>(
    spec: &RequestBodySpec,
    bytes: &[u8],
    content_type_ok: bool,
) -> Result<T, AppError> {
    let value = if bytes.iter().all(u8::is_ascii_whitespace) {
        if spec.required {
            return Err(AppError::bad_request("Request body is required"));
        }
        Value::Object(Map::new())
    } else {
        if !content_type_ok {
            return Err(AppError::unsupported_media_type(format!(
                "Expected Content-Type: {}",
                spec.content_type
            )));
        }
        serde_json::from_slice::<Value>(bytes).map_err(|e| {
            AppError::malformed_body(format!("Request body is not valid JSON: {e}"))
        })?
    };

    spec.schema.validate(&value)?;

    serde_json::from_value(value).map_err(|e| {
        AppError::validation(format!("{} payload is invalid", spec.schema.name()))
            .with_details(vec![e.to_string()])
    })
}

/// Compares the media type of `Content-Type`, ignoring parameters and case.
fn is_content_type(headers: &HeaderMap, expected: &str) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .is_some_and(|media| media.trim().eq_ignore_ascii_case(expected))
}
