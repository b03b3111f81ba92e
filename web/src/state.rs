//! Shared state for the dispatcher route.

use crate::dispatch::OrderHandler;
use crate::error::RegisterError;
use axum::http::StatusCode;
use order_api_core::{Operation, RequestBodySpec};
use std::sync::Arc;

/// State shared by every request to the dispatched operation.
///
/// Immutable after registration: the compiled operation contract plus the
/// application handler. Cloning is cheap.
#[derive(Clone)]
pub struct DispatchState {
    handler: Arc<dyn OrderHandler>,
    operation: Arc<Operation>,
    body: Arc<RequestBodySpec>,
    success: StatusCode,
}

impl DispatchState {
    /// Binds `handler` to a compiled operation.
    ///
    /// # Errors
    ///
    /// Returns [`RegisterError::MissingRequestBody`] if the operation takes no
    /// body.
    pub fn new(operation: &Operation, handler: Arc<dyn OrderHandler>) -> Result<Self, RegisterError> {
        let body = operation
            .request_body()
            .cloned()
            .ok_or_else(|| RegisterError::MissingRequestBody(operation.id().to_string()))?;

        // compile() only accepts statuses in 100..600
        let success = StatusCode::from_u16(operation.success_status()).unwrap_or(StatusCode::OK);

        Ok(Self {
            handler,
            operation: Arc::new(operation.clone()),
            body: Arc::new(body),
            success,
        })
    }

    /// The application handler.
    #[must_use]
    pub fn handler(&self) -> &dyn OrderHandler {
        self.handler.as_ref()
    }

    /// The compiled operation.
    #[must_use]
    pub fn operation(&self) -> &Operation {
        &self.operation
    }

    /// The operation's request body contract.
    #[must_use]
    pub fn request_body(&self) -> &RequestBodySpec {
        &self.body
    }

    /// Status sent when the handler succeeds.
    #[must_use]
    pub const fn success_status(&self) -> StatusCode {
        self.success
    }
}

impl std::fmt::Debug for DispatchState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchState")
            .field("operation", &self.operation.id())
            .field("success", &self.success)
            .finish_non_exhaustive()
    }
}
