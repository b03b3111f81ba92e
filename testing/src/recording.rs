//! Recording handler for dispatcher tests.

use async_trait::async_trait;
use axum::http::StatusCode;
use order_api_core::Order;
use order_api_web::{AppError, CorrelationId, OrderHandler, RequestContext, WebResult};
use std::sync::{Arc, Mutex, MutexGuard};

/// One call observed by a [`RecordingHandler`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    /// Correlation id of the request.
    pub correlation_id: CorrelationId,
    /// The `id` path parameter.
    pub id: String,
    /// The decoded body.
    pub order: Order,
}

/// An [`OrderHandler`] that records every call it receives.
///
/// Clones share the same recording, so a test can keep one clone and hand
/// another to the router.
///
/// # Example
///
/// ```ignore
/// let handler = RecordingHandler::new();
/// let app = register_handlers(handler.clone())?;
/// // ... drive requests through `app` ...
/// assert_eq!(handler.call_count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RecordingHandler {
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    failure: Option<(StatusCode, String)>,
}

impl RecordingHandler {
    /// A handler that accepts every order.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A handler that records the call, then fails it with `status`.
    #[must_use]
    pub fn failing(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            calls: Arc::default(),
            failure: Some((status, message.into())),
        }
    }

    /// Every recorded call, oldest first.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.lock().clone()
    }

    /// The most recent call.
    #[must_use]
    pub fn last_call(&self) -> Option<RecordedCall> {
        self.lock().last().cloned()
    }

    /// Number of recorded calls.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.lock().len()
    }

    /// Forget every recorded call (for test isolation).
    pub fn clear(&self) {
        self.lock().clear();
    }

    // Poisoning only means another test panicked mid-push.
    fn lock(&self) -> MutexGuard<'_, Vec<RecordedCall>> {
        self.calls
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl OrderHandler for RecordingHandler {
    async fn put_order_id(&self, ctx: RequestContext, id: String, order: Order) -> WebResult<()> {
        tracing::debug!(%id, %order, "recording call");
        self.lock().push(RecordedCall {
            correlation_id: ctx.correlation_id,
            id,
            order,
        });

        match &self.failure {
            Some((status, message)) => Err(AppError::new(
                *status,
                message.clone(),
                "HANDLER_FAILED".to_string(),
            )),
            None => Ok(()),
        }
    }
}
