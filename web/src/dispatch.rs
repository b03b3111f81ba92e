//! Registration of the `PutOrderId` operation.
//!
//! The route, HTTP method, body contract and success status all come from
//! the compiled [`ApiDefinition`]; the application only supplies an
//! [`OrderHandler`].

use crate::WebResult;
use crate::error::{AppError, RegisterError};
use crate::extractors::{RequestContext, ValidatedJson};
use crate::middleware::correlation_id_layer;
use crate::state::DispatchState;
use async_trait::async_trait;
use axum::{
    Router,
    extract::{Path, State, rejection::PathRejection},
    http::{Method, StatusCode, Uri},
    routing::{MethodFilter, on},
};
use order_api_core::{ApiDefinition, HttpMethod, Order, PUT_ORDER_ID, order_api};
use std::sync::Arc;

/// Application logic for the create-order operation.
///
/// Implementations receive input that already satisfies the declared schema.
/// Returning `Ok(())` makes the dispatcher send the declared success status
/// (`201`); an [`AppError`] is sent as-is.
///
/// # Example
///
/// ```ignore
/// struct LogOrders;
///
/// #[async_trait]
/// impl OrderHandler for LogOrders {
///     async fn put_order_id(&self, ctx: RequestContext, id: String, order: Order) -> WebResult<()> {
///         tracing::info!(correlation_id = %ctx.correlation_id, %id, %order, "order received");
///         Ok(())
///     }
/// }
///
/// let app = register_handlers(LogOrders)?;
/// ```
#[async_trait]
pub trait OrderHandler: Send + Sync + 'static {
    /// Handles `PUT /order/{id}`.
    ///
    /// # Errors
    ///
    /// Any [`AppError`] is turned into the matching error response.
    async fn put_order_id(&self, ctx: RequestContext, id: String, order: Order) -> WebResult<()>;
}

#[async_trait]
impl<H: OrderHandler + ?Sized> OrderHandler for Arc<H> {
    async fn put_order_id(&self, ctx: RequestContext, id: String, order: Order) -> WebResult<()> {
        (**self).put_order_id(ctx, id, order).await
    }
}

/// Builds the dispatcher router for the embedded Order API.
///
/// # Errors
///
/// Returns a [`RegisterError`] if the embedded document fails to compile.
pub fn register_handlers<H: OrderHandler>(handler: H) -> Result<Router, RegisterError> {
    register_handlers_with(order_api()?, Arc::new(handler))
}

/// Builds the dispatcher router from any definition declaring `PutOrderId`.
///
/// # Errors
///
/// Returns [`RegisterError::MissingOperation`] or
/// [`RegisterError::MissingRequestBody`] when the definition does not
/// declare a usable `PutOrderId`.
pub fn register_handlers_with(
    definition: &ApiDefinition,
    handler: Arc<dyn OrderHandler>,
) -> Result<Router, RegisterError> {
    let operation = definition
        .operation(PUT_ORDER_ID)
        .ok_or_else(|| RegisterError::MissingOperation(PUT_ORDER_ID.to_string()))?;
    let state = DispatchState::new(operation, handler)?;
    let route = operation.path().axum_route();

    tracing::info!(
        operation = %operation.id(),
        method = %operation.method(),
        path = %operation.path(),
        success = %state.success_status(),
        "registered handler"
    );

    Ok(Router::new()
        .route(&route, on(method_filter(operation.method()), put_order_id))
        .fallback(route_not_found)
        .with_state(state)
        .layer(correlation_id_layer()))
}

const fn method_filter(method: HttpMethod) -> MethodFilter {
    match method {
        HttpMethod::Get => MethodFilter::GET,
        HttpMethod::Put => MethodFilter::PUT,
        HttpMethod::Post => MethodFilter::POST,
        HttpMethod::Delete => MethodFilter::DELETE,
        HttpMethod::Patch => MethodFilter::PATCH,
    }
}

async fn put_order_id(
    State(state): State<DispatchState>,
    ctx: RequestContext,
    path: Result<Path<String>, PathRejection>,
    ValidatedJson(order): ValidatedJson<Order>,
) -> WebResult<StatusCode> {
    let Path(id) = path.map_err(|rejection| AppError::bad_request(rejection.body_text()))?;

    tracing::debug!(
        correlation_id = %ctx.correlation_id,
        operation = %state.operation().id(),
        %id,
        %order,
        "dispatching"
    );

    state.handler().put_order_id(ctx, id, order).await?;
    Ok(state.success_status())
}

#[allow(clippy::unused_async)]
async fn route_not_found(method: Method, uri: Uri) -> AppError {
    AppError::route_not_found(&method, uri.path())
}
