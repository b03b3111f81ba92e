//! Axum dispatcher for the Order API.
//!
//! Binds the single declared operation, `PUT /order/{id}`, to an application
//! [`OrderHandler`]. Everything about the route comes from the compiled
//! definition in `order-api-core`; this crate is the imperative shell around
//! it.
//!
//! # Request Flow
//!
//! 1. **HTTP Request** arrives; the correlation id middleware tags it
//! 2. **Extract** the [`RequestContext`] and the `id` path parameter
//! 3. **Validate** the JSON body against the declared `Order` schema
//! 4. **Decode** it into an [`Order`](order_api_core::Order)
//! 5. **Dispatch** to the handler
//! 6. **Respond** with the declared success status, or an [`AppError`] body
//!
//! A bad request only ever fails that request; the router keeps serving.
//!
//! # Example
//!
//! ```ignore
//! use order_api_web::{register_handlers, OrderHandler, RequestContext, WebResult};
//! use order_api_core::Order;
//!
//! struct Orders;
//!
//! #[async_trait::async_trait]
//! impl OrderHandler for Orders {
//!     async fn put_order_id(&self, _ctx: RequestContext, id: String, order: Order) -> WebResult<()> {
//!         tracing::info!(%id, %order, "order received");
//!         Ok(())
//!     }
//! }
//!
//! let app = register_handlers(Orders)?;
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8088").await?;
//! axum::serve(listener, app).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod dispatch;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod state;

// Re-export key types for convenience
pub use dispatch::{OrderHandler, register_handlers, register_handlers_with};
pub use error::{AppError, ErrorBody, RegisterError};
pub use extractors::{RequestContext, ValidatedJson};
pub use middleware::{CORRELATION_ID_HEADER, CorrelationId, correlation_id_layer};
pub use state::DispatchState;

/// Result type alias for handlers.
pub type WebResult<T> = Result<T, AppError>;
